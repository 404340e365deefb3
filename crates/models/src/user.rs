use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::listing;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Listing,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Listing => Entity::has_many(listing::Entity).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') { return Err(errors::ModelError::Validation("invalid email".into())); }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    Ok(())
}

/// Insert an account row. `is_admin` is fixed here; there is no promotion path.
pub async fn create(
    db: &DatabaseConnection,
    email: &str,
    name: &str,
    is_admin: bool,
    business_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    validate_name(name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        name: Set(name.to_string()),
        is_admin: Set(is_admin),
        business_name: Set(business_name),
        phone: Set(phone),
        address: Set(address),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_must_contain_at() {
        assert!(validate_email("nope").is_err());
        assert!(validate_email("a@b.com").is_ok());
    }

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("  ").is_err());
        assert!(validate_name("Ada").is_ok());
    }
}
