use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::user;

/// Per-platform profile links, stored as one JSONB object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Ordered opaque media references handed over by the upload collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct MediaRefs(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub industry: String,
    pub membership_category: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub social_links: SocialLinks,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: MediaRefs,
    #[sea_orm(column_type = "JsonBinary")]
    pub videos: MediaRefs,
    pub status: String,
    pub priority: String,
    pub review_notes: Option<String>,
    pub approved_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::OwnerId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
