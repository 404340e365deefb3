use chrono::{DateTime, Utc};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use models::listing;

use crate::listings::domain::{ApprovedFilter, Listing, ListingStatus, MembershipCategory, Priority, SocialLinks};
use crate::listings::errors::ListingError;
use crate::listings::repository::ListingRepository;

pub struct SeaOrmListingRepository {
    pub db: DatabaseConnection,
}

fn db_err(e: sea_orm::DbErr) -> ListingError {
    ListingError::Repository(e.to_string())
}

fn to_domain(m: listing::Model) -> Result<Listing, ListingError> {
    let status = ListingStatus::parse(&m.status)
        .ok_or_else(|| ListingError::Repository(format!("unknown status `{}` on listing {}", m.status, m.id)))?;
    let priority = Priority::parse(&m.priority)
        .ok_or_else(|| ListingError::Repository(format!("unknown priority `{}` on listing {}", m.priority, m.id)))?;
    let membership_category = MembershipCategory::parse(&m.membership_category).ok_or_else(|| {
        ListingError::Repository(format!("unknown membership category `{}` on listing {}", m.membership_category, m.id))
    })?;
    Ok(Listing {
        id: m.id,
        owner_id: m.owner_id,
        business_name: m.business_name,
        contact_name: m.contact_name,
        email: m.email,
        phone: m.phone,
        industry: m.industry,
        membership_category,
        description: m.description,
        website_url: m.website_url,
        social_links: SocialLinks {
            facebook: m.social_links.facebook,
            linkedin: m.social_links.linkedin,
            twitter: m.social_links.twitter,
        },
        images: m.images.0,
        videos: m.videos.0,
        status,
        priority,
        review_notes: m.review_notes,
        approved_date: m.approved_date.map(|d| d.with_timezone(&Utc)),
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    })
}

fn to_active(l: Listing) -> listing::ActiveModel {
    listing::ActiveModel {
        id: Set(l.id),
        owner_id: Set(l.owner_id),
        business_name: Set(l.business_name),
        contact_name: Set(l.contact_name),
        email: Set(l.email),
        phone: Set(l.phone),
        industry: Set(l.industry),
        membership_category: Set(l.membership_category.as_str().to_string()),
        description: Set(l.description),
        website_url: Set(l.website_url),
        social_links: Set(listing::SocialLinks {
            facebook: l.social_links.facebook,
            linkedin: l.social_links.linkedin,
            twitter: l.social_links.twitter,
        }),
        images: Set(listing::MediaRefs(l.images)),
        videos: Set(listing::MediaRefs(l.videos)),
        status: Set(l.status.as_str().to_string()),
        priority: Set(l.priority.as_str().to_string()),
        review_notes: Set(l.review_notes),
        approved_date: Set(l.approved_date.map(Into::into)),
        created_at: Set(l.created_at.into()),
        updated_at: Set(l.updated_at.into()),
    }
}

fn collect_domain(models: Vec<listing::Model>) -> Result<Vec<Listing>, ListingError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait::async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn insert(&self, new_listing: Listing) -> Result<Listing, ListingError> {
        let inserted = to_active(new_listing).insert(&self.db).await.map_err(db_err)?;
        to_domain(inserted)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingError> {
        let found = listing::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        found.map(to_domain).transpose()
    }

    async fn list_approved(&self, filter: &ApprovedFilter) -> Result<Vec<Listing>, ListingError> {
        let mut query = listing::Entity::find()
            .filter(listing::Column::Status.eq(ListingStatus::Approved.as_str()));
        if let Some(industry) = &filter.industry {
            query = query.filter(listing::Column::Industry.eq(industry.clone()));
        }
        if let Some(category) = filter.membership_category {
            query = query.filter(listing::Column::MembershipCategory.eq(category.as_str()));
        }
        if let Some(needle) = &filter.search {
            let pattern = format!("%{}%", needle);
            query = query.filter(
                Condition::any()
                    .add(Expr::col(listing::Column::BusinessName).ilike(pattern.clone()))
                    .add(Expr::col(listing::Column::Description).ilike(pattern)),
            );
        }
        let models = query
            .order_by_desc(listing::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        collect_domain(models)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, ListingError> {
        let models = listing::Entity::find()
            .filter(listing::Column::OwnerId.eq(owner_id))
            .order_by_desc(listing::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        collect_domain(models)
    }

    async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ListingError> {
        let models = listing::Entity::find()
            .filter(listing::Column::Status.eq(status.as_str()))
            .order_by_desc(listing::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        collect_domain(models)
    }

    async fn update_moderation(
        &self,
        id: Uuid,
        status: ListingStatus,
        review_notes: Option<String>,
        approved_date: Option<DateTime<Utc>>,
    ) -> Result<Listing, ListingError> {
        let found = listing::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(ListingError::NotFound)?;
        let mut am: listing::ActiveModel = found.into();
        am.status = Set(status.as_str().to_string());
        am.approved_date = Set(approved_date.map(Into::into));
        if let Some(notes) = review_notes {
            am.review_notes = Set(Some(notes));
        }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(db_err)?;
        to_domain(updated)
    }

    async fn update_priority(&self, id: Uuid, priority: Priority) -> Result<Listing, ListingError> {
        let found = listing::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(ListingError::NotFound)?;
        let mut am: listing::ActiveModel = found.into();
        am.priority = Set(priority.as_str().to_string());
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(db_err)?;
        to_domain(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ListingError> {
        let res = listing::Entity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(ListingError::NotFound);
        }
        Ok(())
    }

    async fn count_by_status(&self) -> Result<Vec<(String, u64)>, ListingError> {
        let rows: Vec<(String, i64)> = listing::Entity::find()
            .select_only()
            .column(listing::Column::Status)
            .column_as(listing::Column::Id.count(), "count")
            .group_by(listing::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(|(status, count)| (status, count as u64)).collect())
    }

    async fn count_approved_by_industry(&self) -> Result<Vec<(String, u64)>, ListingError> {
        let rows: Vec<(String, i64)> = listing::Entity::find()
            .select_only()
            .column(listing::Column::Industry)
            .column_as(listing::Column::Id.count(), "count")
            .filter(listing::Column::Status.eq(ListingStatus::Approved.as_str()))
            .group_by(listing::Column::Industry)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(|(industry, count)| (industry, count as u64)).collect())
    }
}
