use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::domain::Identity;

use super::domain::{
    ApprovedFilter, CategoryCount, CreateListingInput, Listing, ListingStatus, Priority,
};
use super::errors::ListingError;
use super::repository::ListingRepository;

/// Media reference limits enforced per creation request; the upload
/// collaborator applies the same caps before references reach us.
pub const MAX_IMAGE_REFS: usize = 5;
pub const MAX_VIDEO_REFS: usize = 2;

/// Seed directory shown while no listing has been approved yet; never persisted.
const FALLBACK_CATEGORIES: [&str; 8] = [
    "Technology",
    "Retail",
    "Manufacturing",
    "Healthcare",
    "Education",
    "Food & Beverage",
    "Professional Services",
    "Construction",
];

/// Moderation business service independent of web framework
pub struct ListingService<R: ListingRepository> {
    repo: Arc<R>,
}

impl<R: ListingRepository> ListingService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Submit a listing. The acting identity becomes the immutable owner and
    /// the listing always starts out `pending` with no approval timestamp.
    ///
    /// # Examples
    /// ```
    /// use service::auth::domain::Identity;
    /// use service::listings::{service::ListingService, repository::mock::MockListingRepository};
    /// use service::listings::domain::{CreateListingInput, ListingStatus, MembershipCategory, SocialLinks};
    /// use std::sync::Arc;
    /// let svc = ListingService::new(Arc::new(MockListingRepository::default()));
    /// let owner = Identity::Member { id: uuid::Uuid::new_v4() };
    /// let input = CreateListingInput {
    ///     business_name: "Acme Widgets".into(),
    ///     contact_name: "Ada".into(),
    ///     email: "ada@acme.test".into(),
    ///     phone: "555-0100".into(),
    ///     industry: "Manufacturing".into(),
    ///     membership_category: MembershipCategory::PrimeA,
    ///     description: None,
    ///     website_url: None,
    ///     social_links: SocialLinks::default(),
    ///     images: vec![],
    ///     videos: vec![],
    /// };
    /// let listing = tokio_test::block_on(svc.create(&owner, input)).unwrap();
    /// assert_eq!(listing.status, ListingStatus::Pending);
    /// assert!(listing.approved_date.is_none());
    /// ```
    #[instrument(skip(self, input), fields(owner_id = %actor.id(), business = %input.business_name))]
    pub async fn create(&self, actor: &Identity, input: CreateListingInput) -> Result<Listing, ListingError> {
        require_field("business name", &input.business_name)?;
        require_field("contact name", &input.contact_name)?;
        require_field("email", &input.email)?;
        require_field("phone", &input.phone)?;
        require_field("industry", &input.industry)?;
        if input.images.len() > MAX_IMAGE_REFS {
            return Err(ListingError::Validation(format!("at most {} image references", MAX_IMAGE_REFS)));
        }
        if input.videos.len() > MAX_VIDEO_REFS {
            return Err(ListingError::Validation(format!("at most {} video references", MAX_VIDEO_REFS)));
        }

        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4(),
            owner_id: actor.id(),
            business_name: input.business_name,
            contact_name: input.contact_name,
            email: input.email,
            phone: input.phone,
            industry: input.industry,
            membership_category: input.membership_category,
            description: input.description,
            website_url: input.website_url,
            social_links: input.social_links,
            images: input.images,
            videos: input.videos,
            status: ListingStatus::Pending,
            priority: Priority::default(),
            review_notes: None,
            approved_date: None,
            created_at: now,
            updated_at: now,
        };
        let created = self.repo.insert(listing).await?;
        info!(listing_id = %created.id, "listing_submitted");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Listing, ListingError> {
        self.repo.find_by_id(id).await?.ok_or(ListingError::NotFound)
    }

    /// Public detail view. Anything not yet approved answers `NotFound` so
    /// unauthenticated readers cannot probe drafts or rejected submissions.
    pub async fn get_approved(&self, id: Uuid) -> Result<Listing, ListingError> {
        let listing = self.get(id).await?;
        match listing.status {
            ListingStatus::Approved => Ok(listing),
            ListingStatus::Pending | ListingStatus::Review | ListingStatus::Rejected => {
                Err(ListingError::NotFound)
            }
        }
    }

    /// Public directory view over approved listings, newest first.
    pub async fn list_approved(&self, filter: &ApprovedFilter) -> Result<Vec<Listing>, ListingError> {
        self.repo.list_approved(filter).await
    }

    /// The acting identity's own submissions, newest first.
    pub async fn list_owned(&self, actor: &Identity) -> Result<Vec<Listing>, ListingError> {
        self.repo.list_by_owner(actor.id()).await
    }

    /// Moderation queue: strictly `pending`, newest first. Admin only.
    pub async fn list_pending(&self, actor: &Identity) -> Result<Vec<Listing>, ListingError> {
        self.require_admin(actor, "list_pending")?;
        self.repo.list_by_status(ListingStatus::Pending).await
    }

    /// Apply a moderation decision.
    ///
    /// Only `approved` and `rejected` are valid targets, only `pending` and
    /// `review` listings may still be decided, and the approval timestamp is
    /// written in the same store update as the status so the two can never
    /// disagree.
    #[instrument(skip(self, review_notes), fields(listing_id = %id, target = %target))]
    pub async fn set_status(
        &self,
        id: Uuid,
        actor: &Identity,
        target: ListingStatus,
        review_notes: Option<String>,
    ) -> Result<Listing, ListingError> {
        self.require_admin(actor, "set_status")?;
        match target {
            ListingStatus::Approved | ListingStatus::Rejected => {}
            ListingStatus::Pending | ListingStatus::Review => {
                return Err(ListingError::InvalidStatus(format!("cannot set status to {}", target)));
            }
        }

        let current = self.get(id).await?;
        match current.status {
            ListingStatus::Pending | ListingStatus::Review => {}
            ListingStatus::Approved | ListingStatus::Rejected => {
                return Err(ListingError::InvalidStatus(format!("{} listing is final", current.status)));
            }
        }

        let approved_date = match target {
            ListingStatus::Approved => Some(Utc::now()),
            _ => None,
        };
        let updated = self.repo.update_moderation(id, target, review_notes, approved_date).await?;
        info!(status = %updated.status, "listing_moderated");
        Ok(updated)
    }

    /// Adjust the moderation priority hint. Admin only; touches nothing else.
    pub async fn set_priority(&self, id: Uuid, actor: &Identity, priority: Priority) -> Result<Listing, ListingError> {
        self.require_admin(actor, "set_priority")?;
        // NotFound before the store update for unknown ids
        self.get(id).await?;
        let updated = self.repo.update_priority(id, priority).await?;
        info!(listing_id = %updated.id, priority = updated.priority.as_str(), "listing_priority_set");
        Ok(updated)
    }

    /// Remove a listing. Only the owning account may delete, in any status;
    /// administrators hold no delete capability in this design.
    pub async fn delete(&self, id: Uuid, actor: &Identity) -> Result<(), ListingError> {
        let listing = self.get(id).await?;
        match actor {
            Identity::Member { id: uid } | Identity::Admin { id: uid } if *uid == listing.owner_id => {}
            Identity::Member { .. } | Identity::Admin { .. } => {
                warn!(listing_id = %id, actor_id = %actor.id(), "listing_delete_refused");
                return Err(ListingError::Forbidden);
            }
        }
        self.repo.delete(id).await?;
        info!(listing_id = %id, "listing_deleted");
        Ok(())
    }

    /// Moderation statistics, admin only. The three tracked buckets are
    /// always present; a `review` row surfaces only when the store holds one.
    pub async fn status_counts(&self, actor: &Identity) -> Result<BTreeMap<String, u64>, ListingError> {
        self.require_admin(actor, "status_counts")?;
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for status in [ListingStatus::Pending, ListingStatus::Approved, ListingStatus::Rejected] {
            counts.insert(status.as_str().to_string(), 0);
        }
        for (status, count) in self.repo.count_by_status().await? {
            counts.insert(status, count);
        }
        Ok(counts)
    }

    /// Distinct industries over approved listings with their counts,
    /// alphabetical. Falls back to the fixed seed list while the directory
    /// has no approved listing at all.
    pub async fn categories(&self) -> Result<Vec<CategoryCount>, ListingError> {
        let mut counts = self.repo.count_approved_by_industry().await?;
        if counts.is_empty() {
            return Ok(FALLBACK_CATEGORIES
                .iter()
                .map(|name| CategoryCount { name: (*name).to_string(), count: 0 })
                .collect());
        }
        counts.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(counts.into_iter().map(|(name, count)| CategoryCount { name, count }).collect())
    }

    fn require_admin(&self, actor: &Identity, operation: &str) -> Result<(), ListingError> {
        match actor {
            Identity::Admin { .. } => Ok(()),
            Identity::Member { id } => {
                warn!(actor_id = %id, operation, "admin_operation_refused");
                Err(ListingError::Forbidden)
            }
        }
    }
}

fn require_field(name: &str, value: &str) -> Result<(), ListingError> {
    if value.trim().is_empty() {
        return Err(ListingError::Validation(format!("{} required", name)));
    }
    Ok(())
}
