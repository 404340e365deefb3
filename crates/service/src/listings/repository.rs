use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{ApprovedFilter, Listing, ListingStatus, Priority};
use super::errors::ListingError;

/// Repository abstraction for listing persistence.
///
/// List operations return newest-created-first. `update_moderation` writes
/// status, approval timestamp and (when given) reviewer notes in one store
/// update, so a transition is never half applied.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert(&self, listing: Listing) -> Result<Listing, ListingError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingError>;

    async fn list_approved(&self, filter: &ApprovedFilter) -> Result<Vec<Listing>, ListingError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, ListingError>;
    async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ListingError>;

    async fn update_moderation(
        &self,
        id: Uuid,
        status: ListingStatus,
        review_notes: Option<String>,
        approved_date: Option<DateTime<Utc>>,
    ) -> Result<Listing, ListingError>;
    async fn update_priority(&self, id: Uuid, priority: Priority) -> Result<Listing, ListingError>;
    async fn delete(&self, id: Uuid) -> Result<(), ListingError>;

    async fn count_by_status(&self) -> Result<Vec<(String, u64)>, ListingError>;
    async fn count_approved_by_industry(&self) -> Result<Vec<(String, u64)>, ListingError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockListingRepository {
        listings: Mutex<HashMap<Uuid, Listing>>,
    }

    fn newest_first(mut items: Vec<Listing>) -> Vec<Listing> {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    fn matches_search(listing: &Listing, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        if listing.business_name.to_lowercase().contains(&needle) {
            return true;
        }
        listing
            .description
            .as_deref()
            .map(|d| d.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }

    #[async_trait]
    impl ListingRepository for MockListingRepository {
        async fn insert(&self, listing: Listing) -> Result<Listing, ListingError> {
            let mut listings = self.listings.lock().unwrap();
            listings.insert(listing.id, listing.clone());
            Ok(listing)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingError> {
            let listings = self.listings.lock().unwrap();
            Ok(listings.get(&id).cloned())
        }

        async fn list_approved(&self, filter: &ApprovedFilter) -> Result<Vec<Listing>, ListingError> {
            let listings = self.listings.lock().unwrap();
            let matched = listings
                .values()
                .filter(|l| l.status == ListingStatus::Approved)
                .filter(|l| filter.industry.as_deref().map_or(true, |i| l.industry == i))
                .filter(|l| filter.membership_category.map_or(true, |c| l.membership_category == c))
                .filter(|l| filter.search.as_deref().map_or(true, |q| matches_search(l, q)))
                .cloned()
                .collect();
            Ok(newest_first(matched))
        }

        async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, ListingError> {
            let listings = self.listings.lock().unwrap();
            let matched = listings.values().filter(|l| l.owner_id == owner_id).cloned().collect();
            Ok(newest_first(matched))
        }

        async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ListingError> {
            let listings = self.listings.lock().unwrap();
            let matched = listings.values().filter(|l| l.status == status).cloned().collect();
            Ok(newest_first(matched))
        }

        async fn update_moderation(
            &self,
            id: Uuid,
            status: ListingStatus,
            review_notes: Option<String>,
            approved_date: Option<DateTime<Utc>>,
        ) -> Result<Listing, ListingError> {
            let mut listings = self.listings.lock().unwrap();
            let listing = listings.get_mut(&id).ok_or(ListingError::NotFound)?;
            listing.status = status;
            listing.approved_date = approved_date;
            if let Some(notes) = review_notes {
                listing.review_notes = Some(notes);
            }
            listing.updated_at = Utc::now();
            Ok(listing.clone())
        }

        async fn update_priority(&self, id: Uuid, priority: Priority) -> Result<Listing, ListingError> {
            let mut listings = self.listings.lock().unwrap();
            let listing = listings.get_mut(&id).ok_or(ListingError::NotFound)?;
            listing.priority = priority;
            listing.updated_at = Utc::now();
            Ok(listing.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), ListingError> {
            let mut listings = self.listings.lock().unwrap();
            listings.remove(&id).ok_or(ListingError::NotFound)?;
            Ok(())
        }

        async fn count_by_status(&self) -> Result<Vec<(String, u64)>, ListingError> {
            let listings = self.listings.lock().unwrap();
            let mut counts: HashMap<String, u64> = HashMap::new();
            for l in listings.values() {
                *counts.entry(l.status.as_str().to_string()).or_insert(0) += 1;
            }
            Ok(counts.into_iter().collect())
        }

        async fn count_approved_by_industry(&self) -> Result<Vec<(String, u64)>, ListingError> {
            let listings = self.listings.lock().unwrap();
            let mut counts: HashMap<String, u64> = HashMap::new();
            for l in listings.values().filter(|l| l.status == ListingStatus::Approved) {
                *counts.entry(l.industry.clone()).or_insert(0) += 1;
            }
            Ok(counts.into_iter().collect())
        }
    }
}
