use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation status. `review` parses and persists but no defined
/// transition produces it; approved and rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Review,
    Approved,
    Rejected,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Review => "review",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ListingStatus::Pending),
            "review" => Some(ListingStatus::Review),
            "approved" => Some(ListingStatus::Approved),
            "rejected" => Some(ListingStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrator-settable ordering hint; has no effect on visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Fixed membership tiers carried on every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipCategory {
    #[serde(rename = "Prime A")]
    PrimeA,
    #[serde(rename = "Prime B")]
    PrimeB,
    #[serde(rename = "Prime C")]
    PrimeC,
}

impl MembershipCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipCategory::PrimeA => "Prime A",
            MembershipCategory::PrimeB => "Prime B",
            MembershipCategory::PrimeC => "Prime C",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Prime A" => Some(MembershipCategory::PrimeA),
            "Prime B" => Some(MembershipCategory::PrimeB),
            "Prime C" => Some(MembershipCategory::PrimeC),
            _ => None,
        }
    }
}

/// Per-platform profile links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Listing domain view shared by every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub industry: String,
    pub membership_category: MembershipCategory,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub social_links: SocialLinks,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub status: ListingStatus,
    pub priority: Priority,
    pub review_notes: Option<String>,
    pub approved_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission input; media references arrive fully formed from the upload
/// collaborator and are stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingInput {
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub industry: String,
    pub membership_category: MembershipCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
}

/// Filters for the public approved-listing view.
#[derive(Debug, Clone, Default)]
pub struct ApprovedFilter {
    pub industry: Option<String>,
    pub membership_category: Option<MembershipCategory>,
    pub search: Option<String>,
}

/// One row of the category directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}
