use std::collections::BTreeMap;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::domain::{AuthUser, Identity};
use service::listings::domain::{Listing, ListingStatus, MembershipCategory, Priority, SocialLinks};

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

/// Moderation serialization of a listing; unlike the member view this one
/// carries the reviewer notes.
#[derive(Debug, Serialize)]
pub struct ModerationListingView {
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
}

impl From<Listing> for ModerationListingView {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            owner_id: l.owner_id,
            business_name: l.business_name,
            contact_name: l.contact_name,
            email: l.email,
            phone: l.phone,
            industry: l.industry,
            membership_category: l.membership_category,
            description: l.description,
            website_url: l.website_url,
            social_links: l.social_links,
            images: l.images,
            videos: l.videos,
            status: l.status,
            priority: l.priority,
            review_notes: l.review_notes,
            approved_date: l.approved_date,
            created_at: l.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStatusInput {
    pub status: ListingStatus,
    #[serde(default)]
    pub review_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPriorityInput {
    pub priority: Priority,
}

/// Account view for the debug-gated maintenance routes; never includes
/// credential material.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<AuthUser> for UserView {
    fn from(u: AuthUser) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            is_admin: u.is_admin,
            business_name: u.business_name,
            phone: u.phone,
            address: u.address,
        }
    }
}

#[utoipa::path(
    get, path = "/admin/listings/pending", tag = "admin",
    responses(
        (status = 200, description = "OK"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_pending(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ModerationListingView>>, ApiError> {
    let listings = state.listings.list_pending(&identity).await?;
    Ok(Json(listings.into_iter().map(ModerationListingView::from).collect()))
}

#[utoipa::path(
    patch, path = "/admin/listings/{id}/status", tag = "admin",
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = crate::openapi::SetStatusRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Invalid Status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_status(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(input): Json<SetStatusInput>,
) -> Result<Json<ModerationListingView>, ApiError> {
    let updated = state
        .listings
        .set_status(id, &identity, input.status, input.review_notes)
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    patch, path = "/admin/listings/{id}/priority", tag = "admin",
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = crate::openapi::SetPriorityRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_priority(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(input): Json<SetPriorityInput>,
) -> Result<Json<ModerationListingView>, ApiError> {
    let updated = state.listings.set_priority(id, &identity, input.priority).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    get, path = "/admin/statistics", tag = "admin",
    responses(
        (status = 200, description = "OK"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn statistics(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<BTreeMap<String, u64>>, ApiError> {
    let counts = state.listings.status_counts(&identity).await?;
    Ok(Json(counts))
}

// Debug-gated maintenance routes below; build_router mounts them only when
// `[debug] user_maintenance` is set.

pub async fn list_users(State(state): State<ServerState>) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = state.auth.list_users().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

pub async fn delete_all_users(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.auth.delete_all_users().await?;
    Ok(Json(serde_json::json!({"deleted": deleted})))
}
