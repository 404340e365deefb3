use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::domain::Identity;
use service::listings::domain::{
    ApprovedFilter, CategoryCount, CreateListingInput, Listing, ListingStatus, MembershipCategory,
    Priority, SocialLinks,
};
use service::listings::errors::ListingError;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

/// Member/public serialization of a listing. Reviewer notes are deliberately
/// absent; only the admin views carry them.
#[derive(Debug, Serialize)]
pub struct ListingView {
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
    pub approved_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Listing> for ListingView {
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
            approved_date: l.approved_date,
            created_at: l.created_at,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ApprovedQuery {
    pub industry: Option<String>,
    pub membership_category: Option<String>,
    pub search: Option<String>,
}

/// `all` means unfiltered for both select-style parameters.
fn approved_filter(q: ApprovedQuery) -> Result<ApprovedFilter, ApiError> {
    let industry = q.industry.filter(|v| !v.is_empty() && v.as_str() != "all");
    let membership_category = match q.membership_category.filter(|v| !v.is_empty() && v.as_str() != "all") {
        Some(raw) => Some(MembershipCategory::parse(&raw).ok_or_else(|| {
            ApiError::from(ListingError::Validation(format!("unknown membership category `{}`", raw)))
        })?),
        None => None,
    };
    let search = q.search.filter(|v| !v.trim().is_empty());
    Ok(ApprovedFilter { industry, membership_category, search })
}

#[utoipa::path(get, path = "/listings/categories", tag = "listings", responses((status = 200, description = "OK")))]
pub async fn categories(State(state): State<ServerState>) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let categories = state.listings.categories().await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get, path = "/listings/approved", tag = "listings",
    params(ApprovedQuery),
    responses(
        (status = 200, description = "OK"),
        (status = 400, description = "Bad Request")
    )
)]
pub async fn list_approved(
    State(state): State<ServerState>,
    Query(q): Query<ApprovedQuery>,
) -> Result<Json<Vec<ListingView>>, ApiError> {
    let filter = approved_filter(q)?;
    let listings = state.listings.list_approved(&filter).await?;
    Ok(Json(listings.into_iter().map(ListingView::from).collect()))
}

#[utoipa::path(
    get, path = "/listings/{id}", tag = "listings",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_approved(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingView>, ApiError> {
    let listing = state.listings.get_approved(id).await?;
    Ok(Json(listing.into()))
}

#[utoipa::path(
    post, path = "/listings", tag = "listings",
    request_body = crate::openapi::CreateListingRequest,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<CreateListingInput>,
) -> Result<(StatusCode, Json<ListingView>), ApiError> {
    let created = state.listings.create(&identity, input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get, path = "/listings/mine", tag = "listings",
    responses(
        (status = 200, description = "OK"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ListingView>>, ApiError> {
    let listings = state.listings.list_owned(&identity).await?;
    Ok(Json(listings.into_iter().map(ListingView::from).collect()))
}

#[utoipa::path(
    delete, path = "/listings/{id}", tag = "listings",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.listings.delete(id, &identity).await?;
    Ok(StatusCode::NO_CONTENT)
}
