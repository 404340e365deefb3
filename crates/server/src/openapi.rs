use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct SocialLinksDoc {
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct CreateListingRequest {
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub industry: String,
    /// One of `Prime A`, `Prime B`, `Prime C`
    pub membership_category: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub social_links: Option<SocialLinksDoc>,
    /// At most 5 opaque image references
    pub images: Vec<String>,
    /// At most 2 opaque video references
    pub videos: Vec<String>,
}

#[derive(utoipa::ToSchema)]
pub struct SetStatusRequest {
    /// Target status; only `approved` and `rejected` are accepted
    pub status: String,
    pub review_notes: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct SetPriorityRequest {
    /// One of `high`, `medium`, `low`
    pub priority: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::admin_login,
        crate::routes::listings::categories,
        crate::routes::listings::list_approved,
        crate::routes::listings::get_approved,
        crate::routes::listings::create,
        crate::routes::listings::list_mine,
        crate::routes::listings::delete,
        crate::routes::admin::list_pending,
        crate::routes::admin::set_status,
        crate::routes::admin::set_priority,
        crate::routes::admin::statistics,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            SocialLinksDoc,
            CreateListingRequest,
            SetStatusRequest,
            SetPriorityRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "listings"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
// The debug-gated maintenance routes are deliberately absent from the document.
