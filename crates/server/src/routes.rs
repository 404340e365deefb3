use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod admin;
pub mod auth;
pub mod listings;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public directory views, authenticated
/// member routes and the admin moderation surface.
pub fn build_router(state: ServerState, cors: CorsLayer, debug: &configs::DebugConfig) -> Router {
    // Public routes: no token required
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/admin/login", post(auth::admin_login))
        .route("/listings/categories", get(listings::categories))
        .route("/listings/approved", get(listings::list_approved))
        .route("/listings/:id", get(listings::get_approved));

    // Member routes: token required, ownership enforced by the service
    let member = Router::new()
        .route("/listings", post(listings::create))
        .route("/listings/mine", get(listings::list_mine))
        .route("/listings/:id", delete(listings::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_identity));

    // Admin routes: token required here, the admin capability is checked in
    // the service so a refusal can never leave partial state behind
    let admin_routes = Router::new()
        .route("/admin/listings/pending", get(admin::list_pending))
        .route("/admin/listings/:id/status", patch(admin::set_status))
        .route("/admin/listings/:id/priority", patch(admin::set_priority))
        .route("/admin/statistics", get(admin::statistics))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_identity));

    let mut app = public.merge(member).merge(admin_routes);

    // Non-production maintenance surface; absent entirely unless enabled
    if debug.user_maintenance {
        let maintenance = Router::new()
            .route("/auth/create-admin", post(auth::create_admin))
            .route("/admin/users", get(admin::list_users).delete(admin::delete_all_users));
        app = app.merge(maintenance);
    }

    app
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // One span per request with method and path at INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // Response event carries status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and transport failures logged at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
