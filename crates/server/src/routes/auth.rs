use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::{AuthSession, LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthService;
use service::listings::repo::seaorm::SeaOrmListingRepository;
use service::listings::service::ListingService;

use crate::errors::ApiError;

pub type SharedAuthService = Arc<AuthService<SeaOrmAuthRepository>>;
pub type SharedListingService = Arc<ListingService<SeaOrmListingRepository>>;

#[derive(Clone)]
pub struct ServerState {
    pub auth: SharedAuthService,
    pub listings: SharedListingService,
}

#[derive(Serialize)]
pub struct SessionOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub token: String,
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: Uuid,
}

/// Hand the token back in the body and as an HttpOnly cookie.
fn session_response(jar: CookieJar, session: AuthSession) -> (CookieJar, Json<SessionOutput>) {
    let mut cookie = Cookie::new("auth_token", session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(axum_extra::extract::cookie::SameSite::Lax);
    let jar = jar.add(cookie);
    let out = SessionOutput {
        user_id: session.user.id,
        email: session.user.email,
        name: session.user.name,
        is_admin: session.user.is_admin,
        token: session.token,
    };
    (jar, Json(out))
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<RegisterInput>,
) -> Result<(CookieJar, Json<SessionOutput>), ApiError> {
    let session = state.auth.register(input).await?;
    Ok(session_response(jar, session))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<SessionOutput>), ApiError> {
    let session = state.auth.login(input).await?;
    Ok(session_response(jar, session))
}

#[utoipa::path(post, path = "/auth/admin/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn admin_login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<SessionOutput>), ApiError> {
    let session = state.auth.admin_login(input).await?;
    Ok(session_response(jar, session))
}

/// Administrator bootstrap. Mounted only when `[debug] user_maintenance`
/// is set; a production deployment never exposes this.
pub async fn create_admin(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<RegisterOutput>, ApiError> {
    let user = state.auth.create_admin(input).await?;
    Ok(Json(RegisterOutput { user_id: user.id }))
}

/// Middleware for the authenticated routes: resolves the acting identity
/// from `Authorization: Bearer <token>`, falling back to the `auth_token`
/// cookie, and stores it in request extensions for the handlers.
pub async fn require_identity(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();

    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(ApiError::unauthenticated());
            }
            h[prefix.len()..].to_string()
        } else {
            // Cookie fallback: parse the Cookie header for auth_token
            let cookie_header = req
                .headers()
                .get(axum::http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");

            let mut token_val: Option<String> = None;
            for part in cookie_header.split(';') {
                let kv = part.trim();
                if let Some(rest) = kv.strip_prefix("auth_token=") {
                    token_val = Some(rest.to_string());
                    break;
                }
            }

            match token_val {
                Some(t) if !t.is_empty() => t,
                _ => {
                    tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
                    return Err(ApiError::unauthenticated());
                }
            }
        }
    };

    let identity = state.auth.authenticate(&token).await.map_err(ApiError::from)?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
