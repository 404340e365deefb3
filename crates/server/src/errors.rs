use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use service::auth::errors::AuthError;
use service::listings::errors::ListingError;

/// Uniform JSON error response carrying the stable service error code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: u16, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }

    pub fn unauthenticated() -> Self {
        Self::from(AuthError::Unauthenticated)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 5xx at error, everything else at warn
        if self.status.is_server_error() {
            error!(code = self.code, status = %self.status, message = %self.message, "request_failed");
        } else {
            warn!(code = self.code, status = %self.status, message = %self.message, "request_refused");
        }
        let body = serde_json::json!({"error": {"code": self.code, "message": self.message}});
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let status = match &e {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Hash(_) | AuthError::Token(_) | AuthError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError::new(status, e.code(), e.to_string())
    }
}

impl From<ListingError> for ApiError {
    fn from(e: ListingError) -> Self {
        let status = match &e {
            ListingError::Validation(_) | ListingError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            ListingError::NotFound => StatusCode::NOT_FOUND,
            ListingError::Forbidden => StatusCode::FORBIDDEN,
            ListingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, e.code(), e.to_string())
    }
}
