//! Error types for the Athenaeum server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Login entry point unauthenticated requests are redirected to
pub const LOGIN_PATH: &str = "/accounts/login";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No recognized identity on the request. Carries the originally
    /// requested path so the caller can be sent back there after logging in.
    #[error("Authentication required")]
    AuthenticationRequired { next: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Missing authentication is a redirect to the login page, not a JSON
        // error: the two authorization failure modes must stay distinguishable.
        // The destination is percent-encoded so its own query string survives
        // inside the next parameter.
        if let AppError::AuthenticationRequired { next } = &self {
            let target = format!("{}?next={}", LOGIN_PATH, urlencoding::encode(next));
            return Redirect::to(&target).into_response();
        }

        let (status, error, message) = match &self {
            AppError::AuthenticationRequired { .. } => unreachable!(),
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, "authentication", msg.clone())
            }
            AppError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database",
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "business_rule", msg.clone())
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_authentication_redirects_with_encoded_next() {
        let err = AppError::AuthenticationRequired {
            next: "/api/v1/loans/mine?page=2&sort=due".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .expect("No Location header");
        let prefix = "/accounts/login?next=";
        assert!(location.starts_with(prefix));
        // The destination's own query string survives the round trip intact
        let next = &location[prefix.len()..];
        assert!(!next.contains('&'));
        assert!(!next.contains('?'));
        assert_eq!(
            urlencoding::decode(next).unwrap(),
            "/api/v1/loans/mine?page=2&sort=due"
        );
    }

    #[test]
    fn permission_denial_is_a_plain_forbidden() {
        let response = AppError::PermissionDenied("no grant".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get("location").is_none());
    }
}
