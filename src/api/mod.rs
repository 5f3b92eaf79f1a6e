//! API handlers for the Athenaeum REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod stats;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for the authenticated user from a JWT bearer token
///
/// This is the authentication gate. A request without a valid identity is
/// answered with a redirect to the login page carrying the original path,
/// so the caller can be sent back after authenticating. Permission gates
/// live on the claims and fail with a hard denial instead.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::AuthenticationRequired { next: next.clone() })?;

        // Check for Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::AuthenticationRequired { next: next.clone() })?;

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::AuthenticationRequired { next })?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items on this page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-based)
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

/// Page selector shared by the paginated listings
#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Page number (default: 1). Pages past the end return an empty list.
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}
