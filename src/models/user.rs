//! User model, JWT claims and permission checks

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Librarian grant: list all loans, renew and mark copies returned
    pub can_mark_returned: bool,
    /// Librarian grant: create, update and delete authors and books
    pub can_modify_catalog: bool,
}

/// Short user representation for embedding in loan listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserShort {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// New user record with an already-hashed password
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub can_mark_returned: bool,
    pub can_modify_catalog: bool,
}

/// JWT claims carried by authenticated requests
///
/// The permission grants travel in the token so handlers can gate
/// operations without a database round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub can_mark_returned: bool,
    pub can_modify_catalog: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks. These are permission gates, distinct from the
    // authentication gate in the extractor: failing one is a hard denial.

    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        if self.can_mark_returned {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Managing loans requires librarian privileges".to_string(),
            ))
        }
    }

    pub fn require_modify_catalog(&self) -> Result<(), AppError> {
        if self.can_modify_catalog {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Modifying catalog records requires librarian privileges".to_string(),
            ))
        }
    }
}
