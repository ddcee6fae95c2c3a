//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use shelfshare_core::types::{DbId, Timestamp};
use validator::Validate;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub apartment_number: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl User {
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            apartment_number: self.apartment_number.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub apartment_number: String,
    pub name: String,
    pub created_at: Timestamp,
}

/// Compact user info embedded in book and request payloads.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub apartment_number: String,
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 20, message = "apartment_number must be 1-20 characters"))]
    pub apartment_number: String,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub password_hash: String,
}
