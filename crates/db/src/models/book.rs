//! Book entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use shelfshare_core::status::BookStatus;
use shelfshare_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::user::UserSummary;

/// A row from the `books` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub cover_image: String,
    pub genre: String,
    pub status: BookStatus,
    pub owner_id: DbId,
    pub borrower_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A book row joined with the display info of its parties.
///
/// Listing queries alias the joined `users` columns to `owner_name`,
/// `owner_apartment_number`, `borrower_name`, and `borrower_apartment_number`;
/// queries that do not join a party select NULL for its columns.
#[derive(Debug, Clone, FromRow)]
pub struct BookListing {
    #[sqlx(flatten)]
    pub book: Book,
    pub owner_name: Option<String>,
    pub owner_apartment_number: Option<String>,
    pub borrower_name: Option<String>,
    pub borrower_apartment_number: Option<String>,
}

impl BookListing {
    /// Shape the row for API output, nesting party summaries where the
    /// query joined them.
    pub fn into_view(self) -> BookView {
        let owner = match (self.owner_name, self.owner_apartment_number) {
            (Some(name), Some(apartment_number)) => Some(UserSummary {
                id: self.book.owner_id,
                name,
                apartment_number,
            }),
            _ => None,
        };
        let borrower = match (
            self.book.borrower_id,
            self.borrower_name,
            self.borrower_apartment_number,
        ) {
            (Some(id), Some(name), Some(apartment_number)) => Some(UserSummary {
                id,
                name,
                apartment_number,
            }),
            _ => None,
        };
        BookView {
            book: self.book,
            owner,
            borrower,
        }
    }
}

/// API-facing book payload with optional embedded parties.
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower: Option<UserSummary>,
}

/// DTO for listing a new book.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "author must be 1-200 characters"))]
    pub author: String,
    #[validate(length(max = 500, message = "cover_image must be at most 500 characters"))]
    #[serde(default)]
    pub cover_image: String,
    #[validate(length(min = 1, max = 50, message = "genre must be 1-50 characters"))]
    pub genre: Option<String>,
}

/// DTO for updating a book's metadata. All fields are optional.
///
/// Deliberately has no status or borrower field: availability only changes
/// through the borrow lifecycle.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200, message = "author must be 1-200 characters"))]
    pub author: Option<String>,
    #[validate(length(max = 500, message = "cover_image must be at most 500 characters"))]
    pub cover_image: Option<String>,
    #[validate(length(min = 1, max = 50, message = "genre must be 1-50 characters"))]
    pub genre: Option<String>,
}
