//! Borrow request entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use shelfshare_core::status::RequestStatus;
use shelfshare_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::user::UserSummary;

/// A row from the `borrow_requests` table.
///
/// `lender_id` is frozen at creation time (the book's owner when the request
/// was made) and never re-derived from the book afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BorrowRequest {
    pub id: DbId,
    pub book_id: DbId,
    pub borrower_id: DbId,
    pub lender_id: DbId,
    pub status: RequestStatus,
    pub message: String,
    pub requested_at: Timestamp,
    pub responded_at: Option<Timestamp>,
    pub returned_at: Option<Timestamp>,
}

/// A request row joined with book and party display info for listings.
///
/// The book columns are nullable: a request can be inspected even if its
/// book row is gone (see the reject path), so nothing here assumes the
/// join matched.
#[derive(Debug, Clone, FromRow)]
pub struct RequestListing {
    #[sqlx(flatten)]
    pub request: BorrowRequest,
    pub book_title: Option<String>,
    pub book_author: Option<String>,
    pub borrower_name: Option<String>,
    pub borrower_apartment_number: Option<String>,
    pub lender_name: Option<String>,
    pub lender_apartment_number: Option<String>,
}

impl RequestListing {
    pub fn into_view(self) -> RequestView {
        let book = match (self.book_title, self.book_author) {
            (Some(title), Some(author)) => Some(RequestBookSummary {
                id: self.request.book_id,
                title,
                author,
            }),
            _ => None,
        };
        let borrower = match (self.borrower_name, self.borrower_apartment_number) {
            (Some(name), Some(apartment_number)) => Some(UserSummary {
                id: self.request.borrower_id,
                name,
                apartment_number,
            }),
            _ => None,
        };
        let lender = match (self.lender_name, self.lender_apartment_number) {
            (Some(name), Some(apartment_number)) => Some(UserSummary {
                id: self.request.lender_id,
                name,
                apartment_number,
            }),
            _ => None,
        };
        RequestView {
            request: self.request,
            book,
            borrower,
            lender,
        }
    }
}

/// Compact book info embedded in request payloads.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBookSummary {
    pub id: DbId,
    pub title: String,
    pub author: String,
}

/// API-facing request payload with embedded book and parties.
#[derive(Debug, Clone, Serialize)]
pub struct RequestView {
    #[serde(flatten)]
    pub request: BorrowRequest,
    pub book: Option<RequestBookSummary>,
    pub borrower: Option<UserSummary>,
    pub lender: Option<UserSummary>,
}

/// Command to create a borrow request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBorrowRequest {
    pub book_id: DbId,
    #[validate(length(max = 1000, message = "message must be at most 1000 characters"))]
    #[serde(default)]
    pub message: String,
}
