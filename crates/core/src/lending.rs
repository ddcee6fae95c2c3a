//! Borrow-lifecycle precondition checks and notification message builders.
//!
//! The checks validate actor identity and entity state before a lifecycle
//! operation touches the store. They are pure so both the API handlers and
//! tests can exercise them without a database. The final word on races stays
//! with the transactional repository operations, which re-verify state with
//! conditional updates.

use crate::error::CoreError;
use crate::status::{BookStatus, RequestStatus};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Precondition checks
// ---------------------------------------------------------------------------

/// Preconditions for creating a borrow request against a book.
pub fn check_create_request(
    book_owner: DbId,
    book_status: BookStatus,
    borrower: DbId,
) -> Result<(), CoreError> {
    if book_owner == borrower {
        return Err(CoreError::Validation(
            "You cannot borrow your own book".into(),
        ));
    }
    if book_status != BookStatus::Available {
        return Err(CoreError::InvalidState(
            "This book is not available for borrowing".into(),
        ));
    }
    Ok(())
}

/// Preconditions for a lender responding to a request (approve / reject).
pub fn check_lender_response(
    lender: DbId,
    actor: DbId,
    status: RequestStatus,
    action: &str,
) -> Result<(), CoreError> {
    if lender != actor {
        return Err(CoreError::Forbidden(format!(
            "Only the book owner can {action} requests"
        )));
    }
    if status != RequestStatus::Pending {
        return Err(CoreError::InvalidState(format!(
            "Cannot {action}. Request status is: {}",
            status.as_str()
        )));
    }
    Ok(())
}

/// Preconditions for a borrower cancelling their own pending request.
pub fn check_cancel(borrower: DbId, actor: DbId, status: RequestStatus) -> Result<(), CoreError> {
    if borrower != actor {
        return Err(CoreError::Forbidden(
            "Only the borrower can cancel the request".into(),
        ));
    }
    if status != RequestStatus::Pending {
        return Err(CoreError::InvalidState(format!(
            "Cannot cancel. Request status is: {}",
            status.as_str()
        )));
    }
    Ok(())
}

/// Preconditions for a borrower returning a book via its approved request.
pub fn check_return_via_request(
    borrower: DbId,
    actor: DbId,
    status: RequestStatus,
) -> Result<(), CoreError> {
    if borrower != actor {
        return Err(CoreError::Forbidden(
            "Only the borrower can return the book".into(),
        ));
    }
    if status != RequestStatus::Approved {
        return Err(CoreError::InvalidState(format!(
            "Cannot return. Request status is: {}",
            status.as_str()
        )));
    }
    Ok(())
}

/// Preconditions for an owner marking their borrowed book as returned.
pub fn check_owner_return(
    owner: DbId,
    actor: DbId,
    book_status: BookStatus,
) -> Result<(), CoreError> {
    if owner != actor {
        return Err(CoreError::Forbidden(
            "Only the owner can mark a book as returned".into(),
        ));
    }
    if book_status != BookStatus::Borrowed {
        return Err(CoreError::InvalidState(
            "This book is not currently borrowed".into(),
        ));
    }
    Ok(())
}

/// Preconditions for an owner editing or deleting a book.
///
/// Metadata changes and deletion are refused while the book is lent out.
pub fn check_book_mutable(
    owner: DbId,
    actor: DbId,
    book_status: BookStatus,
    action: &str,
) -> Result<(), CoreError> {
    if owner != actor {
        return Err(CoreError::Forbidden(format!(
            "You can only {action} your own books"
        )));
    }
    if book_status == BookStatus::Borrowed {
        return Err(CoreError::InvalidState(format!(
            "Cannot {action} a book that is currently borrowed"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Notification messages
// ---------------------------------------------------------------------------

/// Messages are built before the lifecycle transaction starts so the
/// repository layer only inserts finished strings.
pub mod messages {
    /// To the lender when a borrow request is created.
    pub fn borrow_requested(borrower_name: &str, borrower_unit: &str, title: &str) -> String {
        format!("{borrower_name} (Apt {borrower_unit}) wants to borrow \"{title}\".")
    }

    /// To the winning borrower on approval.
    pub fn request_approved(title: &str, lender_unit: &str) -> String {
        format!(
            "Your request to borrow \"{title}\" has been approved! \
             Pick it up from Apt {lender_unit}."
        )
    }

    /// To each losing borrower when a sibling request wins.
    pub fn request_lost(title: &str) -> String {
        format!(
            "Your request to borrow \"{title}\" was declined \
             because the book was lent to someone else."
        )
    }

    /// To the borrower on an explicit rejection.
    ///
    /// `title` is optional: a request can outlive its book in a degraded
    /// store, and the message must not depend on dereferencing it.
    pub fn request_rejected(title: Option<&str>, lender_unit: &str) -> String {
        match title {
            Some(title) => format!(
                "Your request to borrow \"{title}\" has been declined by Apt {lender_unit}."
            ),
            None => format!("Your borrow request has been declined by Apt {lender_unit}."),
        }
    }

    /// To the lender when the borrower cancels.
    pub fn request_cancelled(borrower_name: &str, borrower_unit: &str, title: &str) -> String {
        format!(
            "{borrower_name} (Apt {borrower_unit}) cancelled their request \
             to borrow \"{title}\"."
        )
    }

    /// To the lender when the borrower returns the book.
    pub fn book_returned(borrower_name: &str, borrower_unit: &str, title: &str) -> String {
        format!("{borrower_name} (Apt {borrower_unit}) has returned \"{title}\".")
    }

    /// To the borrower when the owner marks the book returned.
    pub fn return_marked(title: &str, owner_unit: &str) -> String {
        format!("\"{title}\" has been marked as returned by Apt {owner_unit}.")
    }
}
