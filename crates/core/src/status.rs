//! Closed status enumerations for books, borrow requests, and notifications.
//!
//! Statuses are stored as PostgreSQL enum types (see the initial migration),
//! so an unrecognized value can exist neither in the database nor in memory.
//! Transition rules live here so the repository and API layers share one
//! source of truth.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Book availability
// ---------------------------------------------------------------------------

/// Availability state of a book. Maps to the `book_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "book_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl BookStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Borrowed => "borrowed",
        }
    }

    /// Parse a status from its wire name.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "available" => Ok(BookStatus::Available),
            "borrowed" => Ok(BookStatus::Borrowed),
            other => Err(CoreError::Validation(format!(
                "Invalid book status '{other}'. Must be 'available' or 'borrowed'"
            ))),
        }
    }

    /// Whether a book may move from `self` to `to`.
    ///
    /// The only legal transitions are `available -> borrowed` (approval) and
    /// `borrowed -> available` (return). There is no direct "set status"
    /// operation anywhere above this layer.
    pub fn can_transition(self, to: BookStatus) -> bool {
        matches!(
            (self, to),
            (BookStatus::Available, BookStatus::Borrowed)
                | (BookStatus::Borrowed, BookStatus::Available)
        )
    }
}

// ---------------------------------------------------------------------------
// Borrow request lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle state of a borrow request. Maps to the `request_status`
/// Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Returned,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
            RequestStatus::Returned => "returned",
        }
    }

    /// Parse a status from its wire name.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "cancelled" => Ok(RequestStatus::Cancelled),
            "returned" => Ok(RequestStatus::Returned),
            other => Err(CoreError::Validation(format!(
                "Invalid request status '{other}'. Must be one of: \
                 pending, approved, rejected, cancelled, returned"
            ))),
        }
    }

    /// The set of statuses `self` may transition to.
    ///
    /// Transition rules:
    /// - `pending`  -> `approved`, `rejected`, `cancelled`
    /// - `approved` -> `returned`
    /// - everything else is terminal
    pub fn valid_transitions(self) -> &'static [RequestStatus] {
        match self {
            RequestStatus::Pending => &[
                RequestStatus::Approved,
                RequestStatus::Rejected,
                RequestStatus::Cancelled,
            ],
            RequestStatus::Approved => &[RequestStatus::Returned],
            _ => &[],
        }
    }

    pub fn can_transition(self, to: RequestStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// `rejected`, `cancelled`, and `returned` admit no further transition.
    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Notification kinds
// ---------------------------------------------------------------------------

/// Event tag attached to every notification. Maps to the `notification_type`
/// Postgres enum.
///
/// The `return` wire name (owner-marked return) is a Rust keyword, hence the
/// `ReturnMarked` variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BorrowRequest,
    RequestApproved,
    RequestRejected,
    RequestCancelled,
    BookReturned,
    #[sqlx(rename = "return")]
    #[serde(rename = "return")]
    ReturnMarked,
    Info,
}
