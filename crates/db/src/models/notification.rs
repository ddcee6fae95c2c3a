//! Notification entity model.
//!
//! Notifications are created only as side effects of lifecycle transitions;
//! there is no create DTO at the API boundary.

use serde::Serialize;
use sqlx::FromRow;
use shelfshare_core::status::NotificationKind;
use shelfshare_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub message: String,
    pub notification_type: NotificationKind,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// A notification to be inserted as part of a lifecycle transaction.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: DbId,
    pub message: String,
    pub kind: NotificationKind,
}
