//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /              -> list_notifications
/// GET    /count         -> unread_count
/// PUT    /read-all      -> mark_all_read
/// DELETE /clear-read    -> clear_read
/// DELETE /clear-all     -> clear_all
/// PUT    /{id}/read     -> mark_read
/// DELETE /{id}          -> delete_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list_notifications))
        .route("/count", get(notification::unread_count))
        .route("/read-all", put(notification::mark_all_read))
        .route("/clear-read", delete(notification::clear_read))
        .route("/clear-all", delete(notification::clear_all))
        .route("/{id}/read", put(notification::mark_read))
        .route("/{id}", delete(notification::delete_notification))
}
