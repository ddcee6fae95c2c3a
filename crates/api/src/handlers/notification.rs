//! Handlers for the `/notifications` resource.
//!
//! Ownership scoping: a notification that exists but belongs to someone
//! else is a 403, never a 404 -- the resource's existence is not hidden.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use shelfshare_core::error::CoreError;
use shelfshare_core::pagination::{
    clamp_page, clamp_per_page, offset, PageInfo, DEFAULT_PER_PAGE, MAX_PER_PAGE,
};
use shelfshare_core::types::DbId;
use shelfshare_db::models::notification::Notification;
use shelfshare_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    pub unread: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Load a notification and verify the caller is its recipient.
///
/// Unknown id -> 404; someone else's notification -> 403.
async fn load_owned(
    state: &AppState,
    notification_id: DbId,
    user_id: DbId,
) -> AppResult<Notification> {
    let notification = NotificationRepo::find_by_id(&state.pool, notification_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }))?;

    if notification.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only access your own notifications".into(),
        )));
    }

    Ok(notification)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
///
/// The caller's notifications, newest first, paginated, with the unread
/// count alongside.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let unread_only = params.unread.unwrap_or(false);
    let page = clamp_page(params.page);
    let per_page = clamp_per_page(params.per_page, DEFAULT_PER_PAGE, MAX_PER_PAGE);

    let total = NotificationRepo::count_for_user(&state.pool, auth.user.id, unread_only).await?;
    let items = NotificationRepo::list_for_user(
        &state.pool,
        auth.user.id,
        unread_only,
        per_page,
        offset(page, per_page),
    )
    .await?;
    let unread_count = NotificationRepo::unread_count(&state.pool, auth.user.id).await?;

    Ok(Json(serde_json::json!({
        "data": items,
        "unread_count": unread_count,
        "pagination": PageInfo::new(page, per_page, total),
    })))
}

/// GET /api/v1/notifications/count
///
/// Number of unread notifications for the caller.
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user.id).await?;

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

/// PUT /api/v1/notifications/{id}/read
///
/// Mark one notification as read. Idempotent: marking an already-read
/// notification succeeds without change.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    load_owned(&state, notification_id, auth.user.id).await?;

    let updated = NotificationRepo::mark_read(&state.pool, notification_id).await?;

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/notifications/read-all
///
/// Mark all of the caller's notifications as read. Returns the number marked.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.user.id).await?;

    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}

/// DELETE /api/v1/notifications/{id}
///
/// Delete one notification. Same scoping rules as marking read.
pub async fn delete_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, notification_id, auth.user.id).await?;

    NotificationRepo::delete(&state.pool, notification_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/notifications/clear-read
///
/// Delete all of the caller's read notifications. Returns the number deleted.
pub async fn clear_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::delete_read(&state.pool, auth.user.id).await?;

    Ok(Json(serde_json::json!({
        "data": { "deleted": count }
    })))
}

/// DELETE /api/v1/notifications/clear-all
///
/// Delete every notification for the caller. Returns the number deleted.
pub async fn clear_all(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::delete_all(&state.pool, auth.user.id).await?;

    Ok(Json(serde_json::json!({
        "data": { "deleted": count }
    })))
}
