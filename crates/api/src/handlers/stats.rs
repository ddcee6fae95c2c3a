//! Handler for the public community stats endpoint.

use axum::extract::State;
use axum::Json;
use shelfshare_db::repositories::{NotificationRepo, StatsRepo};

use crate::error::AppResult;
use crate::middleware::auth::OptionalAuthUser;
use crate::state::AppState;

/// GET /api/v1/stats
///
/// Community-wide counts. Public; when a valid credential is presented the
/// caller's unread notification count is included.
pub async fn community_stats(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let stats = StatsRepo::community(&state.pool).await?;

    let mut data = serde_json::to_value(&stats)
        .map_err(|e| crate::error::AppError::InternalError(e.to_string()))?;

    if let Some(user) = user {
        let unread = NotificationRepo::unread_count(&state.pool, user.id).await?;
        data["unread_notifications"] = serde_json::json!(unread);
    }

    Ok(Json(serde_json::json!({ "data": data })))
}
