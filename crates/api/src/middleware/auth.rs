//! JWT-based authentication extractors for Axum handlers.
//!
//! Every failure mode is a 401 with a distinct message so clients can tell
//! a missing credential from a malformed, expired, or revoked one. The
//! effect is identical in all cases: the operation is denied.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::errors::ErrorKind;
use shelfshare_core::error::CoreError;
use shelfshare_db::models::user::User;
use shelfshare_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// The extractor resolves the token's subject against the `users` table and
/// hands the handler a full [`User`] row, never a raw token. A token whose
/// subject no longer exists (deleted account) is rejected.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|err| {
            let msg = if *err.kind() == ErrorKind::ExpiredSignature {
                "Token has expired"
            } else {
                "Invalid token"
            };
            AppError::Core(CoreError::Unauthorized(msg.into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Token subject no longer exists".into(),
                ))
            })?;

        Ok(AuthUser { user })
    }
}

/// Best-effort variant of [`AuthUser`] for public endpoints that enrich
/// their response when a valid credential happens to be present.
///
/// Resolves to `None` on any guard failure instead of rejecting. Never use
/// this on lifecycle routes.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<User>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(
            AuthUser::from_request_parts(parts, state)
                .await
                .ok()
                .map(|auth| auth.user),
        ))
    }
}
