pub mod auth;
pub mod book;
pub mod borrow_request;
pub mod health;
pub mod notification;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                        register (public)
/// /auth/login                           login (public)
/// /auth/me                              current user (requires auth)
///
/// /books                                list, create
/// /books/genres                         distinct genres
/// /books/my-books                       caller's shelf (?status=)
/// /books/my-borrowed                    books the caller holds
/// /books/{id}                           get, update, delete
/// /books/{id}/return                    owner-initiated return (PUT)
///
/// /requests                             create (POST)
/// /requests/incoming                    requests to the caller (?status=)
/// /requests/outgoing                    requests by the caller (?status=)
/// /requests/history                     caller's full history
/// /requests/{id}                        get (lender or borrower only)
/// /requests/{id}/approve                approve (PUT, lender)
/// /requests/{id}/reject                 reject (PUT, lender)
/// /requests/{id}/cancel                 cancel (PUT, borrower)
/// /requests/{id}/return                 return (PUT, borrower)
///
/// /notifications                        list (?unread, page, per_page)
/// /notifications/count                  unread count
/// /notifications/read-all               mark all read (PUT)
/// /notifications/clear-read             delete read (DELETE)
/// /notifications/clear-all              delete all (DELETE)
/// /notifications/{id}/read              mark read (PUT)
/// /notifications/{id}                   delete (DELETE)
///
/// /stats                                community counts (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/books", book::router())
        .nest("/requests", borrow_request::router())
        .nest("/notifications", notification::router())
        .route("/stats", get(handlers::stats::community_stats))
}
