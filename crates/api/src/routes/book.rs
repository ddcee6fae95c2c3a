//! Route definitions for the `/books` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{book, borrow_request};
use crate::state::AppState;

/// Routes mounted at `/books`.
///
/// ```text
/// GET    /               -> list_books
/// POST   /               -> create_book
/// GET    /genres         -> genres
/// GET    /my-books       -> my_books
/// GET    /my-borrowed    -> my_borrowed
/// GET    /{id}           -> get_book
/// PUT    /{id}           -> update_book
/// DELETE /{id}           -> delete_book
/// PUT    /{id}/return    -> return_by_owner (lifecycle)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(book::list_books).post(book::create_book))
        .route("/genres", get(book::genres))
        .route("/my-books", get(book::my_books))
        .route("/my-borrowed", get(book::my_borrowed))
        .route(
            "/{id}",
            get(book::get_book)
                .put(book::update_book)
                .delete(book::delete_book),
        )
        // Owner-initiated return lives with the lifecycle handlers.
        .route("/{id}/return", put(borrow_request::return_by_owner))
}
