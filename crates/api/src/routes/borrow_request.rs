//! Route definitions for the `/requests` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::borrow_request;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// POST /               -> create_request
/// GET  /incoming       -> incoming_requests
/// GET  /outgoing       -> outgoing_requests
/// GET  /history        -> request_history
/// GET  /{id}           -> get_request
/// PUT  /{id}/approve   -> approve_request
/// PUT  /{id}/reject    -> reject_request
/// PUT  /{id}/cancel    -> cancel_request
/// PUT  /{id}/return    -> return_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(borrow_request::create_request))
        .route("/incoming", get(borrow_request::incoming_requests))
        .route("/outgoing", get(borrow_request::outgoing_requests))
        .route("/history", get(borrow_request::request_history))
        .route("/{id}", get(borrow_request::get_request))
        .route("/{id}/approve", put(borrow_request::approve_request))
        .route("/{id}/reject", put(borrow_request::reject_request))
        .route("/{id}/cancel", put(borrow_request::cancel_request))
        .route("/{id}/return", put(borrow_request::return_request))
}
