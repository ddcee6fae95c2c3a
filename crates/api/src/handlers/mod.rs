//! Request handlers, one submodule per resource.
//!
//! Handlers validate the caller's identity and the entity state (via the
//! pure checks in `shelfshare_core::lending`), then delegate to the
//! repositories in `shelfshare_db` and map errors via [`crate::error::AppError`].
//! The transactional lifecycle writes live in the repository layer; handlers
//! never compose multi-statement writes themselves.

pub mod auth;
pub mod book;
pub mod borrow_request;
pub mod notification;
pub mod stats;
