//! Domain layer for the shelfshare lending coordinator.
//!
//! Zero-IO building blocks shared by the persistence and API crates:
//!
//! - [`error`] -- the [`CoreError`](error::CoreError) taxonomy every layer maps into
//! - [`types`] -- database id and timestamp aliases
//! - [`status`] -- book / borrow-request status enums and their transition rules
//! - [`lending`] -- lifecycle precondition checks and notification message builders
//! - [`pagination`] -- 1-based page math for list endpoints

pub mod error;
pub mod lending;
pub mod pagination;
pub mod status;
pub mod types;
