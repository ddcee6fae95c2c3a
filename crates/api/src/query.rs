//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Query parameters for list endpoints filterable by a status name
/// (`?status=pending`, `?status=all`). Each handler resolves the string
/// against its own status vocabulary.
#[derive(Debug, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}
