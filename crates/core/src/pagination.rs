//! 1-based page/per-page pagination math for list endpoints.
//!
//! List endpoints surface `page` and `per_page` query parameters and return
//! a [`PageInfo`] block with totals and navigation flags alongside the items.

use serde::Serialize;

/// Default page size for paginated listings.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Maximum page size for paginated listings.
pub const MAX_PER_PAGE: i64 = 100;

/// Pagination metadata returned to callers of list operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number.
    pub page: i64,
    pub per_page: i64,
    /// Total matching rows across all pages.
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    /// Build page metadata from a (already clamped) page/per_page pair and
    /// the total row count.
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1 && total > 0,
        }
    }
}

/// Clamp a requested page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a requested page size into `1..=max`, falling back to `default`.
pub fn clamp_per_page(per_page: Option<i64>, default: i64, max: i64) -> i64 {
    per_page.unwrap_or(default).clamp(1, max)
}

/// SQL OFFSET for a 1-based page.
pub fn offset(page: i64, per_page: i64) -> i64 {
    (page - 1) * per_page
}
