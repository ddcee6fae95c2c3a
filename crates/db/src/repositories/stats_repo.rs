//! Aggregate counts for the public stats endpoint.

use serde::Serialize;
use sqlx::PgPool;

/// Community-wide totals.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommunityStats {
    pub total_users: i64,
    pub total_books: i64,
    pub available_books: i64,
    pub borrowed_books: i64,
    pub total_requests: i64,
    pub pending_requests: i64,
}

pub struct StatsRepo;

impl StatsRepo {
    /// Gather all counts in a single round trip.
    pub async fn community(pool: &PgPool) -> Result<CommunityStats, sqlx::Error> {
        sqlx::query_as::<_, CommunityStats>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM books) AS total_books,
                (SELECT COUNT(*) FROM books WHERE status = 'available') AS available_books,
                (SELECT COUNT(*) FROM books WHERE status = 'borrowed') AS borrowed_books,
                (SELECT COUNT(*) FROM borrow_requests) AS total_requests,
                (SELECT COUNT(*) FROM borrow_requests WHERE status = 'pending') AS pending_requests",
        )
        .fetch_one(pool)
        .await
    }
}
