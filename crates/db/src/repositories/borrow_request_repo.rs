//! Repository for the `borrow_requests` table and the transactional
//! lifecycle operations.
//!
//! Every operation that touches more than one row runs inside a single
//! transaction. State preconditions are re-verified with conditional
//! `UPDATE ... WHERE status = ...` statements, so a concurrent winner makes
//! the loser's update match zero rows; the loser returns an outcome variant
//! and its `Transaction` guard rolls everything back on drop.

use sqlx::PgPool;
use shelfshare_core::types::DbId;
use shelfshare_core::status::RequestStatus;

use crate::models::borrow_request::{BorrowRequest, RequestListing};
use crate::models::notification::NewNotification;
use crate::repositories::NotificationRepo;

/// Column list for plain `borrow_requests` queries.
const COLUMNS: &str = "id, book_id, borrower_id, lender_id, status, message, \
                       requested_at, responded_at, returned_at";

/// Column list for queries that alias `borrow_requests` as `r`.
const QUALIFIED: &str = "r.id, r.book_id, r.borrower_id, r.lender_id, r.status, r.message, \
                         r.requested_at, r.responded_at, r.returned_at";

/// Join fragment shared by listing queries: book plus both parties.
///
/// The book join is LEFT so a request row never becomes unreadable if its
/// book disappears out from under it.
const LISTING_JOINS: &str = "LEFT JOIN books bk ON bk.id = r.book_id
             JOIN users w ON w.id = r.borrower_id
             JOIN users l ON l.id = r.lender_id";

const LISTING_COLUMNS: &str = "bk.title AS book_title,
                    bk.author AS book_author,
                    w.name AS borrower_name,
                    w.apartment_number AS borrower_apartment_number,
                    l.name AS lender_name,
                    l.apartment_number AS lender_apartment_number";

/// Result of an approval attempt.
#[derive(Debug)]
pub enum ApproveOutcome {
    /// The request was approved; the book is now borrowed and all pending
    /// siblings were rejected.
    Approved(BorrowRequest),
    /// The request stopped being pending between the handler's read and the
    /// transaction (e.g. the borrower cancelled).
    RequestNotPending,
    /// The book stopped being available (a concurrent approval won).
    BookNotAvailable,
}

/// Result of a borrower-initiated return.
#[derive(Debug)]
pub enum ReturnOutcome {
    Returned(BorrowRequest),
    /// The request is no longer in the `approved` state.
    RequestNotApproved,
    /// The book row was not in the `borrowed` state; nothing was changed.
    BookNotBorrowed,
}

/// Result of an owner-initiated return.
#[derive(Debug)]
pub enum OwnerReturnOutcome {
    /// The matching approved request was stamped and the book reset.
    Returned(BorrowRequest),
    /// No approved request matched the current borrower; the book was
    /// force-reset to available anyway.
    BookResetWithoutRequest,
    /// The book stopped being borrowed before the transaction ran.
    BookNotBorrowed,
}

/// Provides read and lifecycle operations for borrow requests.
pub struct BorrowRequestRepo;

impl BorrowRequestRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a request by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BorrowRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM borrow_requests WHERE id = $1");
        sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a request with book and party info joined.
    pub async fn find_listing_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RequestListing>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED},
                    {LISTING_COLUMNS}
             FROM borrow_requests r
             {LISTING_JOINS}
             WHERE r.id = $1"
        );
        sqlx::query_as::<_, RequestListing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests addressed to a lender, newest first.
    pub async fn list_for_lender(
        pool: &PgPool,
        lender_id: DbId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<RequestListing>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED},
                    {LISTING_COLUMNS}
             FROM borrow_requests r
             {LISTING_JOINS}
             WHERE r.lender_id = $1
               AND ($2::request_status IS NULL OR r.status = $2)
             ORDER BY r.requested_at DESC, r.id DESC"
        );
        sqlx::query_as::<_, RequestListing>(&query)
            .bind(lender_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List requests made by a borrower, newest first.
    pub async fn list_for_borrower(
        pool: &PgPool,
        borrower_id: DbId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<RequestListing>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED},
                    {LISTING_COLUMNS}
             FROM borrow_requests r
             {LISTING_JOINS}
             WHERE r.borrower_id = $1
               AND ($2::request_status IS NULL OR r.status = $2)
             ORDER BY r.requested_at DESC, r.id DESC"
        );
        sqlx::query_as::<_, RequestListing>(&query)
            .bind(borrower_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Whether a borrower already has a pending request for a book.
    ///
    /// Advisory pre-check; the partial unique index enforces the invariant
    /// against concurrent inserts.
    pub async fn has_pending(
        pool: &PgPool,
        book_id: DbId,
        borrower_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM borrow_requests
             WHERE book_id = $1 AND borrower_id = $2 AND status = 'pending'",
        )
        .bind(book_id)
        .bind(borrower_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }

    // -----------------------------------------------------------------------
    // Lifecycle transactions
    // -----------------------------------------------------------------------

    /// Create a pending request and notify the lender, atomically.
    ///
    /// A concurrent duplicate surfaces as a unique violation on
    /// `uq_borrow_requests_pending`.
    pub async fn create(
        pool: &PgPool,
        book_id: DbId,
        borrower_id: DbId,
        lender_id: DbId,
        message: &str,
        notify_lender: &NewNotification,
    ) -> Result<BorrowRequest, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO borrow_requests (book_id, borrower_id, lender_id, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(book_id)
            .bind(borrower_id)
            .bind(lender_id)
            .bind(message)
            .fetch_one(&mut *tx)
            .await?;

        NotificationRepo::insert(&mut tx, notify_lender).await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Approve a pending request.
    ///
    /// In one transaction: the request flips to `approved`, the book flips
    /// to `borrowed` (re-checked against `available` inside the same
    /// transaction, so only one concurrent approval can win), every other
    /// pending request for the book is rejected, and each affected borrower
    /// receives exactly one notification.
    pub async fn approve(
        pool: &PgPool,
        request_id: DbId,
        book_id: DbId,
        borrower_id: DbId,
        notify_winner: &NewNotification,
        notify_loser: impl Fn(DbId) -> NewNotification,
    ) -> Result<ApproveOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // (a) Approve, only if still pending.
        let query = format!(
            "UPDATE borrow_requests
             SET status = 'approved', responded_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(request_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ApproveOutcome::RequestNotPending);
        };

        // (b) Lend the book out, only if still available. Zero rows means a
        // concurrent approval already took it; dropping `tx` rolls (a) back.
        let updated = sqlx::query(
            "UPDATE books
             SET status = 'borrowed', borrower_id = $2, updated_at = NOW()
             WHERE id = $1 AND status = 'available'",
        )
        .bind(book_id)
        .bind(borrower_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Ok(ApproveOutcome::BookNotAvailable);
        }

        // (c) Reject every other pending request for this book.
        let losers: Vec<DbId> = sqlx::query_scalar(
            "UPDATE borrow_requests
             SET status = 'rejected', responded_at = NOW()
             WHERE book_id = $1 AND id <> $2 AND status = 'pending'
             RETURNING borrower_id",
        )
        .bind(book_id)
        .bind(request_id)
        .fetch_all(&mut *tx)
        .await?;

        for loser_id in losers {
            NotificationRepo::insert(&mut tx, &notify_loser(loser_id)).await?;
        }

        // (d) Tell the winner.
        NotificationRepo::insert(&mut tx, notify_winner).await?;

        tx.commit().await?;
        Ok(ApproveOutcome::Approved(request))
    }

    /// Close a pending request (reject by lender or cancel by borrower) and
    /// notify the other party, atomically.
    ///
    /// Returns `None` if the request was no longer pending.
    pub async fn close_pending(
        pool: &PgPool,
        request_id: DbId,
        new_status: RequestStatus,
        notify: &NewNotification,
    ) -> Result<Option<BorrowRequest>, sqlx::Error> {
        debug_assert!(matches!(
            new_status,
            RequestStatus::Rejected | RequestStatus::Cancelled
        ));

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE borrow_requests
             SET status = $2, responded_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(request_id)
            .bind(new_status)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        NotificationRepo::insert(&mut tx, notify).await?;

        tx.commit().await?;
        Ok(Some(request))
    }

    /// Borrower-initiated return: stamp the approved request, free the book,
    /// notify the lender, atomically.
    pub async fn return_via_request(
        pool: &PgPool,
        request_id: DbId,
        book_id: DbId,
        notify_lender: &NewNotification,
    ) -> Result<ReturnOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE borrow_requests
             SET status = 'returned', returned_at = NOW()
             WHERE id = $1 AND status = 'approved'
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(request_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ReturnOutcome::RequestNotApproved);
        };

        let updated = sqlx::query(
            "UPDATE books
             SET status = 'available', borrower_id = NULL, updated_at = NOW()
             WHERE id = $1 AND status = 'borrowed'",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Ok(ReturnOutcome::BookNotBorrowed);
        }

        NotificationRepo::insert(&mut tx, notify_lender).await?;

        tx.commit().await?;
        Ok(ReturnOutcome::Returned(request))
    }

    /// Owner-initiated return: stamp the matching approved request if one
    /// exists, reset the book either way, notify the borrower, atomically.
    pub async fn return_by_owner(
        pool: &PgPool,
        book_id: DbId,
        borrower_id: DbId,
        notify_borrower: &NewNotification,
    ) -> Result<OwnerReturnOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE borrow_requests
             SET status = 'returned', returned_at = NOW()
             WHERE book_id = $1 AND borrower_id = $2 AND status = 'approved'
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, BorrowRequest>(&query)
            .bind(book_id)
            .bind(borrower_id)
            .fetch_optional(&mut *tx)
            .await?;

        let updated = sqlx::query(
            "UPDATE books
             SET status = 'available', borrower_id = NULL, updated_at = NOW()
             WHERE id = $1 AND status = 'borrowed'",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Ok(OwnerReturnOutcome::BookNotBorrowed);
        }

        NotificationRepo::insert(&mut tx, notify_borrower).await?;

        tx.commit().await?;

        match request {
            Some(request) => Ok(OwnerReturnOutcome::Returned(request)),
            None => {
                // Tolerated inconsistency: the book row said borrowed but no
                // approved request matched the borrower. The reset still
                // happens so the physical return is not blocked on a stale
                // record, but it should never be silent.
                tracing::warn!(
                    book_id,
                    borrower_id,
                    "book reset to available with no matching approved request"
                );
                Ok(OwnerReturnOutcome::BookResetWithoutRequest)
            }
        }
    }
}
