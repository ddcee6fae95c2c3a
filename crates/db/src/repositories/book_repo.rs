//! Repository for the `books` table.
//!
//! Status changes are NOT exposed here: a book flips between `available`
//! and `borrowed` only inside the lifecycle transactions in
//! [`super::borrow_request_repo`].

use sqlx::PgPool;
use shelfshare_core::status::BookStatus;
use shelfshare_core::types::DbId;

use crate::models::book::{Book, BookListing, CreateBook, UpdateBook};

/// Column list for plain `books` queries.
const COLUMNS: &str =
    "id, title, author, cover_image, genre, status, owner_id, borrower_id, created_at, updated_at";

/// Column list for queries that alias `books` as `b` and join `users`.
const QUALIFIED: &str = "b.id, b.title, b.author, b.cover_image, b.genre, b.status, \
                         b.owner_id, b.borrower_id, b.created_at, b.updated_at";

/// Filters for the public book listing.
#[derive(Debug, Default)]
pub struct BookFilter {
    /// `None` means all statuses.
    pub status: Option<BookStatus>,
    /// Case-insensitive substring match on title or author.
    pub search: Option<String>,
    /// Case-insensitive substring match on genre.
    pub genre: Option<String>,
}

/// Provides CRUD operations for books.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new book owned by `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateBook,
    ) -> Result<Book, sqlx::Error> {
        let query = format!(
            "INSERT INTO books (title, author, cover_image, genre, owner_id)
             VALUES ($1, $2, $3, COALESCE($4, 'General'), $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.cover_image)
            .bind(&input.genre)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a book by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a book with both owner and borrower display info joined.
    pub async fn find_listing_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookListing>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED},
                    o.name AS owner_name,
                    o.apartment_number AS owner_apartment_number,
                    w.name AS borrower_name,
                    w.apartment_number AS borrower_apartment_number
             FROM books b
             JOIN users o ON o.id = b.owner_id
             LEFT JOIN users w ON w.id = b.borrower_id
             WHERE b.id = $1"
        );
        sqlx::query_as::<_, BookListing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List books matching `filter`, newest first, with owner info joined.
    pub async fn list(
        pool: &PgPool,
        filter: &BookFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookListing>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED},
                    o.name AS owner_name,
                    o.apartment_number AS owner_apartment_number,
                    NULL::text AS borrower_name,
                    NULL::text AS borrower_apartment_number
             FROM books b
             JOIN users o ON o.id = b.owner_id
             WHERE ($1::book_status IS NULL OR b.status = $1)
               AND ($2::text IS NULL
                    OR b.title ILIKE '%' || $2 || '%'
                    OR b.author ILIKE '%' || $2 || '%')
               AND ($3::text IS NULL OR b.genre ILIKE '%' || $3 || '%')
             ORDER BY b.created_at DESC, b.id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, BookListing>(&query)
            .bind(filter.status)
            .bind(&filter.search)
            .bind(&filter.genre)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count books matching `filter` (for pagination totals).
    pub async fn count(pool: &PgPool, filter: &BookFilter) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM books b
             WHERE ($1::book_status IS NULL OR b.status = $1)
               AND ($2::text IS NULL
                    OR b.title ILIKE '%' || $2 || '%'
                    OR b.author ILIKE '%' || $2 || '%')
               AND ($3::text IS NULL OR b.genre ILIKE '%' || $3 || '%')",
        )
        .bind(filter.status)
        .bind(&filter.search)
        .bind(&filter.genre)
        .fetch_one(pool)
        .await
    }

    /// List an owner's books, newest first, with borrower info joined.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        status: Option<BookStatus>,
    ) -> Result<Vec<BookListing>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED},
                    NULL::text AS owner_name,
                    NULL::text AS owner_apartment_number,
                    w.name AS borrower_name,
                    w.apartment_number AS borrower_apartment_number
             FROM books b
             LEFT JOIN users w ON w.id = b.borrower_id
             WHERE b.owner_id = $1
               AND ($2::book_status IS NULL OR b.status = $2)
             ORDER BY b.created_at DESC"
        );
        sqlx::query_as::<_, BookListing>(&query)
            .bind(owner_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List the books a user is currently borrowing, most recently updated
    /// first, with owner info joined.
    pub async fn list_borrowed_by(
        pool: &PgPool,
        borrower_id: DbId,
    ) -> Result<Vec<BookListing>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED},
                    o.name AS owner_name,
                    o.apartment_number AS owner_apartment_number,
                    NULL::text AS borrower_name,
                    NULL::text AS borrower_apartment_number
             FROM books b
             JOIN users o ON o.id = b.owner_id
             WHERE b.borrower_id = $1 AND b.status = 'borrowed'
             ORDER BY b.updated_at DESC"
        );
        sqlx::query_as::<_, BookListing>(&query)
            .bind(borrower_id)
            .fetch_all(pool)
            .await
    }

    /// Update a book's metadata. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. The caller is
    /// responsible for the owner/availability checks.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                cover_image = COALESCE($4, cover_image),
                genre = COALESCE($5, genre),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.cover_image)
            .bind(&input.genre)
            .fetch_optional(pool)
            .await
    }

    /// Delete a book. Its borrow requests go with it (FK cascade).
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Distinct genres across all books, sorted.
    pub async fn genres(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT genre FROM books WHERE genre <> '' ORDER BY genre")
            .fetch_all(pool)
            .await
    }
}
