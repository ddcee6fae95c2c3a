//! Handlers for the `/books` resource.
//!
//! Book status is never set directly through this resource: the only
//! writers of `books.status` are the lifecycle operations in the borrow
//! request repository. Update and delete refuse while a book is lent out.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use shelfshare_core::error::CoreError;
use shelfshare_core::lending::check_book_mutable;
use shelfshare_core::pagination::{
    clamp_page, clamp_per_page, offset, PageInfo, DEFAULT_PER_PAGE, MAX_PER_PAGE,
};
use shelfshare_core::status::BookStatus;
use shelfshare_core::types::DbId;
use shelfshare_db::models::book::{Book, BookView, CreateBook, UpdateBook};
use shelfshare_db::repositories::{BookFilter, BookRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::StatusFilterParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /books`.
#[derive(Debug, Deserialize)]
pub struct BookListQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    /// `available`, `borrowed`, or `all`. Defaults to `available`.
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Resolve an optional `?status=` string into a storage filter.
///
/// `all` (or the literal absence with `default_all`) means no filter.
fn parse_status_filter(
    status: Option<&str>,
    default: Option<BookStatus>,
) -> Result<Option<BookStatus>, CoreError> {
    match status {
        None => Ok(default),
        Some("all") => Ok(None),
        Some(s) => BookStatus::parse(s).map(Some),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/books
///
/// Paginated community listing with search, genre, and status filters.
/// Defaults to available books only; `?status=all` lists everything.
/// Borrower identity is never exposed here.
pub async fn list_books(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookListQuery>,
) -> AppResult<Json<PageResponse<BookView>>> {
    let status = parse_status_filter(params.status.as_deref(), Some(BookStatus::Available))?;
    let page = clamp_page(params.page);
    let per_page = clamp_per_page(params.per_page, DEFAULT_PER_PAGE, MAX_PER_PAGE);

    let filter = BookFilter {
        status,
        search: params.search.filter(|s| !s.trim().is_empty()),
        genre: params.genre.filter(|s| !s.trim().is_empty()),
    };

    let total = BookRepo::count(&state.pool, &filter).await?;
    let listings = BookRepo::list(&state.pool, &filter, per_page, offset(page, per_page)).await?;

    Ok(Json(PageResponse {
        data: listings.into_iter().map(|l| l.into_view()).collect(),
        pagination: PageInfo::new(page, per_page, total),
    }))
}

/// GET /api/v1/books/{id}
///
/// Single book with owner info. Borrower identity is included only when
/// the caller owns the book.
pub async fn get_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<Json<DataResponse<BookView>>> {
    let listing = BookRepo::find_listing_by_id(&state.pool, book_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }))?;

    let mut view = listing.into_view();
    if view.book.owner_id != auth.user.id {
        view.borrower = None;
    }

    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/books
///
/// Add a book to the shared shelf. The caller becomes the owner.
pub async fn create_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<DataResponse<Book>>)> {
    input.validate()?;

    let book = BookRepo::create(&state.pool, auth.user.id, &input).await?;
    tracing::info!(user_id = auth.user.id, book_id = book.id, "Book added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: book })))
}

/// PUT /api/v1/books/{id}
///
/// Update a book's metadata. Owner only; refused while the book is
/// borrowed. The payload carries no status field, so availability cannot
/// be edited through this route.
pub async fn update_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
    Json(input): Json<UpdateBook>,
) -> AppResult<Json<DataResponse<Book>>> {
    input.validate()?;

    let book = BookRepo::find_by_id(&state.pool, book_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }))?;

    check_book_mutable(book.owner_id, auth.user.id, book.status, "update")?;

    let updated = BookRepo::update(&state.pool, book_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/books/{id}
///
/// Remove a book. Owner only; refused while borrowed. The book's borrow
/// requests go with it (FK cascade).
pub async fn delete_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let book = BookRepo::find_by_id(&state.pool, book_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }))?;

    check_book_mutable(book.owner_id, auth.user.id, book.status, "delete")?;

    BookRepo::delete(&state.pool, book_id).await?;
    tracing::info!(user_id = auth.user.id, book_id, "Book removed");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/books/my-books
///
/// The caller's own shelf, with borrower identity embedded.
pub async fn my_books(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<BookView>>>> {
    let status = parse_status_filter(params.status.as_deref(), None)?;

    let listings = BookRepo::list_by_owner(&state.pool, auth.user.id, status).await?;

    Ok(Json(DataResponse {
        data: listings.into_iter().map(|l| l.into_view()).collect(),
    }))
}

/// GET /api/v1/books/my-borrowed
///
/// Books the caller currently holds, with owner info for returning them.
pub async fn my_borrowed(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<BookView>>>> {
    let listings = BookRepo::list_borrowed_by(&state.pool, auth.user.id).await?;

    Ok(Json(DataResponse {
        data: listings.into_iter().map(|l| l.into_view()).collect(),
    }))
}

/// GET /api/v1/books/genres
///
/// Distinct genres in use, sorted, for the client's filter dropdown.
pub async fn genres(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let genres = BookRepo::genres(&state.pool).await?;
    Ok(Json(DataResponse { data: genres }))
}
