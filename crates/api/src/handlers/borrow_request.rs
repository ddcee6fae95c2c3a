//! Handlers for the `/requests` resource: the borrow request lifecycle.
//!
//! Handlers run the pure precondition checks from `shelfshare_core::lending`
//! first so the common failure modes (wrong actor, wrong state) get precise
//! errors, then delegate to the transactional repository operations, which
//! re-verify state with conditional updates. A caller that loses a race
//! gets the same InvalidState error it would have gotten arriving late.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use shelfshare_core::error::CoreError;
use shelfshare_core::lending::{
    check_cancel, check_create_request, check_lender_response, check_owner_return,
    check_return_via_request, messages,
};
use shelfshare_core::status::{BookStatus, NotificationKind, RequestStatus};
use shelfshare_core::types::DbId;
use shelfshare_db::models::book::Book;
use shelfshare_db::models::borrow_request::{CreateBorrowRequest, RequestView};
use shelfshare_db::models::notification::NewNotification;
use shelfshare_db::repositories::{
    ApproveOutcome, BookRepo, BorrowRequestRepo, OwnerReturnOutcome, ReturnOutcome,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found_request(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Borrow request",
        id,
    })
}

async fn load_book(state: &AppState, book_id: DbId) -> AppResult<Book> {
    BookRepo::find_by_id(&state.pool, book_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }))
}

/// Fetch the joined view of a request after a lifecycle write.
async fn load_view(state: &AppState, request_id: DbId) -> AppResult<RequestView> {
    let listing = BorrowRequestRepo::find_listing_by_id(&state.pool, request_id)
        .await?
        .ok_or_else(|| not_found_request(request_id))?;
    Ok(listing.into_view())
}

fn parse_request_status(status: Option<&str>) -> Result<Option<RequestStatus>, CoreError> {
    match status {
        None | Some("all") => Ok(None),
        Some(s) => RequestStatus::parse(s).map(Some),
    }
}

// ---------------------------------------------------------------------------
// Lifecycle handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/requests
///
/// Ask to borrow a book. The book owner at creation time is frozen as the
/// request's lender. A duplicate pending request for the same book returns
/// 409 (partial unique index on pending rows).
pub async fn create_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBorrowRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RequestView>>)> {
    input.validate()?;

    let book = load_book(&state, input.book_id).await?;
    check_create_request(book.owner_id, book.status, auth.user.id)?;

    // Advisory pre-check for a friendly 409; the index catches races.
    if BorrowRequestRepo::has_pending(&state.pool, book.id, auth.user.id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "You already have a pending request for this book".into(),
        )));
    }

    let notify_lender = NewNotification {
        user_id: book.owner_id,
        message: messages::borrow_requested(
            &auth.user.name,
            &auth.user.apartment_number,
            &book.title,
        ),
        kind: NotificationKind::BorrowRequest,
    };

    let request = BorrowRequestRepo::create(
        &state.pool,
        book.id,
        auth.user.id,
        book.owner_id,
        input.message.trim(),
        &notify_lender,
    )
    .await?;

    tracing::info!(
        user_id = auth.user.id,
        book_id = book.id,
        request_id = request.id,
        "Borrow request created"
    );

    let view = load_view(&state, request.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PUT /api/v1/requests/{id}/approve
///
/// Lender approves a pending request. In one transaction the book is lent
/// out, every competing pending request is rejected, and each affected
/// borrower is notified. A concurrent approval of a sibling loses cleanly.
pub async fn approve_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<RequestView>>> {
    let request = BorrowRequestRepo::find_by_id(&state.pool, request_id)
        .await?
        .ok_or_else(|| not_found_request(request_id))?;

    check_lender_response(request.lender_id, auth.user.id, request.status, "approve")?;

    let book = load_book(&state, request.book_id).await?;
    if book.status != BookStatus::Available {
        return Err(AppError::Core(CoreError::InvalidState(
            "This book is not available for borrowing".into(),
        )));
    }

    let notify_winner = NewNotification {
        user_id: request.borrower_id,
        message: messages::request_approved(&book.title, &auth.user.apartment_number),
        kind: NotificationKind::RequestApproved,
    };
    let title = book.title.clone();
    let notify_loser = move |loser_id: DbId| NewNotification {
        user_id: loser_id,
        message: messages::request_lost(&title),
        kind: NotificationKind::RequestRejected,
    };

    let outcome = BorrowRequestRepo::approve(
        &state.pool,
        request.id,
        book.id,
        request.borrower_id,
        &notify_winner,
        notify_loser,
    )
    .await?;

    match outcome {
        ApproveOutcome::Approved(approved) => {
            tracing::info!(
                user_id = auth.user.id,
                book_id = book.id,
                request_id = approved.id,
                "Borrow request approved"
            );
            let view = load_view(&state, approved.id).await?;
            Ok(Json(DataResponse { data: view }))
        }
        ApproveOutcome::RequestNotPending => Err(AppError::Core(CoreError::InvalidState(
            "Request is no longer pending".into(),
        ))),
        ApproveOutcome::BookNotAvailable => Err(AppError::Core(CoreError::InvalidState(
            "This book is not available for borrowing".into(),
        ))),
    }
}

/// PUT /api/v1/requests/{id}/reject
///
/// Lender declines a pending request. The book is untouched. The borrower
/// notification degrades to a title-less text if the book row is gone.
pub async fn reject_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<RequestView>>> {
    let request = BorrowRequestRepo::find_by_id(&state.pool, request_id)
        .await?
        .ok_or_else(|| not_found_request(request_id))?;

    check_lender_response(request.lender_id, auth.user.id, request.status, "reject")?;

    let book = BookRepo::find_by_id(&state.pool, request.book_id).await?;

    let notify_borrower = NewNotification {
        user_id: request.borrower_id,
        message: messages::request_rejected(
            book.as_ref().map(|b| b.title.as_str()),
            &auth.user.apartment_number,
        ),
        kind: NotificationKind::RequestRejected,
    };

    let rejected = BorrowRequestRepo::close_pending(
        &state.pool,
        request.id,
        RequestStatus::Rejected,
        &notify_borrower,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::InvalidState("Request is no longer pending".into()))
    })?;

    let view = load_view(&state, rejected.id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/requests/{id}/cancel
///
/// Borrower withdraws their own pending request. The lender is notified.
pub async fn cancel_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<RequestView>>> {
    let request = BorrowRequestRepo::find_by_id(&state.pool, request_id)
        .await?
        .ok_or_else(|| not_found_request(request_id))?;

    check_cancel(request.borrower_id, auth.user.id, request.status)?;

    let book = load_book(&state, request.book_id).await?;

    let notify_lender = NewNotification {
        user_id: request.lender_id,
        message: messages::request_cancelled(
            &auth.user.name,
            &auth.user.apartment_number,
            &book.title,
        ),
        kind: NotificationKind::RequestCancelled,
    };

    let cancelled = BorrowRequestRepo::close_pending(
        &state.pool,
        request.id,
        RequestStatus::Cancelled,
        &notify_lender,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::InvalidState("Request is no longer pending".into()))
    })?;

    let view = load_view(&state, cancelled.id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/requests/{id}/return
///
/// Borrower returns the book they hold. The request is stamped, the book
/// freed, and the lender notified, atomically.
pub async fn return_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<RequestView>>> {
    let request = BorrowRequestRepo::find_by_id(&state.pool, request_id)
        .await?
        .ok_or_else(|| not_found_request(request_id))?;

    check_return_via_request(request.borrower_id, auth.user.id, request.status)?;

    let book = load_book(&state, request.book_id).await?;

    let notify_lender = NewNotification {
        user_id: request.lender_id,
        message: messages::book_returned(
            &auth.user.name,
            &auth.user.apartment_number,
            &book.title,
        ),
        kind: NotificationKind::BookReturned,
    };

    let outcome =
        BorrowRequestRepo::return_via_request(&state.pool, request.id, book.id, &notify_lender)
            .await?;

    match outcome {
        ReturnOutcome::Returned(returned) => {
            tracing::info!(
                user_id = auth.user.id,
                book_id = book.id,
                request_id = returned.id,
                "Book returned by borrower"
            );
            let view = load_view(&state, returned.id).await?;
            Ok(Json(DataResponse { data: view }))
        }
        ReturnOutcome::RequestNotApproved => Err(AppError::Core(CoreError::InvalidState(
            "Request is no longer approved".into(),
        ))),
        ReturnOutcome::BookNotBorrowed => Err(AppError::Core(CoreError::InvalidState(
            "This book is not currently borrowed".into(),
        ))),
    }
}

/// PUT /api/v1/books/{id}/return
///
/// Owner marks their lent-out book as physically returned. The matching
/// approved request is stamped when one exists; the book is reset to
/// available either way so a stale record never blocks the shelf.
pub async fn return_by_owner(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let book = load_book(&state, book_id).await?;

    check_owner_return(book.owner_id, auth.user.id, book.status)?;

    let borrower_id = book.borrower_id.ok_or_else(|| {
        AppError::InternalError(format!("Borrowed book {book_id} has no borrower"))
    })?;

    let notify_borrower = NewNotification {
        user_id: borrower_id,
        message: messages::return_marked(&book.title, &auth.user.apartment_number),
        kind: NotificationKind::ReturnMarked,
    };

    let outcome =
        BorrowRequestRepo::return_by_owner(&state.pool, book.id, borrower_id, &notify_borrower)
            .await?;

    match outcome {
        OwnerReturnOutcome::Returned(request) => {
            tracing::info!(
                user_id = auth.user.id,
                book_id,
                request_id = request.id,
                "Book marked returned by owner"
            );
            Ok(Json(serde_json::json!({
                "data": { "book_id": book_id, "request": request }
            })))
        }
        OwnerReturnOutcome::BookResetWithoutRequest => Ok(Json(serde_json::json!({
            "data": { "book_id": book_id, "request": null }
        }))),
        OwnerReturnOutcome::BookNotBorrowed => Err(AppError::Core(CoreError::InvalidState(
            "This book is not currently borrowed".into(),
        ))),
    }
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/requests/incoming
///
/// Requests addressed to the caller as lender, newest first.
pub async fn incoming_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<RequestView>>>> {
    let status = parse_request_status(params.status.as_deref())?;

    let listings = BorrowRequestRepo::list_for_lender(&state.pool, auth.user.id, status).await?;

    Ok(Json(DataResponse {
        data: listings.into_iter().map(|l| l.into_view()).collect(),
    }))
}

/// GET /api/v1/requests/outgoing
///
/// Requests made by the caller as borrower, newest first.
pub async fn outgoing_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<RequestView>>>> {
    let status = parse_request_status(params.status.as_deref())?;

    let listings = BorrowRequestRepo::list_for_borrower(&state.pool, auth.user.id, status).await?;

    Ok(Json(DataResponse {
        data: listings.into_iter().map(|l| l.into_view()).collect(),
    }))
}

/// GET /api/v1/requests/history
///
/// The caller's full borrowing history, every status, newest first.
pub async fn request_history(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<RequestView>>>> {
    let listings = BorrowRequestRepo::list_for_borrower(&state.pool, auth.user.id, None).await?;

    Ok(Json(DataResponse {
        data: listings.into_iter().map(|l| l.into_view()).collect(),
    }))
}

/// GET /api/v1/requests/{id}
///
/// A single request; visible only to its lender or borrower.
pub async fn get_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<RequestView>>> {
    let listing = BorrowRequestRepo::find_listing_by_id(&state.pool, request_id)
        .await?
        .ok_or_else(|| not_found_request(request_id))?;

    let request = &listing.request;
    if request.lender_id != auth.user.id && request.borrower_id != auth.user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only view your own requests".into(),
        )));
    }

    Ok(Json(DataResponse {
        data: listing.into_view(),
    }))
}
