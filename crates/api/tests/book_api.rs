//! HTTP-level integration tests for the books resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, token_for};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Adding a book returns 201 with the caller as owner and defaults applied.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_book_applies_defaults(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "title": "Dune", "author": "Frank Herbert" });
    let response = post_json_auth(app, "/api/v1/books", &token_for(owner.id), body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Dune");
    assert_eq!(json["data"]["owner_id"], owner.id);
    assert_eq!(json["data"]["status"], "available");
    assert_eq!(json["data"]["genre"], "General");
}

/// A missing title is a validation error.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_book_requires_title(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "title": "", "author": "Frank Herbert" });
    let response = post_json_auth(app, "/api/v1/books", &token_for(owner.id), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Listing and filters
// ---------------------------------------------------------------------------

/// The community listing defaults to available books and hides borrowers.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_defaults_to_available(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let reader = common::create_user(&pool, "2B", "Reader").await;
    let available = common::create_book(&pool, owner.id, "Available Book").await;
    let borrowed = common::create_book(&pool, owner.id, "Borrowed Book").await;

    // Put one book into the borrowed state directly.
    sqlx::query("UPDATE books SET status = 'borrowed', borrower_id = $2 WHERE id = $1")
        .bind(borrowed.id)
        .bind(reader.id)
        .execute(&pool)
        .await
        .expect("status update should succeed");

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/books", &token_for(reader.id)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], available.id);
    assert_eq!(items[0]["owner"]["apartment_number"], "1A");
    assert!(
        items[0].get("borrower").is_none(),
        "community listing must not expose borrowers"
    );

    // status=all includes the borrowed book.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/books?status=all", &token_for(reader.id)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

/// Search matches title and author case-insensitively.
#[sqlx::test(migrations = "../db/migrations")]
async fn search_matches_title_and_author(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    common::create_book(&pool, owner.id, "The Dispossessed").await;
    common::create_book(&pool, owner.id, "Unrelated").await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/books?search=dispossessed",
        &token_for(owner.id),
    )
    .await;

    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "The Dispossessed");
}

/// The pagination envelope carries totals and navigation flags.
#[sqlx::test(migrations = "../db/migrations")]
async fn pagination_envelope(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    for i in 0..5 {
        common::create_book(&pool, owner.id, &format!("Book {i}")).await;
    }

    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        "/api/v1/books?page=1&per_page=2",
        &token_for(owner.id),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["pagination"]["total"], 5);
    assert_eq!(json["pagination"]["pages"], 3);
    assert_eq!(json["pagination"]["has_next"], true);
    assert_eq!(json["pagination"]["has_prev"], false);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/books?page=3&per_page=2",
        &token_for(owner.id),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["pagination"]["has_next"], false);
    assert_eq!(json["pagination"]["has_prev"], true);
}

/// Borrower identity on a single book is visible only to the owner.
#[sqlx::test(migrations = "../db/migrations")]
async fn borrower_visible_only_to_owner(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let reader = common::create_user(&pool, "2B", "Reader").await;
    let other = common::create_user(&pool, "3C", "Other").await;
    let book = common::create_book(&pool, owner.id, "Lent Out").await;

    sqlx::query("UPDATE books SET status = 'borrowed', borrower_id = $2 WHERE id = $1")
        .bind(book.id)
        .bind(reader.id)
        .execute(&pool)
        .await
        .expect("status update should succeed");

    let uri = format!("/api/v1/books/{}", book.id);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &uri, &token_for(owner.id)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["borrower"]["apartment_number"], "2B");

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &token_for(other.id)).await;
    let json = body_json(response).await;
    assert!(json["data"].get("borrower").is_none());
}

// ---------------------------------------------------------------------------
// Update and delete
// ---------------------------------------------------------------------------

/// Only the owner can edit a book.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_forbidden_for_non_owner(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let other = common::create_user(&pool, "2B", "Other").await;
    let book = common::create_book(&pool, owner.id, "Mine").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "title": "Hijacked" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/books/{}", book.id),
        &token_for(other.id),
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Editing a borrowed book is refused as an invalid state.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_refused_while_borrowed(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let reader = common::create_user(&pool, "2B", "Reader").await;
    let book = common::create_book(&pool, owner.id, "Lent Out").await;

    sqlx::query("UPDATE books SET status = 'borrowed', borrower_id = $2 WHERE id = $1")
        .bind(book.id)
        .bind(reader.id)
        .execute(&pool)
        .await
        .expect("status update should succeed");

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "title": "New Title" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/books/{}", book.id),
        &token_for(owner.id),
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_STATE");
}

/// A status field in the update payload is ignored; availability cannot be
/// edited through this route.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_cannot_set_status(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let book = common::create_book(&pool, owner.id, "Mine").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "title": "Renamed", "status": "borrowed" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/books/{}", book.id),
        &token_for(owner.id),
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Renamed");
    assert_eq!(json["data"]["status"], "available");
}

/// Deleting a book returns 204 and subsequent reads 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_then_404(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let book = common::create_book(&pool, owner.id, "Ephemeral").await;
    let uri = format!("/api/v1/books/{}", book.id);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token_for(owner.id)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &token_for(owner.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Shelf views and genres
// ---------------------------------------------------------------------------

/// my-books shows the owner's shelf with borrower info embedded.
#[sqlx::test(migrations = "../db/migrations")]
async fn my_books_embeds_borrower(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let reader = common::create_user(&pool, "2B", "Reader").await;
    let book = common::create_book(&pool, owner.id, "Lent Out").await;
    common::create_book(&pool, reader.id, "Someone Else's").await;

    sqlx::query("UPDATE books SET status = 'borrowed', borrower_id = $2 WHERE id = $1")
        .bind(book.id)
        .bind(reader.id)
        .execute(&pool)
        .await
        .expect("status update should succeed");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/books/my-books", &token_for(owner.id)).await;

    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["borrower"]["apartment_number"], "2B");
}

/// my-borrowed lists only books the caller currently holds.
#[sqlx::test(migrations = "../db/migrations")]
async fn my_borrowed_lists_held_books(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    let reader = common::create_user(&pool, "2B", "Reader").await;
    let book = common::create_book(&pool, owner.id, "Lent Out").await;

    sqlx::query("UPDATE books SET status = 'borrowed', borrower_id = $2 WHERE id = $1")
        .bind(book.id)
        .bind(reader.id)
        .execute(&pool)
        .await
        .expect("status update should succeed");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/books/my-borrowed", &token_for(reader.id)).await;

    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], book.id);
    assert_eq!(items[0]["owner"]["apartment_number"], "1A");
}

/// Genres are distinct and sorted.
#[sqlx::test(migrations = "../db/migrations")]
async fn genres_distinct_sorted(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Owner").await;
    for (title, genre) in [("A", "Sci-Fi"), ("B", "Fiction"), ("C", "Fiction")] {
        sqlx::query("INSERT INTO books (title, author, genre, owner_id) VALUES ($1, 'X', $2, $3)")
            .bind(title)
            .bind(genre)
            .bind(owner.id)
            .execute(&pool)
            .await
            .expect("insert should succeed");
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/books/genres", &token_for(owner.id)).await;

    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!(["Fiction", "Sci-Fi"]));
}
