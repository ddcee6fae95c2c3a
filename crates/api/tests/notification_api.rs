//! HTTP-level integration tests for the notification sink and the public
//! stats endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, put_auth, token_for};
use sqlx::PgPool;
use shelfshare_core::status::NotificationKind;
use shelfshare_core::types::DbId;
use shelfshare_db::models::notification::NewNotification;
use shelfshare_db::repositories::NotificationRepo;

/// Seed `count` notifications for a user, returning their ids oldest first.
async fn seed_notifications(pool: &PgPool, user_id: DbId, count: usize) -> Vec<DbId> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let note = NotificationRepo::create(
            pool,
            &NewNotification {
                user_id,
                message: format!("Message {i}"),
                kind: NotificationKind::Info,
            },
        )
        .await
        .expect("notification insert should succeed");
        ids.push(note.id);
    }
    ids
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// The listing is newest first, paginated, and carries the unread count.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_paginated_newest_first(pool: PgPool) {
    let user = common::create_user(&pool, "1A", "Nora").await;
    let ids = seed_notifications(&pool, user.id, 5).await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/notifications?page=1&per_page=2",
        &token_for(user.id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    // Newest (last seeded) first.
    assert_eq!(items[0]["id"], *ids.last().unwrap());
    assert_eq!(json["unread_count"], 5);
    assert_eq!(json["pagination"]["total"], 5);
    assert_eq!(json["pagination"]["pages"], 3);
    assert_eq!(json["pagination"]["has_next"], true);
}

/// `?unread=true` filters out read notifications.
#[sqlx::test(migrations = "../db/migrations")]
async fn unread_filter(pool: PgPool) {
    let user = common::create_user(&pool, "1A", "Nora").await;
    let ids = seed_notifications(&pool, user.id, 3).await;
    NotificationRepo::mark_read(&pool, ids[0])
        .await
        .expect("mark read should succeed");

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/notifications?unread=true",
        &token_for(user.id),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["unread_count"], 2);
}

/// Users never see each other's notifications in listings.
#[sqlx::test(migrations = "../db/migrations")]
async fn listing_scoped_to_caller(pool: PgPool) {
    let nora = common::create_user(&pool, "1A", "Nora").await;
    let omar = common::create_user(&pool, "2B", "Omar").await;
    seed_notifications(&pool, nora.id, 2).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/notifications", &token_for(omar.id)).await;

    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
    assert_eq!(json["unread_count"], 0);
}

// ---------------------------------------------------------------------------
// Read marking
// ---------------------------------------------------------------------------

/// Marking read is idempotent: a second mark succeeds without change.
#[sqlx::test(migrations = "../db/migrations")]
async fn mark_read_is_idempotent(pool: PgPool) {
    let user = common::create_user(&pool, "1A", "Nora").await;
    let ids = seed_notifications(&pool, user.id, 1).await;
    let uri = format!("/api/v1/notifications/{}/read", ids[0]);

    let app = common::build_test_app(pool.clone());
    let response = put_auth(app, &uri, &token_for(user.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_read"], true);

    let app = common::build_test_app(pool);
    let response = put_auth(app, &uri, &token_for(user.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_read"], true);
}

/// Another user's notification is a 403, never a 404; an unknown id is 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn cross_user_is_forbidden(pool: PgPool) {
    let nora = common::create_user(&pool, "1A", "Nora").await;
    let omar = common::create_user(&pool, "2B", "Omar").await;
    let ids = seed_notifications(&pool, nora.id, 1).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/notifications/{}/read", ids[0]);
    let response = put_auth(app, &uri, &token_for(omar.id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = put_auth(
        app,
        "/api/v1/notifications/424242/read",
        &token_for(omar.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Same scoping for delete.
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/notifications/{}", ids[0]);
    let response = delete_auth(app, &uri, &token_for(omar.id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// read-all marks everything and reports the count.
#[sqlx::test(migrations = "../db/migrations")]
async fn read_all_reports_count(pool: PgPool) {
    let user = common::create_user(&pool, "1A", "Nora").await;
    seed_notifications(&pool, user.id, 3).await;

    let app = common::build_test_app(pool.clone());
    let response = put_auth(app, "/api/v1/notifications/read-all", &token_for(user.id)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["marked_read"], 3);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/notifications/count", &token_for(user.id)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["count"], 0);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// Deleting one notification returns 204; clear-read and clear-all report
/// how many rows they removed.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_and_clear(pool: PgPool) {
    let user = common::create_user(&pool, "1A", "Nora").await;
    let ids = seed_notifications(&pool, user.id, 4).await;
    NotificationRepo::mark_read(&pool, ids[0])
        .await
        .expect("mark read should succeed");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/notifications/{}", ids[1]),
        &token_for(user.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        "/api/v1/notifications/clear-read",
        &token_for(user.id),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["deleted"], 1);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, "/api/v1/notifications/clear-all", &token_for(user.id)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["deleted"], 2);
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Stats are public; an authenticated caller also gets their unread count.
#[sqlx::test(migrations = "../db/migrations")]
async fn stats_public_and_enriched(pool: PgPool) {
    let owner = common::create_user(&pool, "1A", "Olga").await;
    common::create_book(&pool, owner.id, "Dune").await;
    seed_notifications(&pool, owner.id, 2).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_users"], 1);
    assert_eq!(json["data"]["total_books"], 1);
    assert_eq!(json["data"]["available_books"], 1);
    assert!(json["data"].get("unread_notifications").is_none());

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/stats", &token_for(owner.id)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["unread_notifications"], 2);
}
