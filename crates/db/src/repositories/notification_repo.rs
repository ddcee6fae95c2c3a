//! Repository for the `notifications` table.

use sqlx::{PgPool, Postgres, Transaction};
use shelfshare_core::types::DbId;

use crate::models::notification::{NewNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, message, notification_type, is_read, created_at";

/// Provides operations for the per-user notification log.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification inside an open lifecycle transaction.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        input: &NewNotification,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO notifications (user_id, message, notification_type)
             VALUES ($1, $2, $3)",
        )
        .bind(input.user_id)
        .bind(&input.message)
        .bind(input.kind)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Insert a notification outside any lifecycle flow.
    pub async fn create(
        pool: &PgPool,
        input: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, message, notification_type)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(&input.message)
            .bind(input.kind)
            .fetch_one(pool)
            .await
    }

    /// Find a notification by ID, regardless of recipient.
    ///
    /// The handler uses this to distinguish "not found" from "not yours".
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE id = $1");
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE user_id = $1 {filter}
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a user's notifications (for pagination totals).
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
    ) -> Result<i64, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query =
            format!("SELECT COUNT(*) FROM notifications WHERE user_id = $1 {filter}");
        sqlx::query_scalar(&query).bind(user_id).fetch_one(pool).await
    }

    /// Number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Mark a notification as read, returning the updated row.
    ///
    /// Idempotent: marking an already-read notification succeeds without
    /// changing anything. The caller must have verified the recipient.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET is_read = true
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true
             WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a notification. The caller must have verified the recipient.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all read notifications for a user. Returns the number deleted.
    pub async fn delete_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE user_id = $1 AND is_read = true")
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Delete all notifications for a user. Returns the number deleted.
    pub async fn delete_all(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
