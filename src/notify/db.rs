/**
 * Inbox Database Operations
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::accounts::AccountKind;
use crate::error::ApiError;
use crate::notify::model::Notification;

/// List an account's notifications, unread first, then newest first
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `recipient_id` - Account the inbox belongs to
/// * `recipient_kind` - Account kind
/// * `limit` - Page size, clamped to 1..100
pub async fn list_inbox(
    pool: &PgPool,
    recipient_id: Uuid,
    recipient_kind: AccountKind,
    limit: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        r#"
        SELECT * FROM notifications
        WHERE recipient_id = $1 AND recipient_kind = $2
        ORDER BY (read_at IS NULL) DESC, created_at DESC
        LIMIT $3
        "#,
    )
    .bind(recipient_id)
    .bind(recipient_kind.as_str())
    .bind(limit.clamp(1, 100))
    .fetch_all(pool)
    .await
}

/// Mark one notification read
///
/// Idempotent: an already-read notification keeps its original
/// `read_at`. Fails with `NotFound` if the notification does not exist
/// or belongs to someone else.
pub async fn mark_read(
    pool: &PgPool,
    notification_id: Uuid,
    recipient_id: Uuid,
) -> Result<Notification, ApiError> {
    let updated = sqlx::query_as::<_, Notification>(
        r#"
        UPDATE notifications
        SET read_at = COALESCE(read_at, NOW())
        WHERE id = $1 AND recipient_id = $2
        RETURNING *
        "#,
    )
    .bind(notification_id)
    .bind(recipient_id)
    .fetch_optional(pool)
    .await?;

    updated.ok_or_else(|| ApiError::not_found("Notification not found"))
}
