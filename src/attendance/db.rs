/**
 * Attendance Edge Database Operations
 *
 * Same counter discipline as follows: mutate the edge, and only when a
 * row actually changed, move the counter in the same transaction.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Create an attendance edge and bump `total_attending`
///
/// # Returns
/// `true` if the edge was created, `false` if the user was already
/// attending.
pub async fn attend(pool: &PgPool, user_id: Uuid, event_id: Uuid) -> Result<bool, ApiError> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO attendances (user_id, event_id, created_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id, event_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(event_id)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    if inserted {
        sqlx::query(
            "UPDATE events SET total_attending = total_attending + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Remove an attendance edge and decrement `total_attending`
///
/// # Returns
/// `true` if an edge was actually removed.
pub async fn unattend(pool: &PgPool, user_id: Uuid, event_id: Uuid) -> Result<bool, ApiError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM attendances WHERE user_id = $1 AND event_id = $2")
        .bind(user_id)
        .bind(event_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
        == 1;

    if removed {
        sqlx::query(
            "UPDATE events SET total_attending = GREATEST(total_attending - 1, 0), updated_at = NOW() WHERE id = $1",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(removed)
}

/// Whether an attendance edge exists
pub async fn is_attending(pool: &PgPool, user_id: Uuid, event_id: Uuid) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendances WHERE user_id = $1 AND event_id = $2",
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}
