/**
 * Follow Edge Database Operations
 *
 * Counter policy: best-effort synchronization at edge-mutation time.
 * The counter update runs only when the edge mutation actually changed
 * a row, inside the same transaction, so a retried request cannot
 * double-count. Decrements clamp at zero to tolerate prior drift.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Create a follow edge and bump both counters
///
/// # Returns
/// `true` if the edge was created, `false` if it already existed
/// (counters untouched in that case).
pub async fn follow(pool: &PgPool, user_id: Uuid, org_id: Uuid) -> Result<bool, ApiError> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO follows (user_id, org_id, created_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id, org_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(org_id)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    if inserted {
        sqlx::query(
            "UPDATE accounts SET followers_count = followers_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(org_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE accounts SET following_count = following_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Remove a follow edge and decrement both counters
///
/// # Returns
/// `true` if an edge was actually removed.
pub async fn unfollow(pool: &PgPool, user_id: Uuid, org_id: Uuid) -> Result<bool, ApiError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND org_id = $2")
        .bind(user_id)
        .bind(org_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
        == 1;

    if removed {
        sqlx::query(
            "UPDATE accounts SET followers_count = GREATEST(followers_count - 1, 0), updated_at = NOW() WHERE id = $1",
        )
        .bind(org_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE accounts SET following_count = GREATEST(following_count - 1, 0), updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(removed)
}

/// Ids of every user following an organization
pub async fn list_follower_ids(pool: &PgPool, org_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT user_id FROM follows WHERE org_id = $1")
        .bind(org_id)
        .fetch_all(pool)
        .await
}

/// Whether a follow edge exists
pub async fn is_following(pool: &PgPool, user_id: Uuid, org_id: Uuid) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM follows WHERE user_id = $1 AND org_id = $2",
    )
    .bind(user_id)
    .bind(org_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}
