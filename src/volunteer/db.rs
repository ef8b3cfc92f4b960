/**
 * Volunteer Edge Database Operations
 *
 * `total_volunteering` moves only when a row crosses the approved
 * boundary, and always in the same transaction as the status change.
 * The row is locked (`FOR UPDATE`) for read-modify-write transitions
 * so two concurrent approvals cannot both increment.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::volunteer::model::{VolunteerRecord, VolunteerStatus};

async fn bump_total_volunteering(
    tx: &mut sqlx::PgConnection,
    event_id: Uuid,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE events
        SET total_volunteering = GREATEST(total_volunteering + $2, 0), updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(event_id)
    .bind(delta)
    .execute(tx)
    .await?;
    Ok(())
}

/// Apply to volunteer (or re-open a previously rejected application)
///
/// - no row: insert as pending
/// - rejected: re-open as pending
/// - pending: no-op
/// - approved: back to pending, decrementing the counter it held
pub async fn apply(
    pool: &PgPool,
    user_id: Uuid,
    event_id: Uuid,
) -> Result<VolunteerRecord, ApiError> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, VolunteerRecord>(
        "SELECT * FROM volunteers WHERE user_id = $1 AND event_id = $2 FOR UPDATE",
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_optional(&mut *tx)
    .await?;

    let record = match existing {
        None => {
            sqlx::query_as::<_, VolunteerRecord>(
                r#"
                INSERT INTO volunteers (user_id, event_id, status, created_at, updated_at)
                VALUES ($1, $2, 'pending', NOW(), NOW())
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?
        }
        Some(record) if record.status == VolunteerStatus::Pending.as_str() => record,
        Some(record) => {
            if record.volunteer_status().map(|s| s.counts()).unwrap_or(false) {
                bump_total_volunteering(&mut *tx, event_id, -1).await?;
            }
            sqlx::query_as::<_, VolunteerRecord>(
                r#"
                UPDATE volunteers SET status = 'pending', updated_at = NOW()
                WHERE user_id = $1 AND event_id = $2
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    tx.commit().await?;
    Ok(record)
}

/// Withdraw a volunteer application
///
/// # Returns
/// `true` if a row was actually removed. An approved row takes its
/// counter contribution with it.
pub async fn withdraw(pool: &PgPool, user_id: Uuid, event_id: Uuid) -> Result<bool, ApiError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query_as::<_, VolunteerRecord>(
        "DELETE FROM volunteers WHERE user_id = $1 AND event_id = $2 RETURNING *",
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_optional(&mut *tx)
    .await?;

    let removed = match &deleted {
        Some(record) => {
            if record.volunteer_status().map(|s| s.counts()).unwrap_or(false) {
                bump_total_volunteering(&mut *tx, event_id, -1).await?;
            }
            true
        }
        None => false,
    };

    tx.commit().await?;
    Ok(removed)
}

/// Set a volunteer's status (approve/reject)
///
/// # Returns
/// The updated record, or `None` if no application exists.
pub async fn set_status(
    pool: &PgPool,
    user_id: Uuid,
    event_id: Uuid,
    to: VolunteerStatus,
) -> Result<Option<VolunteerRecord>, ApiError> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, VolunteerRecord>(
        "SELECT * FROM volunteers WHERE user_id = $1 AND event_id = $2 FOR UPDATE",
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(existing) = existing else {
        return Ok(None);
    };

    let was_counted = existing
        .volunteer_status()
        .map(|s| s.counts())
        .unwrap_or(false);

    let record = if existing.status == to.as_str() {
        existing
    } else {
        let updated = sqlx::query_as::<_, VolunteerRecord>(
            r#"
            UPDATE volunteers SET status = $3, updated_at = NOW()
            WHERE user_id = $1 AND event_id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(to.as_str())
        .fetch_one(&mut *tx)
        .await?;

        match (was_counted, to.counts()) {
            (false, true) => bump_total_volunteering(&mut *tx, event_id, 1).await?,
            (true, false) => bump_total_volunteering(&mut *tx, event_id, -1).await?,
            _ => {}
        }

        updated
    };

    tx.commit().await?;
    Ok(Some(record))
}

/// List volunteers for an event, optionally filtered by status
pub async fn list_for_event(
    pool: &PgPool,
    event_id: Uuid,
    status: Option<VolunteerStatus>,
) -> Result<Vec<VolunteerRecord>, sqlx::Error> {
    sqlx::query_as::<_, VolunteerRecord>(
        r#"
        SELECT * FROM volunteers
        WHERE event_id = $1 AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(event_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await
}

/// The user's volunteer record for an event, if any
pub async fn find_record(
    pool: &PgPool,
    user_id: Uuid,
    event_id: Uuid,
) -> Result<Option<VolunteerRecord>, sqlx::Error> {
    sqlx::query_as::<_, VolunteerRecord>(
        "SELECT * FROM volunteers WHERE user_id = $1 AND event_id = $2",
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_optional(pool)
    .await
}
