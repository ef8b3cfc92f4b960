/**
 * Event Database Operations
 *
 * Event deletion fans out to the event's attendance and volunteer
 * edges and its collaboration requests in one transaction, so no
 * dangling references to a deleted event survive.
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::events::model::Event;

/// Create a new event conducted by `conducting_org_id`
pub async fn create_event(
    pool: &PgPool,
    conducting_org_id: Uuid,
    name: &str,
    description: &str,
    starts_at: DateTime<Utc>,
    venue: &str,
    is_virtual: bool,
) -> Result<Event, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events
            (id, name, description, starts_at, venue, is_virtual, conducting_org_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(starts_at)
    .bind(venue)
    .bind(is_virtual)
    .bind(conducting_org_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Get event by ID
pub async fn get_event_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get event by ID or fail with `NotFound`
pub async fn require_event(pool: &PgPool, id: Uuid) -> Result<Event, ApiError> {
    get_event_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found"))
}

/// List events conducted or collaborated on by an organization
pub async fn list_org_events(pool: &PgPool, org_id: Uuid) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        SELECT * FROM events
        WHERE conducting_org_id = $1 OR collaborating_org_id = $1
        ORDER BY starts_at ASC
        "#,
    )
    .bind(org_id)
    .fetch_all(pool)
    .await
}

/// Update mutable event fields
///
/// Only fields present in the arguments change; `None` leaves the
/// stored value untouched.
pub async fn update_event(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    starts_at: Option<DateTime<Utc>>,
    venue: Option<&str>,
    is_virtual: Option<bool>,
) -> Result<Event, ApiError> {
    let updated = sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET name        = COALESCE($2, name),
            description = COALESCE($3, description),
            starts_at   = COALESCE($4, starts_at),
            venue       = COALESCE($5, venue),
            is_virtual  = COALESCE($6, is_virtual),
            updated_at  = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(starts_at)
    .bind(venue)
    .bind(is_virtual)
    .fetch_optional(pool)
    .await?;

    updated.ok_or_else(|| ApiError::not_found("Event not found"))
}

/// Delete an event and everything that exists solely because of it
///
/// Removes the event's attendance edges, volunteer edges, and
/// collaboration requests together with the event document, atomically.
pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM attendances WHERE event_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM volunteers WHERE event_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM collab_requests WHERE event_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Event not found"));
    }

    tx.commit().await?;
    Ok(())
}
