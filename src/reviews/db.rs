/**
 * Review Database Operations
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::reviews::model::{Review, RoleFlags};

/// Derive a user's connection to an event from live edges
///
/// Approved volunteer rows, attendance edges, and completed donations
/// each set their flag independently.
pub async fn role_flags(
    pool: &PgPool,
    user_id: Uuid,
    event_id: Uuid,
) -> Result<RoleFlags, sqlx::Error> {
    let (is_volunteer, is_participant, is_donor): (bool, bool, bool) = sqlx::query_as(
        r#"
        SELECT
            EXISTS (SELECT 1 FROM volunteers
                    WHERE user_id = $1 AND event_id = $2 AND status = 'approved'),
            EXISTS (SELECT 1 FROM attendances
                    WHERE user_id = $1 AND event_id = $2),
            EXISTS (SELECT 1 FROM donations
                    WHERE donor_id = $1 AND event_id = $2 AND status = 'completed')
        "#,
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_one(pool)
    .await?;

    Ok(RoleFlags {
        is_volunteer,
        is_participant,
        is_donor,
    })
}

/// Insert a review with its role-flag snapshot
///
/// # Errors
/// `Conflict` if the user has already reviewed this event.
pub async fn create_review(
    pool: &PgPool,
    user_id: Uuid,
    event_id: Uuid,
    rating: i32,
    comment: &str,
    flags: RoleFlags,
) -> Result<Review, ApiError> {
    let result = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews
            (id, user_id, event_id, rating, comment,
             is_volunteer, is_participant, is_donor, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(event_id)
    .bind(rating)
    .bind(comment)
    .bind(flags.is_volunteer)
    .bind(flags.is_participant)
    .bind(flags.is_donor)
    .fetch_one(pool)
    .await;

    match result {
        Ok(review) => Ok(review),
        Err(err) => match ApiError::from(err) {
            ApiError::Conflict(_) => Err(ApiError::conflict(
                "You have already reviewed this event",
            )),
            other => Err(other),
        },
    }
}

/// Fetch one review by id
pub async fn get_review_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Delete a review by id
pub async fn delete_review(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// All reviews for an event, newest first
pub async fn list_for_event(pool: &PgPool, event_id: Uuid) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE event_id = $1 ORDER BY created_at DESC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}
