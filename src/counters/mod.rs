//! Counter Reconciliation
//!
//! Denormalized counters are maintained inline with every edge
//! mutation, but drift is still possible after a bad deploy or a
//! manual database edit. These routines recompute a counter from the
//! live edges and are exposed through admin-only endpoints.

pub mod handlers;

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Recomputed event counters
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EventCounters {
    pub id: Uuid,
    pub total_attending: i32,
    pub total_volunteering: i32,
}

/// Recomputed follow counters for one account
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AccountCounters {
    pub id: Uuid,
    pub followers_count: i32,
    pub following_count: i32,
}

/// Recompute `total_attending` and `total_volunteering` from live edges
pub async fn reconcile_event_counters(
    pool: &PgPool,
    event_id: Uuid,
) -> Result<EventCounters, ApiError> {
    let counters = sqlx::query_as::<_, EventCounters>(
        r#"
        UPDATE events
        SET total_attending = (
                SELECT COUNT(*) FROM attendances WHERE event_id = events.id
            ),
            total_volunteering = (
                SELECT COUNT(*) FROM volunteers
                WHERE event_id = events.id AND status = 'approved'
            ),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, total_attending, total_volunteering
        "#,
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;

    counters.ok_or_else(|| ApiError::not_found("Event not found"))
}

/// Recompute `followers_count` and `following_count` from live edges
pub async fn reconcile_account_counters(
    pool: &PgPool,
    account_id: Uuid,
) -> Result<AccountCounters, ApiError> {
    let counters = sqlx::query_as::<_, AccountCounters>(
        r#"
        UPDATE accounts
        SET followers_count = (
                SELECT COUNT(*) FROM follows WHERE org_id = accounts.id
            ),
            following_count = (
                SELECT COUNT(*) FROM follows WHERE user_id = accounts.id
            ),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, followers_count, following_count
        "#,
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    counters.ok_or_else(|| ApiError::not_found("Account not found"))
}
