/**
 * Counter Reconciliation Handlers
 *
 * - `POST /api/admin/events/{id}/reconcile` - Recompute event counters
 * - `POST /api/admin/accounts/{id}/reconcile` - Recompute follow counters
 *
 * Admin only.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::counters::{self, AccountCounters, EventCounters};
use crate::error::ApiError;
use crate::middleware::{Actor, AuthActor};
use crate::server::state::AppState;

fn require_admin(actor: &Actor) -> Result<(), ApiError> {
    if !actor.is_admin() {
        return Err(ApiError::forbidden("Admin access required"));
    }
    Ok(())
}

/// Recompute one event's counters from its live edges
pub async fn reconcile_event(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventCounters>, ApiError> {
    require_admin(&actor)?;

    let counters = counters::reconcile_event_counters(&state.db_pool, event_id).await?;
    tracing::info!(
        event_id = %event_id,
        total_attending = counters.total_attending,
        total_volunteering = counters.total_volunteering,
        "event counters reconciled"
    );

    Ok(Json(counters))
}

/// Recompute one account's follow counters from live edges
pub async fn reconcile_account(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(account_id): Path<Uuid>,
) -> Result<Json<AccountCounters>, ApiError> {
    require_admin(&actor)?;

    let counters = counters::reconcile_account_counters(&state.db_pool, account_id).await?;
    tracing::info!(
        account_id = %account_id,
        followers = counters.followers_count,
        following = counters.following_count,
        "account counters reconciled"
    );

    Ok(Json(counters))
}
