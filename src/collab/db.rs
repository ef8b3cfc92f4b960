/**
 * Collaboration Request Database Operations
 *
 * All state-changing operations are transactional: the request status
 * change and any dependent event field change persist together or not
 * at all.
 *
 * # Concurrency
 *
 * Two mechanisms carry the invariants under concurrent requests, with
 * no caller-side locks:
 *
 * - the partial unique index on (event_id, requester_org_id) WHERE
 *   status = 'pending' turns a create/create race into a unique-key
 *   violation, which maps to `Conflict`
 * - the collaborator slot is assigned by a conditional update that
 *   only matches while `collaborating_org_id` is still null; of two
 *   racing accepts, the loser updates zero rows and fails with
 *   `Conflict` instead of silently overwriting
 */

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::collab::model::{CollabRequest, RequestStatus};
use crate::error::ApiError;
use crate::events::model::Event;

/// Outcome of a successful accept
#[derive(Debug)]
pub struct AcceptOutcome {
    /// Event with the collaborator now set
    pub event: Event,
    /// The request that was accepted
    pub request: CollabRequest,
    /// How many sibling pending requests were auto-rejected
    pub rejected_siblings: u64,
}

/// Insert a new pending request
///
/// Pre-conditions (event exists, event in the future, no collaborator,
/// requester is not the conductor) are checked by the handler; the
/// duplicate-pending invariant is additionally enforced here by the
/// partial unique index, so a racing duplicate surfaces as `Conflict`.
pub async fn create_request(
    pool: &PgPool,
    event_id: Uuid,
    requester_org_id: Uuid,
    note: &str,
) -> Result<CollabRequest, ApiError> {
    let now = Utc::now();

    let request = sqlx::query_as::<_, CollabRequest>(
        r#"
        INSERT INTO collab_requests (id, event_id, requester_org_id, status, note, created_at, updated_at)
        VALUES ($1, $2, $3, 'pending', $4, $5, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(event_id)
    .bind(requester_org_id)
    .bind(note)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match ApiError::from(e) {
        ApiError::Conflict(_) => {
            ApiError::conflict("You already have a pending request for this event")
        }
        other => other,
    })?;

    Ok(request)
}

/// Find a requester's pending request for an event
pub async fn find_pending_request(
    pool: &PgPool,
    event_id: Uuid,
    requester_org_id: Uuid,
) -> Result<Option<CollabRequest>, sqlx::Error> {
    sqlx::query_as::<_, CollabRequest>(
        r#"
        SELECT * FROM collab_requests
        WHERE event_id = $1 AND requester_org_id = $2 AND status = 'pending'
        "#,
    )
    .bind(event_id)
    .bind(requester_org_id)
    .fetch_optional(pool)
    .await
}

/// Find a requester's latest request for an event, any status
pub async fn find_latest_request(
    pool: &PgPool,
    event_id: Uuid,
    requester_org_id: Uuid,
) -> Result<Option<CollabRequest>, sqlx::Error> {
    sqlx::query_as::<_, CollabRequest>(
        r#"
        SELECT * FROM collab_requests
        WHERE event_id = $1 AND requester_org_id = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(event_id)
    .bind(requester_org_id)
    .fetch_optional(pool)
    .await
}

/// List all pending requests for an event, oldest first
pub async fn list_pending_requests(
    pool: &PgPool,
    event_id: Uuid,
) -> Result<Vec<CollabRequest>, sqlx::Error> {
    sqlx::query_as::<_, CollabRequest>(
        r#"
        SELECT * FROM collab_requests
        WHERE event_id = $1 AND status = 'pending'
        ORDER BY created_at ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}

/// Accept a pending request
///
/// Performs the three-write accept inside one transaction:
/// 1. conditionally set `collaborating_org_id` while it is still null
/// 2. mark the target request accepted
/// 3. auto-reject every other pending request for the same event
///
/// # Errors
/// * `NotFound` - event or pending request absent
/// * `Forbidden` - acting org is not the conducting org
/// * `InvalidState` - event date/time already passed
/// * `Conflict` - collaborator already set, or set concurrently by a
///   racing accept (the conditional update matched zero rows)
pub async fn accept_request(
    pool: &PgPool,
    event_id: Uuid,
    request_id: Uuid,
    acting_org_id: Uuid,
) -> Result<AcceptOutcome, ApiError> {
    let mut tx = pool.begin().await?;

    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found"))?;

    if event.conducting_org_id != acting_org_id {
        return Err(ApiError::forbidden("Only the conducting org can accept"));
    }
    if event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state(
            "Cannot accept collaboration for a past event",
        ));
    }
    if event.collaborating_org_id.is_some() {
        return Err(ApiError::conflict("Event already has a collaborator"));
    }

    let request = sqlx::query_as::<_, CollabRequest>(
        r#"
        SELECT * FROM collab_requests
        WHERE id = $1 AND event_id = $2 AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .bind(event_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Request not found or not pending"))?;

    // Conditional assignment: only succeeds while the slot is still
    // empty. A racing accept that commits first makes this match zero
    // rows, and we fail instead of overwriting.
    let event = sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET collaborating_org_id = $1, updated_at = NOW()
        WHERE id = $2 AND collaborating_org_id IS NULL
        RETURNING *
        "#,
    )
    .bind(request.requester_org_id)
    .bind(event_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::conflict("Another collaborator was set concurrently"))?;

    let request = sqlx::query_as::<_, CollabRequest>(
        r#"
        UPDATE collab_requests
        SET status = 'accepted', updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(request.id)
    .fetch_one(&mut *tx)
    .await?;

    let rejected = sqlx::query(
        r#"
        UPDATE collab_requests
        SET status = 'rejected', updated_at = NOW()
        WHERE event_id = $1 AND status = 'pending' AND id <> $2
        "#,
    )
    .bind(event_id)
    .bind(request.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(AcceptOutcome {
        event,
        request,
        rejected_siblings: rejected.rows_affected(),
    })
}

/// Transition a pending request to a terminal state
///
/// The status change is a single conditional update guarded on
/// `status = 'pending'`, so a request that already left the pending
/// state cannot transition again. Extra filters scope the update to
/// the right event and, for cancel, to the original requester.
async fn finish_pending_request(
    pool: &PgPool,
    event_id: Uuid,
    request_id: Uuid,
    requester_org_id: Option<Uuid>,
    to: RequestStatus,
) -> Result<Option<CollabRequest>, ApiError> {
    debug_assert!(RequestStatus::Pending.can_transition_to(to));

    let updated = sqlx::query_as::<_, CollabRequest>(
        r#"
        UPDATE collab_requests
        SET status = $1, updated_at = NOW()
        WHERE id = $2 AND event_id = $3 AND status = 'pending'
          AND ($4::uuid IS NULL OR requester_org_id = $4)
        RETURNING *
        "#,
    )
    .bind(to.as_str())
    .bind(request_id)
    .bind(event_id)
    .bind(requester_org_id)
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

/// Reject a pending request (conducting org)
pub async fn reject_request(
    pool: &PgPool,
    event_id: Uuid,
    request_id: Uuid,
) -> Result<Option<CollabRequest>, ApiError> {
    finish_pending_request(pool, event_id, request_id, None, RequestStatus::Rejected).await
}

/// Cancel a pending request (original requester only)
pub async fn cancel_request(
    pool: &PgPool,
    event_id: Uuid,
    request_id: Uuid,
    requester_org_id: Uuid,
) -> Result<Option<CollabRequest>, ApiError> {
    finish_pending_request(
        pool,
        event_id,
        request_id,
        Some(requester_org_id),
        RequestStatus::Cancelled,
    )
    .await
}
