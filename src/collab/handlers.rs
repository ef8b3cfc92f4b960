/**
 * Collaboration Request Handlers
 *
 * - `POST   /api/events/{event_id}/collab/requests` - Create a request
 * - `GET    /api/events/{event_id}/collab/requests/me` - My request status
 * - `GET    /api/events/{event_id}/collab/requests` - Pending requests (conducting org)
 * - `POST   /api/events/{event_id}/collab/requests/{request_id}/accept`
 * - `POST   /api/events/{event_id}/collab/requests/{request_id}/reject`
 * - `DELETE /api/events/{event_id}/collab/requests/{request_id}` - Cancel (requester)
 *
 * Every notification is dispatched after the primary write commits and
 * is best-effort; a dispatch failure never fails the request.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::accounts::AccountKind;
use crate::collab::db;
use crate::collab::model::CollabRequest;
use crate::error::ApiError;
use crate::events;
use crate::events::model::Event;
use crate::middleware::{Actor, AuthActor};
use crate::notify::{NotificationDraft, NotificationKind};
use crate::server::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct CreateRequestBody {
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct RequestResponse {
    pub message: String,
    pub request: CollabRequest,
}

#[derive(Debug, Serialize)]
pub struct MyStatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<CollabRequest>,
}

#[derive(Debug, Serialize)]
pub struct PendingListResponse {
    pub items: Vec<CollabRequest>,
}

#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub message: String,
    pub event: Event,
    pub accepted_request_id: Uuid,
    pub rejected_requests: u64,
}

fn require_org(actor: &Actor) -> Result<(), ApiError> {
    if !actor.is_org() {
        return Err(ApiError::forbidden(
            "Only organizations can manage collaboration requests",
        ));
    }
    Ok(())
}

/// Create a collaboration request on an event
pub async fn create_request(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
    body: Option<Json<CreateRequestBody>>,
) -> Result<(StatusCode, Json<RequestResponse>), ApiError> {
    require_org(&actor)?;
    let note = body.map(|Json(b)| b.note).unwrap_or_default();

    let event = events::db::require_event(&state.db_pool, event_id).await?;

    if event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state(
            "Cannot request collaboration for a past event",
        ));
    }
    if event.collaborating_org_id.is_some() {
        return Err(ApiError::conflict(
            "Event already has a collaborator; no more requests allowed",
        ));
    }
    if event.conducting_org_id == actor.id {
        return Err(ApiError::validation(
            "Conducting org cannot request collaboration on its own event",
        ));
    }
    if db::find_pending_request(&state.db_pool, event_id, actor.id)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(
            "You already have a pending request for this event",
        ));
    }

    // The partial unique index backstops the pre-check under races.
    let request = db::create_request(&state.db_pool, event_id, actor.id, &note).await?;

    tracing::info!(
        event_id = %event_id,
        requester = %actor.username,
        request_id = %request.id,
        "collaboration request created"
    );

    state.notifier.notify(
        NotificationDraft::new(
            event.conducting_org_id,
            AccountKind::Org,
            NotificationKind::CollabRequest,
            "New collaboration request",
        )
        .body(format!(
            "{} requested collaboration for your event \"{}\".",
            actor.username, event.name
        ))
        .actor(actor.id, AccountKind::Org)
        .entity("Event", event_id)
        .data(serde_json::json!({ "requestId": request.id })),
    );

    Ok((
        StatusCode::CREATED,
        Json(RequestResponse {
            message: "Request created".to_string(),
            request,
        }),
    ))
}

/// Get my latest request status for an event
pub async fn my_request_status(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<MyStatusResponse>, ApiError> {
    require_org(&actor)?;

    let event = events::db::require_event(&state.db_pool, event_id).await?;

    if let Some(collaborator) = event.collaborating_org_id {
        if collaborator != actor.id {
            return Ok(Json(MyStatusResponse {
                status: "blocked_by_existing_collab".to_string(),
                request: None,
            }));
        }
    }

    match db::find_latest_request(&state.db_pool, event_id, actor.id).await? {
        Some(request) => Ok(Json(MyStatusResponse {
            status: request.status.clone(),
            request: Some(request),
        })),
        None => Ok(Json(MyStatusResponse {
            status: "not_requested".to_string(),
            request: None,
        })),
    }
}

/// List pending requests for an event (conducting org only)
pub async fn list_pending_requests(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<PendingListResponse>, ApiError> {
    require_org(&actor)?;

    let event = events::db::require_event(&state.db_pool, event_id).await?;
    if event.conducting_org_id != actor.id {
        return Err(ApiError::forbidden("Only the conducting org can view requests"));
    }

    let items = db::list_pending_requests(&state.db_pool, event_id).await?;
    Ok(Json(PendingListResponse { items }))
}

/// Accept a pending request (conducting org only)
///
/// Sets the collaborator, marks the request accepted, and auto-rejects
/// every other pending request for the event, atomically.
pub async fn accept_request(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path((event_id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AcceptResponse>, ApiError> {
    require_org(&actor)?;

    let outcome = db::accept_request(&state.db_pool, event_id, request_id, actor.id).await?;

    tracing::info!(
        event_id = %event_id,
        request_id = %request_id,
        collaborator = %outcome.request.requester_org_id,
        rejected_siblings = outcome.rejected_siblings,
        "collaboration request accepted"
    );

    state.notifier.notify(
        NotificationDraft::new(
            outcome.request.requester_org_id,
            AccountKind::Org,
            NotificationKind::CollabAccepted,
            "Collaboration accepted",
        )
        .body(format!(
            "Your collaboration request for \"{}\" was accepted.",
            outcome.event.name
        ))
        .actor(actor.id, AccountKind::Org)
        .entity("Event", event_id)
        .data(serde_json::json!({ "requestId": request_id })),
    );

    Ok(Json(AcceptResponse {
        message: "Accepted".to_string(),
        accepted_request_id: outcome.request.id,
        rejected_requests: outcome.rejected_siblings,
        event: outcome.event,
    }))
}

/// Reject a pending request (conducting org only)
pub async fn reject_request(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path((event_id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RequestResponse>, ApiError> {
    require_org(&actor)?;

    let event = events::db::require_event(&state.db_pool, event_id).await?;
    if event.conducting_org_id != actor.id {
        return Err(ApiError::forbidden("Only the conducting org can reject"));
    }
    if event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state(
            "Cannot reject collaboration for a past event",
        ));
    }

    let request = db::reject_request(&state.db_pool, event_id, request_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found or not pending"))?;

    state.notifier.notify(
        NotificationDraft::new(
            request.requester_org_id,
            AccountKind::Org,
            NotificationKind::CollabRejected,
            "Collaboration rejected",
        )
        .body(format!(
            "Your collaboration request for \"{}\" was rejected.",
            event.name
        ))
        .actor(actor.id, AccountKind::Org)
        .entity("Event", event_id)
        .data(serde_json::json!({ "requestId": request_id })),
    );

    Ok(Json(RequestResponse {
        message: "Rejected".to_string(),
        request,
    }))
}

/// Cancel my pending request (original requester only)
pub async fn cancel_request(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path((event_id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RequestResponse>, ApiError> {
    require_org(&actor)?;

    let request = db::cancel_request(&state.db_pool, event_id, request_id, actor.id)
        .await?
        .ok_or_else(|| ApiError::not_found("No pending request found to cancel"))?;

    // Notify the conducting org, if the event still exists
    if let Some(event) = events::db::get_event_by_id(&state.db_pool, event_id).await? {
        state.notifier.notify(
            NotificationDraft::new(
                event.conducting_org_id,
                AccountKind::Org,
                NotificationKind::CollabCancelled,
                "Collaboration request cancelled",
            )
            .body(format!(
                "{} cancelled their collaboration request for \"{}\".",
                actor.username, event.name
            ))
            .actor(actor.id, AccountKind::Org)
            .entity("Event", event_id)
            .data(serde_json::json!({ "requestId": request_id })),
        );
    }

    Ok(Json(RequestResponse {
        message: "Cancelled".to_string(),
        request,
    }))
}
