/**
 * Attendance Handlers
 *
 * - `POST /api/events/{id}/attend` - Mark attendance (users only)
 * - `POST /api/events/{id}/unattend` - Withdraw attendance
 * - `GET  /api/events/{id}/attending/me` - Am I attending?
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::attendance::db;
use crate::auth::accounts::AccountKind;
use crate::error::ApiError;
use crate::events;
use crate::middleware::AuthActor;
use crate::notify::{NotificationDraft, NotificationKind};
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub attending: bool,
}

#[derive(Debug, Serialize)]
pub struct UnattendResponse {
    pub attending: bool,
    pub removed: bool,
}

/// Mark the authenticated user as attending an event
pub async fn attend(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AttendanceResponse>), ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can attend events"));
    }

    let event = events::db::require_event(&state.db_pool, event_id).await?;
    if event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state(
            "Cannot attend; event date has already passed",
        ));
    }

    let created = db::attend(&state.db_pool, actor.id, event_id).await?;
    if !created {
        return Err(ApiError::conflict(
            "User is already marked as attending this event",
        ));
    }

    state.notifier.notify(
        NotificationDraft::new(
            event.conducting_org_id,
            AccountKind::Org,
            NotificationKind::AttendEvent,
            "New attendee",
        )
        .body(format!("{} is attending \"{}\".", actor.username, event.name))
        .actor(actor.id, AccountKind::User)
        .entity("Event", event_id),
    );

    Ok((StatusCode::CREATED, Json(AttendanceResponse { attending: true })))
}

/// Withdraw the authenticated user's attendance
pub async fn unattend(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<UnattendResponse>, ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can unattend events"));
    }

    let event = events::db::require_event(&state.db_pool, event_id).await?;
    if event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state(
            "Cannot change attendance; event date has already passed",
        ));
    }

    let removed = db::unattend(&state.db_pool, actor.id, event_id).await?;

    Ok(Json(UnattendResponse {
        attending: false,
        removed,
    }))
}

/// Whether the authenticated user is attending an event
pub async fn is_me_attending(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can query this"));
    }

    let attending = db::is_attending(&state.db_pool, actor.id, event_id).await?;
    Ok(Json(AttendanceResponse { attending }))
}
