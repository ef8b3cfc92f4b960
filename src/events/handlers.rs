/**
 * Event Handlers
 *
 * - `POST /api/events` - Create (org only)
 * - `GET /api/events/{id}` - Fetch one
 * - `PATCH /api/events/{id}` - Update (conducting org only)
 * - `DELETE /api/events/{id}` - Delete (conducting org only, future events only)
 * - `GET /api/orgs/{id}/events` - Events an org conducts or collaborates on
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::accounts::AccountKind;
use crate::error::ApiError;
use crate::events::db;
use crate::events::model::Event;
use crate::follow;
use crate::middleware::AuthActor;
use crate::notify::{NotificationDraft, NotificationKind};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub is_virtual: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub is_virtual: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Create a new event
pub async fn create_event(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    if !actor.is_org() {
        return Err(ApiError::forbidden("Only organizations can create events"));
    }
    if request.name.trim().is_empty() {
        return Err(ApiError::validation("Event name is required"));
    }
    if request.starts_at <= Utc::now() {
        return Err(ApiError::validation("Event date/time must be in the future"));
    }

    let event = db::create_event(
        &state.db_pool,
        actor.id,
        request.name.trim(),
        &request.description,
        request.starts_at,
        &request.venue,
        request.is_virtual,
    )
    .await?;

    tracing::info!(event_id = %event.id, org = %actor.username, "event created");

    // Followers of the conducting org hear about the new event.
    let followers = follow::db::list_follower_ids(&state.db_pool, actor.id).await?;
    for follower_id in followers {
        state.notifier.notify(
            NotificationDraft::new(
                follower_id,
                AccountKind::User,
                NotificationKind::EventCreated,
                "New event",
            )
            .body(format!("{} is hosting \"{}\".", actor.username, event.name))
            .actor(actor.id, AccountKind::Org)
            .entity("Event", event.id),
        );
    }

    Ok((StatusCode::CREATED, Json(event)))
}

/// Fetch a single event
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = db::require_event(&state.db_pool, event_id).await?;
    Ok(Json(event))
}

/// Update an event's mutable fields
pub async fn update_event(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = db::require_event(&state.db_pool, event_id).await?;
    if event.conducting_org_id != actor.id {
        return Err(ApiError::forbidden("Only the conducting org can update this event"));
    }
    if let Some(starts_at) = request.starts_at {
        if starts_at <= Utc::now() {
            return Err(ApiError::validation("Event date/time must be in the future"));
        }
    }

    let updated = db::update_event(
        &state.db_pool,
        event_id,
        request.name.as_deref(),
        request.description.as_deref(),
        request.starts_at,
        request.venue.as_deref(),
        request.is_virtual,
    )
    .await?;

    Ok(Json(updated))
}

/// Delete an event
///
/// Owner only, and only while the event has not started.
pub async fn delete_event(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let event = db::require_event(&state.db_pool, event_id).await?;
    if event.conducting_org_id != actor.id {
        return Err(ApiError::forbidden("Not authorized to delete this event"));
    }
    if event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state("Cannot delete an event that has already started"));
    }

    db::delete_event(&state.db_pool, event_id).await?;
    tracing::info!(event_id = %event_id, org = %actor.username, "event deleted");

    Ok(Json(DeletedResponse { deleted: true }))
}

/// List events an organization conducts or collaborates on
pub async fn list_org_events(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = db::list_org_events(&state.db_pool, org_id).await?;
    Ok(Json(events))
}
