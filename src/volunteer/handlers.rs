/**
 * Volunteer Handlers
 *
 * - `POST   /api/events/{event_id}/volunteer` - Apply to volunteer (users only)
 * - `DELETE /api/events/{event_id}/volunteer` - Withdraw application
 * - `GET    /api/events/{event_id}/volunteer/me` - My application status
 * - `GET    /api/events/{event_id}/volunteers` - List applications (managing orgs)
 * - `POST   /api/events/{event_id}/volunteers/{user_id}/approve`
 * - `POST   /api/events/{event_id}/volunteers/{user_id}/reject`
 *
 * Approval and rejection are open to the conducting org and to the
 * collaborating org, if one is set.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::accounts::AccountKind;
use crate::error::ApiError;
use crate::events;
use crate::middleware::{Actor, AuthActor};
use crate::notify::{NotificationDraft, NotificationKind};
use crate::server::state::AppState;
use crate::volunteer::db;
use crate::volunteer::model::{VolunteerRecord, VolunteerStatus};

#[derive(Debug, Serialize)]
pub struct VolunteerResponse {
    pub message: String,
    pub record: VolunteerRecord,
}

#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    pub volunteering: bool,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct MyVolunteerStatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<VolunteerRecord>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListVolunteersQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VolunteerListResponse {
    pub items: Vec<VolunteerRecord>,
}

async fn require_managing_org(
    state: &AppState,
    actor: &Actor,
    event_id: Uuid,
) -> Result<events::model::Event, ApiError> {
    if !actor.is_org() {
        return Err(ApiError::forbidden(
            "Only organizations can manage volunteers",
        ));
    }
    let event = events::db::require_event(&state.db_pool, event_id).await?;
    if !event.is_managed_by(actor.id) {
        return Err(ApiError::forbidden(
            "Only the conducting or collaborating org can manage volunteers",
        ));
    }
    Ok(event)
}

/// Apply to volunteer for an event
pub async fn apply(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<(StatusCode, Json<VolunteerResponse>), ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can volunteer for events"));
    }

    let event = events::db::require_event(&state.db_pool, event_id).await?;
    if event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state(
            "Cannot volunteer; event date has already passed",
        ));
    }

    let record = db::apply(&state.db_pool, actor.id, event_id).await?;

    state.notifier.notify(
        NotificationDraft::new(
            event.conducting_org_id,
            AccountKind::Org,
            NotificationKind::VolunteerApplied,
            "New volunteer application",
        )
        .body(format!(
            "{} applied to volunteer for \"{}\".",
            actor.username, event.name
        ))
        .actor(actor.id, AccountKind::User)
        .entity("Event", event_id),
    );

    Ok((
        StatusCode::CREATED,
        Json(VolunteerResponse {
            message: "Application submitted".to_string(),
            record,
        }),
    ))
}

/// Withdraw my volunteer application
pub async fn withdraw(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<WithdrawResponse>, ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can withdraw applications"));
    }

    let event = events::db::require_event(&state.db_pool, event_id).await?;
    if event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state(
            "Cannot withdraw; event date has already passed",
        ));
    }

    let removed = db::withdraw(&state.db_pool, actor.id, event_id).await?;

    Ok(Json(WithdrawResponse {
        volunteering: false,
        removed,
    }))
}

/// My volunteer application status for an event
pub async fn my_volunteer_status(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<MyVolunteerStatusResponse>, ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can query this"));
    }

    events::db::require_event(&state.db_pool, event_id).await?;

    match db::find_record(&state.db_pool, actor.id, event_id).await? {
        Some(record) => Ok(Json(MyVolunteerStatusResponse {
            status: record.status.clone(),
            record: Some(record),
        })),
        None => Ok(Json(MyVolunteerStatusResponse {
            status: "not_applied".to_string(),
            record: None,
        })),
    }
}

/// List volunteer applications for an event (managing orgs only)
pub async fn list_volunteers(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
    Query(query): Query<ListVolunteersQuery>,
) -> Result<Json<VolunteerListResponse>, ApiError> {
    require_managing_org(&state, &actor, event_id).await?;

    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(VolunteerStatus::parse(s).ok_or_else(|| {
            ApiError::validation("status must be one of pending, approved, rejected")
        })?),
    };

    let items = db::list_for_event(&state.db_pool, event_id, status).await?;
    Ok(Json(VolunteerListResponse { items }))
}

async fn set_volunteer_status(
    state: AppState,
    actor: Actor,
    event_id: Uuid,
    user_id: Uuid,
    to: VolunteerStatus,
) -> Result<Json<VolunteerResponse>, ApiError> {
    let event = require_managing_org(&state, &actor, event_id).await?;

    let record = db::set_status(&state.db_pool, user_id, event_id, to)
        .await?
        .ok_or_else(|| ApiError::not_found("No volunteer application for this user"))?;

    tracing::info!(
        event_id = %event_id,
        volunteer = %user_id,
        status = %record.status,
        "volunteer application updated"
    );

    let (kind, title, verb) = match to {
        VolunteerStatus::Approved => (
            NotificationKind::VolunteerApproved,
            "Volunteer application approved",
            "approved",
        ),
        _ => (
            NotificationKind::VolunteerRejected,
            "Volunteer application rejected",
            "rejected",
        ),
    };

    state.notifier.notify(
        NotificationDraft::new(user_id, AccountKind::User, kind, title)
            .body(format!(
                "Your volunteer application for \"{}\" was {}.",
                event.name, verb
            ))
            .actor(actor.id, AccountKind::Org)
            .entity("Event", event_id),
    );

    Ok(Json(VolunteerResponse {
        message: format!("Application {verb}"),
        record,
    }))
}

/// Approve a volunteer application (managing orgs only)
pub async fn approve_volunteer(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<VolunteerResponse>, ApiError> {
    set_volunteer_status(state, actor, event_id, user_id, VolunteerStatus::Approved).await
}

/// Reject a volunteer application (managing orgs only)
pub async fn reject_volunteer(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<VolunteerResponse>, ApiError> {
    set_volunteer_status(state, actor, event_id, user_id, VolunteerStatus::Rejected).await
}
