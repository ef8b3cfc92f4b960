/**
 * Inbox Handlers
 *
 * - `GET /api/notifications` - List my notifications
 * - `POST /api/notifications/{id}/read` - Mark one read
 */

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthActor;
use crate::notify::db;
use crate::notify::model::Notification;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    pub limit: Option<i64>,
}

/// List the authenticated account's notifications, unread first
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Query(query): Query<InboxQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let items = db::list_inbox(
        &state.db_pool,
        actor.id,
        actor.kind,
        query.limit.unwrap_or(30),
    )
    .await?;

    Ok(Json(items))
}

/// Mark one of my notifications as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let updated = db::mark_read(&state.db_pool, notification_id, actor.id).await?;
    Ok(Json(updated))
}
