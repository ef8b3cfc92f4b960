/**
 * Follow Handlers
 *
 * - `POST /api/orgs/{id}/follow` - Follow an organization
 * - `POST /api/orgs/{id}/unfollow` - Unfollow
 * - `GET  /api/orgs/{id}/following/me` - Am I following?
 *
 * The mutations return the edge's new existence state.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::accounts::{self, AccountKind};
use crate::error::ApiError;
use crate::follow::db;
use crate::middleware::AuthActor;
use crate::notify::{NotificationDraft, NotificationKind};
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub following: bool,
}

/// Follow an organization
pub async fn follow_org(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(org_id): Path<Uuid>,
) -> Result<(StatusCode, Json<FollowResponse>), ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can follow organizations"));
    }
    let org = accounts::get_org_by_id(&state.db_pool, org_id).await?;

    let created = db::follow(&state.db_pool, actor.id, org_id).await?;
    if !created {
        return Err(ApiError::conflict("Already following this organization"));
    }

    state.notifier.notify(
        NotificationDraft::new(
            org_id,
            AccountKind::Org,
            NotificationKind::FollowOrg,
            "New follower",
        )
        .body(format!("{} started following {}.", actor.username, org.display_name))
        .actor(actor.id, AccountKind::User),
    );

    Ok((StatusCode::CREATED, Json(FollowResponse { following: true })))
}

/// Unfollow an organization
///
/// Removing a non-existent edge is a no-op that still reports the new
/// (absent) state.
pub async fn unfollow_org(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(org_id): Path<Uuid>,
) -> Result<Json<FollowResponse>, ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can unfollow organizations"));
    }
    accounts::get_org_by_id(&state.db_pool, org_id).await?;

    db::unfollow(&state.db_pool, actor.id, org_id).await?;

    Ok(Json(FollowResponse { following: false }))
}

/// Whether the authenticated user follows an organization
pub async fn is_me_following(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(org_id): Path<Uuid>,
) -> Result<Json<FollowResponse>, ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can query this"));
    }

    let following = db::is_following(&state.db_pool, actor.id, org_id).await?;
    Ok(Json(FollowResponse { following }))
}
