/**
 * Review Handlers
 *
 * - `POST   /api/events/{event_id}/reviews` - Post a review (users only)
 * - `GET    /api/events/{event_id}/reviews` - Reviews grouped by role
 * - `GET    /api/reviews/{id}` - Fetch one review
 * - `DELETE /api/reviews/{id}` - Delete my review
 *
 * Reviews open up only after the event has ended, and only to users
 * connected to it (approved volunteer, attendee, or donor).
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
use crate::error::ApiError;
use crate::events;
use crate::middleware::AuthActor;
use crate::notify::{NotificationDraft, NotificationKind};
use crate::reviews::db;
use crate::reviews::model::{self, Review};
use crate::server::state::AppState;

const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct PostReviewBody {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct EventReviewsResponse {
    pub volunteers: Vec<Review>,
    pub participants: Vec<Review>,
    pub donors: Vec<Review>,
    /// Whether the viewing account could post a review itself
    pub viewer_eligible: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Post a review on a finished event
pub async fn post_review(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
    Json(body): Json<PostReviewBody>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can post reviews"));
    }
    if !model::rating_in_bounds(body.rating) {
        return Err(ApiError::validation(format!(
            "Rating must be between {} and {}",
            model::MIN_RATING,
            model::MAX_RATING
        )));
    }
    let comment = body.comment.trim();
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(ApiError::validation("Comment is too long"));
    }

    let event = events::db::require_event(&state.db_pool, event_id).await?;
    if !event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state(
            "Reviews can only be posted after the event has ended",
        ));
    }

    let flags = db::role_flags(&state.db_pool, actor.id, event_id).await?;
    if !flags.any() {
        return Err(ApiError::forbidden(
            "You must be a volunteer, attendee, or donor to review this event",
        ));
    }

    let review = db::create_review(&state.db_pool, actor.id, event_id, body.rating, comment, flags)
        .await?;

    tracing::info!(
        event_id = %event_id,
        reviewer = %actor.username,
        rating = review.rating,
        "review posted"
    );

    state.notifier.notify(
        NotificationDraft::new(
            event.conducting_org_id,
            AccountKind::Org,
            NotificationKind::EventReview,
            "New review",
        )
        .body(format!("{} reviewed \"{}\".", actor.username, event.name))
        .actor(actor.id, AccountKind::User)
        .entity("Event", event_id)
        .data(serde_json::json!({ "reviewId": review.id, "rating": review.rating })),
    );

    Ok((StatusCode::CREATED, Json(review)))
}

/// Reviews for a finished event, grouped by reviewer role
///
/// A review appears in every group whose flag it carries.
pub async fn list_event_reviews(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventReviewsResponse>, ApiError> {
    let event = events::db::require_event(&state.db_pool, event_id).await?;
    if !event.has_started(Utc::now()) {
        return Err(ApiError::invalid_state(
            "Reviews are available after the event has ended",
        ));
    }

    let viewer_eligible = if actor.is_user() {
        db::role_flags(&state.db_pool, actor.id, event_id).await?.any()
    } else {
        false
    };

    let all = db::list_for_event(&state.db_pool, event_id).await?;
    let volunteers = all.iter().filter(|r| r.is_volunteer).cloned().collect();
    let participants = all.iter().filter(|r| r.is_participant).cloned().collect();
    let donors = all.iter().filter(|r| r.is_donor).cloned().collect();

    Ok(Json(EventReviewsResponse {
        volunteers,
        participants,
        donors,
        viewer_eligible,
    }))
}

/// Fetch a single review
pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
) -> Result<Json<Review>, ApiError> {
    let review = db::get_review_by_id(&state.db_pool, review_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    Ok(Json(review))
}

/// Delete my review
pub async fn delete_review(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(review_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can delete reviews"));
    }

    let review = db::get_review_by_id(&state.db_pool, review_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;
    if review.user_id != actor.id {
        return Err(ApiError::forbidden("You can only delete your own review"));
    }

    db::delete_review(&state.db_pool, review_id).await?;

    Ok(Json(DeletedResponse { deleted: true }))
}
