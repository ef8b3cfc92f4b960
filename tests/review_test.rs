//! Post-event review rules against a live database
//!
//! Drives the review handlers end to end: participation gating, the
//! post-event-only window, one review per (user, event), rating
//! bounds, and owner-only deletion.

mod common;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::Json;
use serial_test::serial;
use sqlx::PgPool;
use uuid::Uuid;

use huddle::error::ApiError;
use huddle::middleware::AuthActor;
use huddle::reviews::handlers::{self, PostReviewBody};

/// Push an event's start into the past so reviews open up
async fn finish_event(pool: &PgPool, event_id: Uuid) {
    sqlx::query("UPDATE events SET starts_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(event_id)
        .execute(pool)
        .await
        .unwrap();
}

fn review_body(rating: i32, comment: &str) -> Json<PostReviewBody> {
    Json(PostReviewBody {
        rating,
        comment: comment.to_string(),
    })
}

#[tokio::test]
#[serial]
async fn only_participants_may_review() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();
    let state = db_fixture.app_state();

    let conductor = common::create_org(pool, "conductor").await;
    let attendee = common::create_user(pool, "attendee").await;
    let bystander = common::create_user(pool, "bystander").await;
    let event = common::create_future_event(pool, conductor.id, "Charity Run").await;

    huddle::attendance::db::attend(pool, attendee.id, event.id)
        .await
        .unwrap();
    finish_event(pool, event.id).await;

    let uninvolved = handlers::post_review(
        State(state.clone()),
        AuthActor(common::actor_for(&bystander)),
        Path(event.id),
        review_body(1, "was fine"),
    )
    .await;
    assert_matches!(uninvolved, Err(ApiError::Forbidden(_)));

    let (status, Json(review)) = handlers::post_review(
        State(state),
        AuthActor(common::actor_for(&attendee)),
        Path(event.id),
        review_body(2, "well organized"),
    )
    .await
    .unwrap();

    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert!(review.is_participant);
    assert!(!review.is_volunteer);
    assert!(!review.is_donor);
}

#[tokio::test]
#[serial]
async fn reviews_open_only_after_the_event() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();
    let state = db_fixture.app_state();

    let conductor = common::create_org(pool, "conductor").await;
    let attendee = common::create_user(pool, "attendee").await;
    let event = common::create_future_event(pool, conductor.id, "Gala").await;

    huddle::attendance::db::attend(pool, attendee.id, event.id)
        .await
        .unwrap();

    let too_early = handlers::post_review(
        State(state),
        AuthActor(common::actor_for(&attendee)),
        Path(event.id),
        review_body(0, ""),
    )
    .await;
    assert_matches!(too_early, Err(ApiError::InvalidState(_)));
}

#[tokio::test]
#[serial]
async fn second_review_for_the_same_event_is_conflict() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();
    let state = db_fixture.app_state();

    let conductor = common::create_org(pool, "conductor").await;
    let attendee = common::create_user(pool, "attendee").await;
    let event = common::create_future_event(pool, conductor.id, "Book Fair").await;

    huddle::attendance::db::attend(pool, attendee.id, event.id)
        .await
        .unwrap();
    finish_event(pool, event.id).await;

    handlers::post_review(
        State(state.clone()),
        AuthActor(common::actor_for(&attendee)),
        Path(event.id),
        review_body(1, "good"),
    )
    .await
    .unwrap();

    let second = handlers::post_review(
        State(state),
        AuthActor(common::actor_for(&attendee)),
        Path(event.id),
        review_body(-1, "changed my mind"),
    )
    .await;
    assert_matches!(second, Err(ApiError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn rating_outside_the_scale_is_rejected() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();
    let state = db_fixture.app_state();

    let conductor = common::create_org(pool, "conductor").await;
    let attendee = common::create_user(pool, "attendee").await;
    let event = common::create_future_event(pool, conductor.id, "Picnic").await;

    let result = handlers::post_review(
        State(state),
        AuthActor(common::actor_for(&attendee)),
        Path(event.id),
        review_body(3, "off the charts"),
    )
    .await;
    assert_matches!(result, Err(ApiError::Validation(_)));
}

#[tokio::test]
#[serial]
async fn only_the_author_may_delete_a_review() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();
    let state = db_fixture.app_state();

    let conductor = common::create_org(pool, "conductor").await;
    let author = common::create_user(pool, "author").await;
    let meddler = common::create_user(pool, "meddler").await;
    let event = common::create_future_event(pool, conductor.id, "Marathon").await;

    huddle::attendance::db::attend(pool, author.id, event.id)
        .await
        .unwrap();
    finish_event(pool, event.id).await;

    let (_, Json(review)) = handlers::post_review(
        State(state.clone()),
        AuthActor(common::actor_for(&author)),
        Path(event.id),
        review_body(2, "loved it"),
    )
    .await
    .unwrap();

    let as_meddler = handlers::delete_review(
        State(state.clone()),
        AuthActor(common::actor_for(&meddler)),
        Path(review.id),
    )
    .await;
    assert_matches!(as_meddler, Err(ApiError::Forbidden(_)));

    let Json(deleted) = handlers::delete_review(
        State(state.clone()),
        AuthActor(common::actor_for(&author)),
        Path(review.id),
    )
    .await
    .unwrap();
    assert!(deleted.deleted);

    let gone = handlers::get_review(State(state), Path(review.id)).await;
    assert_matches!(gone, Err(ApiError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn listing_groups_reviews_by_role() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();
    let state = db_fixture.app_state();

    let conductor = common::create_org(pool, "conductor").await;
    let volunteer = common::create_user(pool, "volunteer").await;
    let donor = common::create_user(pool, "donor").await;
    let event = common::create_future_event(pool, conductor.id, "Food Drive").await;

    sqlx::query("INSERT INTO volunteers (user_id, event_id, status) VALUES ($1, $2, 'approved')")
        .bind(volunteer.id)
        .bind(event.id)
        .execute(pool)
        .await
        .unwrap();
    huddle::donations::db::record_donation(
        pool,
        donor.id,
        conductor.id,
        Some(event.id),
        5000,
        "txn_review_grouping",
    )
    .await
    .unwrap();
    finish_event(pool, event.id).await;

    for user in [&volunteer, &donor] {
        handlers::post_review(
            State(state.clone()),
            AuthActor(common::actor_for(user)),
            Path(event.id),
            review_body(2, "great cause"),
        )
        .await
        .unwrap();
    }

    let Json(listing) = handlers::list_event_reviews(
        State(state.clone()),
        AuthActor(common::actor_for(&donor)),
        Path(event.id),
    )
    .await
    .unwrap();

    assert_eq!(listing.volunteers.len(), 1);
    assert_eq!(listing.volunteers[0].user_id, volunteer.id);
    assert_eq!(listing.donors.len(), 1);
    assert_eq!(listing.donors[0].user_id, donor.id);
    assert!(listing.participants.is_empty());
    assert!(listing.viewer_eligible);

    // Orgs can read but are never themselves eligible to post
    let Json(as_org) = handlers::list_event_reviews(
        State(state),
        AuthActor(common::actor_for(&conductor)),
        Path(event.id),
    )
    .await
    .unwrap();
    assert!(!as_org.viewer_eligible);
}
