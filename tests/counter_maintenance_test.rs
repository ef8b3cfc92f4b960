//! Denormalized counter maintenance against a live database
//!
//! Counters move exactly once per effective edge mutation, clamp at
//! zero, and can be rebuilt from live edges by the reconciliation
//! routines.

mod common;

use serial_test::serial;

use huddle::volunteer::model::VolunteerStatus;
use huddle::{attendance, counters, follow, volunteer};

#[tokio::test]
#[serial]
async fn follow_moves_both_counters_once() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();

    let user = common::create_user(pool, "alice").await;
    let org = common::create_org(pool, "shelter").await;

    assert!(follow::db::follow(pool, user.id, org.id).await.unwrap());
    // Duplicate follow changes nothing
    assert!(!follow::db::follow(pool, user.id, org.id).await.unwrap());

    let org = common::reload_account(pool, org.id).await;
    let user = common::reload_account(pool, user.id).await;
    assert_eq!(org.followers_count, 1);
    assert_eq!(user.following_count, 1);

    assert!(follow::db::unfollow(pool, user.id, org.id).await.unwrap());
    // Unfollow of a non-edge is a no-op, counters do not go negative
    assert!(!follow::db::unfollow(pool, user.id, org.id).await.unwrap());

    let org = common::reload_account(pool, org.id).await;
    let user = common::reload_account(pool, user.id).await;
    assert_eq!(org.followers_count, 0);
    assert_eq!(user.following_count, 0);
}

#[tokio::test]
#[serial]
async fn attendance_counter_tracks_effective_mutations() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();

    let user = common::create_user(pool, "bob").await;
    let org = common::create_org(pool, "library").await;
    let event = common::create_future_event(pool, org.id, "Reading Night").await;

    assert!(attendance::db::attend(pool, user.id, event.id).await.unwrap());
    assert!(!attendance::db::attend(pool, user.id, event.id).await.unwrap());
    assert_eq!(common::reload_event(pool, event.id).await.total_attending, 1);

    assert!(attendance::db::unattend(pool, user.id, event.id).await.unwrap());
    assert!(!attendance::db::unattend(pool, user.id, event.id).await.unwrap());
    assert_eq!(common::reload_event(pool, event.id).await.total_attending, 0);
}

#[tokio::test]
#[serial]
async fn volunteering_counts_only_approved_rows() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();

    let user = common::create_user(pool, "carol").await;
    let org = common::create_org(pool, "foodbank").await;
    let event = common::create_future_event(pool, org.id, "Soup Kitchen").await;

    volunteer::db::apply(pool, user.id, event.id).await.unwrap();
    assert_eq!(common::reload_event(pool, event.id).await.total_volunteering, 0);

    // pending -> approved increments
    volunteer::db::set_status(pool, user.id, event.id, VolunteerStatus::Approved)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(common::reload_event(pool, event.id).await.total_volunteering, 1);

    // approved -> approved is a no-op
    volunteer::db::set_status(pool, user.id, event.id, VolunteerStatus::Approved)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(common::reload_event(pool, event.id).await.total_volunteering, 1);

    // approved -> rejected decrements
    volunteer::db::set_status(pool, user.id, event.id, VolunteerStatus::Rejected)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(common::reload_event(pool, event.id).await.total_volunteering, 0);

    // re-apply, approve, then withdraw takes the contribution with it
    volunteer::db::apply(pool, user.id, event.id).await.unwrap();
    volunteer::db::set_status(pool, user.id, event.id, VolunteerStatus::Approved)
        .await
        .unwrap()
        .unwrap();
    assert!(volunteer::db::withdraw(pool, user.id, event.id).await.unwrap());
    assert_eq!(common::reload_event(pool, event.id).await.total_volunteering, 0);
}

#[tokio::test]
#[serial]
async fn reconciliation_repairs_drifted_counters() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();

    let user = common::create_user(pool, "dave").await;
    let org = common::create_org(pool, "museum").await;
    let event = common::create_future_event(pool, org.id, "Open Day").await;

    follow::db::follow(pool, user.id, org.id).await.unwrap();
    attendance::db::attend(pool, user.id, event.id).await.unwrap();
    volunteer::db::apply(pool, user.id, event.id).await.unwrap();
    volunteer::db::set_status(pool, user.id, event.id, VolunteerStatus::Approved)
        .await
        .unwrap()
        .unwrap();

    // Simulate drift
    sqlx::query("UPDATE events SET total_attending = 99, total_volunteering = 99 WHERE id = $1")
        .bind(event.id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("UPDATE accounts SET followers_count = 99 WHERE id = $1")
        .bind(org.id)
        .execute(pool)
        .await
        .unwrap();

    let event_counters = counters::reconcile_event_counters(pool, event.id).await.unwrap();
    assert_eq!(event_counters.total_attending, 1);
    assert_eq!(event_counters.total_volunteering, 1);

    let org_counters = counters::reconcile_account_counters(pool, org.id).await.unwrap();
    assert_eq!(org_counters.followers_count, 1);
    assert_eq!(org_counters.following_count, 0);
}
