//! Account deletion cascade against a live database
//!
//! There are no foreign keys; the cascade is the only thing keeping
//! the store referentially sound, so these tests check both the
//! deleted rows and the counter adjustments on the survivors.

mod common;

use serial_test::serial;
use sqlx::PgPool;
use uuid::Uuid;

use huddle::auth::accounts::{self, AccountKind};
use huddle::reviews::RoleFlags;
use huddle::volunteer::model::VolunteerStatus;
use huddle::{attendance, cascade, chat, collab, follow, reviews, volunteer};

async fn count_rows(pool: &PgPool, table: &str, column: &str, id: Uuid) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE {column} = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn deleting_a_user_restores_counters_and_removes_edges() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();

    let user = common::create_user(pool, "leaver").await;
    let org = common::create_org(pool, "charity").await;
    let event = common::create_future_event(pool, org.id, "Fun Run").await;

    follow::db::follow(pool, user.id, org.id).await.unwrap();
    attendance::db::attend(pool, user.id, event.id).await.unwrap();
    volunteer::db::apply(pool, user.id, event.id).await.unwrap();
    volunteer::db::set_status(pool, user.id, event.id, VolunteerStatus::Approved)
        .await
        .unwrap()
        .unwrap();
    chat::db::open_chat(pool, user.id, AccountKind::User, org.id, AccountKind::Org)
        .await
        .unwrap();
    let flags = RoleFlags { is_participant: true, ..Default::default() };
    reviews::db::create_review(pool, user.id, event.id, 2, "great", flags)
        .await
        .unwrap();

    let report = cascade::delete_account(pool, user.id, AccountKind::User)
        .await
        .unwrap();
    assert_eq!(report.follows, 1);
    assert_eq!(report.attendances, 1);
    assert_eq!(report.volunteers, 1);
    assert_eq!(report.chats, 1);
    assert_eq!(report.reviews, 1);

    // Account gone, edges gone
    assert!(accounts::get_account_by_id(pool, user.id).await.unwrap().is_none());
    assert_eq!(count_rows(pool, "follows", "user_id", user.id).await, 0);
    assert_eq!(count_rows(pool, "attendances", "user_id", user.id).await, 0);
    assert_eq!(count_rows(pool, "volunteers", "user_id", user.id).await, 0);
    assert_eq!(count_rows(pool, "reviews", "user_id", user.id).await, 0);

    // Survivors' counters returned to zero
    let org = common::reload_account(pool, org.id).await;
    assert_eq!(org.followers_count, 0);
    let event = common::reload_event(pool, event.id).await;
    assert_eq!(event.total_attending, 0);
    assert_eq!(event.total_volunteering, 0);
}

#[tokio::test]
#[serial]
async fn deleting_a_conducting_org_removes_its_events() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();

    let org = common::create_org(pool, "doomed").await;
    let follower = common::create_user(pool, "fan").await;
    let attendee = common::create_user(pool, "goer").await;
    let rival = common::create_org(pool, "rival").await;
    let event = common::create_future_event(pool, org.id, "Last Event").await;

    follow::db::follow(pool, follower.id, org.id).await.unwrap();
    attendance::db::attend(pool, attendee.id, event.id).await.unwrap();
    collab::db::create_request(pool, event.id, rival.id, "").await.unwrap();
    let flags = RoleFlags { is_participant: true, ..Default::default() };
    reviews::db::create_review(pool, attendee.id, event.id, 1, "", flags)
        .await
        .unwrap();

    let report = cascade::delete_account(pool, org.id, AccountKind::Org)
        .await
        .unwrap();
    assert_eq!(report.events, 1);
    assert_eq!(report.follows, 1);
    assert_eq!(report.attendances, 1);
    assert_eq!(report.collab_requests, 1);
    assert_eq!(report.reviews, 1);

    assert!(accounts::get_account_by_id(pool, org.id).await.unwrap().is_none());
    assert_eq!(count_rows(pool, "events", "conducting_org_id", org.id).await, 0);
    assert_eq!(count_rows(pool, "attendances", "event_id", event.id).await, 0);
    assert_eq!(count_rows(pool, "collab_requests", "event_id", event.id).await, 0);
    assert_eq!(count_rows(pool, "reviews", "event_id", event.id).await, 0);

    // The follower's own counter came back down
    let follower = common::reload_account(pool, follower.id).await;
    assert_eq!(follower.following_count, 0);
}

#[tokio::test]
#[serial]
async fn deleting_a_collaborator_org_clears_the_slot_but_keeps_the_event() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();

    let conductor = common::create_org(pool, "host").await;
    let collaborator = common::create_org(pool, "partner").await;
    let event = common::create_future_event(pool, conductor.id, "Joint Venture").await;

    let request = collab::db::create_request(pool, event.id, collaborator.id, "")
        .await
        .unwrap();
    collab::db::accept_request(pool, event.id, request.id, conductor.id)
        .await
        .unwrap();

    cascade::delete_account(pool, collaborator.id, AccountKind::Org)
        .await
        .unwrap();

    let event = common::reload_event(pool, event.id).await;
    assert_eq!(event.collaborating_org_id, None);
    assert_eq!(event.conducting_org_id, conductor.id);
}

#[tokio::test]
#[serial]
async fn user_cascade_deletes_chats_and_messages() {
    let Some(db_fixture) = common::TestDatabase::new().await else {
        return;
    };
    let pool = db_fixture.pool();

    let user = common::create_user(pool, "chatty").await;
    let org = common::create_org(pool, "listener").await;

    let conversation =
        chat::db::open_chat(pool, user.id, AccountKind::User, org.id, AccountKind::Org)
            .await
            .unwrap();
    chat::db::add_message(pool, conversation.id, user.id, AccountKind::User, "hi")
        .await
        .unwrap();
    chat::db::add_message(pool, conversation.id, org.id, AccountKind::Org, "hello")
        .await
        .unwrap();

    let report = cascade::delete_account(pool, user.id, AccountKind::User)
        .await
        .unwrap();
    assert_eq!(report.chats, 1);
    assert_eq!(report.messages, 2);

    assert_eq!(count_rows(pool, "messages", "chat_id", conversation.id).await, 0);
    assert_eq!(count_rows(pool, "chats", "id", conversation.id).await, 0);
}
