/**
 * API Route Handlers
 *
 * Two route groups: `configure_public_routes` (signup, login) and
 * `configure_protected_routes` (everything else). The auth middleware
 * is layered onto the protected group in `router.rs`.
 */

use axum::routing::{delete, get, post};
use axum::Router;

use crate::server::state::AppState;
use crate::{
    attendance, auth, chat, collab, counters, donations, events, follow, notify, reviews,
    volunteer,
};

/// Routes reachable without a token
pub fn configure_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::handlers::signup))
        .route("/api/auth/login", post(auth::handlers::login))
}

/// Routes requiring an authenticated actor
pub fn configure_protected_routes() -> Router<AppState> {
    Router::new()
        // Account
        .route(
            "/api/auth/me",
            get(auth::handlers::me).delete(auth::handlers::delete_me),
        )
        // Events
        .route("/api/events", post(events::handlers::create_event))
        .route(
            "/api/events/{id}",
            get(events::handlers::get_event)
                .patch(events::handlers::update_event)
                .delete(events::handlers::delete_event),
        )
        .route("/api/orgs/{id}/events", get(events::handlers::list_org_events))
        // Collaboration lifecycle
        .route(
            "/api/events/{event_id}/collab/requests",
            post(collab::handlers::create_request).get(collab::handlers::list_pending_requests),
        )
        .route(
            "/api/events/{event_id}/collab/requests/me",
            get(collab::handlers::my_request_status),
        )
        .route(
            "/api/events/{event_id}/collab/requests/{request_id}/accept",
            post(collab::handlers::accept_request),
        )
        .route(
            "/api/events/{event_id}/collab/requests/{request_id}/reject",
            post(collab::handlers::reject_request),
        )
        .route(
            "/api/events/{event_id}/collab/requests/{request_id}",
            delete(collab::handlers::cancel_request),
        )
        // Follows
        .route("/api/orgs/{id}/follow", post(follow::handlers::follow_org))
        .route("/api/orgs/{id}/unfollow", post(follow::handlers::unfollow_org))
        .route(
            "/api/orgs/{id}/following/me",
            get(follow::handlers::is_me_following),
        )
        // Attendance
        .route("/api/events/{id}/attend", post(attendance::handlers::attend))
        .route("/api/events/{id}/unattend", post(attendance::handlers::unattend))
        .route(
            "/api/events/{id}/attending/me",
            get(attendance::handlers::is_me_attending),
        )
        // Volunteers
        .route(
            "/api/events/{event_id}/volunteer",
            post(volunteer::handlers::apply).delete(volunteer::handlers::withdraw),
        )
        .route(
            "/api/events/{event_id}/volunteer/me",
            get(volunteer::handlers::my_volunteer_status),
        )
        .route(
            "/api/events/{event_id}/volunteers",
            get(volunteer::handlers::list_volunteers),
        )
        .route(
            "/api/events/{event_id}/volunteers/{user_id}/approve",
            post(volunteer::handlers::approve_volunteer),
        )
        .route(
            "/api/events/{event_id}/volunteers/{user_id}/reject",
            post(volunteer::handlers::reject_volunteer),
        )
        // Chats
        .route(
            "/api/chats",
            post(chat::handlers::open_chat).get(chat::handlers::list_my_chats),
        )
        .route(
            "/api/chats/{id}/messages",
            post(chat::handlers::send_message).get(chat::handlers::list_messages),
        )
        // Reviews
        .route(
            "/api/events/{event_id}/reviews",
            post(reviews::handlers::post_review).get(reviews::handlers::list_event_reviews),
        )
        .route(
            "/api/reviews/{id}",
            get(reviews::handlers::get_review).delete(reviews::handlers::delete_review),
        )
        // Notifications
        .route("/api/notifications", get(notify::handlers::list_notifications))
        .route(
            "/api/notifications/{id}/read",
            post(notify::handlers::mark_notification_read),
        )
        // Donations
        .route(
            "/api/orgs/me/donations",
            get(donations::handlers::list_my_donations),
        )
        .route(
            "/api/orgs/{org_id}/donations",
            post(donations::handlers::record_donation),
        )
        // Admin counter reconciliation
        .route(
            "/api/admin/events/{id}/reconcile",
            post(counters::handlers::reconcile_event),
        )
        .route(
            "/api/admin/accounts/{id}/reconcile",
            post(counters::handlers::reconcile_account),
        )
}
