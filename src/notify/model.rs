/**
 * Notification Model
 *
 * An inbox entry addressed to a user or organization, optionally
 * attributed to an acting account and linked to a related entity.
 * `read_at` null means unread.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of notification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    FollowOrg,
    EventCreated,
    EventReminder,
    ChatMessage,
    CollabRequest,
    CollabAccepted,
    CollabRejected,
    CollabCancelled,
    DonationReceived,
    AttendEvent,
    EventReview,
    VolunteerApplied,
    VolunteerApproved,
    VolunteerRejected,
}

impl NotificationKind {
    /// Stable wire/storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FollowOrg => "FOLLOW_ORG",
            Self::EventCreated => "EVENT_CREATED",
            Self::EventReminder => "EVENT_REMINDER",
            Self::ChatMessage => "CHAT_MESSAGE",
            Self::CollabRequest => "COLLAB_REQUEST",
            Self::CollabAccepted => "COLLAB_ACCEPTED",
            Self::CollabRejected => "COLLAB_REJECTED",
            Self::CollabCancelled => "COLLAB_CANCELLED",
            Self::DonationReceived => "DONATION_RECEIVED",
            Self::AttendEvent => "ATTEND_EVENT",
            Self::EventReview => "EVENT_REVIEW",
            Self::VolunteerApplied => "VOLUNTEER_APPLIED",
            Self::VolunteerApproved => "VOLUNTEER_APPROVED",
            Self::VolunteerRejected => "VOLUNTEER_REJECTED",
        }
    }
}

/// Notification record as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    /// "user" | "org"
    pub recipient_kind: String,
    pub actor_id: Option<Uuid>,
    pub actor_kind: Option<String>,
    /// One of the `NotificationKind` wire strings
    pub kind: String,
    pub title: String,
    pub body: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub data: serde_json::Value,
    /// Null = unread
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
