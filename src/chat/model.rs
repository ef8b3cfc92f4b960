/**
 * Chat Models
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::accounts::AccountKind;

/// Two-party conversation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chat {
    pub id: Uuid,
    /// "user" | "org"
    pub a_kind: String,
    pub a_id: Uuid,
    pub b_kind: String,
    pub b_id: Uuid,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Whether the given account is one of the two participants
    pub fn has_participant(&self, id: Uuid, kind: AccountKind) -> bool {
        (self.a_id == id && self.a_kind == kind.as_str())
            || (self.b_id == id && self.b_kind == kind.as_str())
    }
}

/// Message within a chat
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_kind: String,
    pub sender_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Clamp a requested page size to 1..100, defaulting to 30
pub fn clamp_page_size(limit: Option<i64>) -> i64 {
    limit.unwrap_or(30).clamp(1, 100)
}
