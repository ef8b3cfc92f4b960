/**
 * Collaboration Request Model
 *
 * The request lifecycle is a tiny state machine:
 *
 * ```text
 * pending ──accept──▶ accepted
 *    │─────reject──▶ rejected
 *    └─────cancel──▶ cancelled
 * ```
 *
 * All non-pending states are terminal; no transition ever leaves one.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a collaboration request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    /// Stable string form used in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether a transition from `self` to `to` is legal
    pub fn can_transition_to(&self, to: RequestStatus) -> bool {
        *self == Self::Pending && to.is_terminal()
    }
}

/// Collaboration request record as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CollabRequest {
    pub id: Uuid,
    pub event_id: Uuid,
    pub requester_org_id: Uuid,
    /// One of the `RequestStatus` strings
    pub status: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CollabRequest {
    /// Typed view of the stored status
    pub fn request_status(&self) -> Option<RequestStatus> {
        RequestStatus::parse(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Accepted,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_only_pending_is_non_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Accepted.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_legal_transitions() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Accepted));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        for from in [
            RequestStatus::Accepted,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ] {
            for to in [
                RequestStatus::Pending,
                RequestStatus::Accepted,
                RequestStatus::Rejected,
                RequestStatus::Cancelled,
            ] {
                assert!(!from.can_transition_to(to), "{from:?} -> {to:?} must be illegal");
            }
        }
    }

    #[test]
    fn test_pending_cannot_transition_to_pending() {
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    }
}
