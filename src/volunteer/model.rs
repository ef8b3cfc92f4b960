/**
 * Volunteer Model
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Volunteer application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolunteerStatus {
    Pending,
    Approved,
    Rejected,
}

impl VolunteerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Only approved rows count toward `total_volunteering`
    pub fn counts(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Volunteer edge as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VolunteerRecord {
    pub user_id: Uuid,
    pub event_id: Uuid,
    /// One of the `VolunteerStatus` strings
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VolunteerRecord {
    pub fn volunteer_status(&self) -> Option<VolunteerStatus> {
        VolunteerStatus::parse(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            VolunteerStatus::Pending,
            VolunteerStatus::Approved,
            VolunteerStatus::Rejected,
        ] {
            assert_eq!(VolunteerStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_only_approved_counts() {
        assert!(VolunteerStatus::Approved.counts());
        assert!(!VolunteerStatus::Pending.counts());
        assert!(!VolunteerStatus::Rejected.counts());
    }
}
