/**
 * Event Model
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event record as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Combined date and time of the event, UTC
    pub starts_at: DateTime<Utc>,
    pub venue: String,
    pub is_virtual: bool,
    /// Owning organization, required
    pub conducting_org_id: Uuid,
    /// At most one collaborator; null until a request is accepted
    pub collaborating_org_id: Option<Uuid>,
    pub total_attending: i32,
    pub total_volunteering: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event's date/time has already passed
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now
    }

    /// Whether `org_id` conducts or collaborates on this event
    pub fn is_managed_by(&self, org_id: Uuid) -> bool {
        self.conducting_org_id == org_id || self.collaborating_org_id == Some(org_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event_at(starts_at: DateTime<Utc>) -> Event {
        Event {
            id: Uuid::new_v4(),
            name: "Beach Cleanup".to_string(),
            description: String::new(),
            starts_at,
            venue: "Shoreline".to_string(),
            is_virtual: false,
            conducting_org_id: Uuid::new_v4(),
            collaborating_org_id: None,
            total_attending: 0,
            total_volunteering: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_future_event_has_not_started() {
        let now = Utc::now();
        let event = event_at(now + Duration::hours(2));
        assert!(!event.has_started(now));
    }

    #[test]
    fn test_past_event_has_started() {
        let now = Utc::now();
        let event = event_at(now - Duration::minutes(1));
        assert!(event.has_started(now));
    }

    #[test]
    fn test_is_managed_by_conductor_and_collaborator() {
        let now = Utc::now();
        let mut event = event_at(now);
        let collaborator = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        assert!(event.is_managed_by(event.conducting_org_id));
        assert!(!event.is_managed_by(collaborator));

        event.collaborating_org_id = Some(collaborator);
        assert!(event.is_managed_by(collaborator));
        assert!(!event.is_managed_by(stranger));
    }
}
