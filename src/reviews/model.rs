/**
 * Review Model
 *
 * Ratings run from -2 (very poor) to 2 (excellent). The role flags
 * record how the reviewer was connected to the event at review time;
 * more than one can be set.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_RATING: i32 = -2;
pub const MAX_RATING: i32 = 2;

/// Whether a rating falls inside the accepted scale
pub fn rating_in_bounds(rating: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Review record as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    /// -2..=2
    pub rating: i32,
    pub comment: String,
    pub is_volunteer: bool,
    pub is_participant: bool,
    pub is_donor: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How a user is connected to an event, derived from live edges
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RoleFlags {
    pub is_volunteer: bool,
    pub is_participant: bool,
    pub is_donor: bool,
}

impl RoleFlags {
    /// At least one connection; the bar for posting a review
    pub fn any(&self) -> bool {
        self.is_volunteer || self.is_participant || self.is_donor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        for rating in MIN_RATING..=MAX_RATING {
            assert!(rating_in_bounds(rating));
        }
        assert!(!rating_in_bounds(-3));
        assert!(!rating_in_bounds(3));
    }

    #[test]
    fn test_role_flags_any() {
        assert!(!RoleFlags::default().any());
        assert!(RoleFlags { is_donor: true, ..Default::default() }.any());
    }
}
