//! Donations
//!
//! Records completed donations against a beneficiary organization.
//! The external transaction id is unique; replays map to Conflict.

pub mod db;
pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Donation record as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub event_id: Option<Uuid>,
    pub org_id: Uuid,
    pub amount_cents: i64,
    /// External payment-gateway reference, unique
    pub transaction_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
