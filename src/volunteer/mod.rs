//! Volunteer Edges
//!
//! A user applies to volunteer for an event; the conducting or
//! collaborating organization approves or rejects. Only approved rows
//! count toward `total_volunteering`, and every status change that
//! crosses the approved boundary moves the counter in the same
//! transaction.

pub mod db;
pub mod handlers;
pub mod model;

pub use model::{VolunteerRecord, VolunteerStatus};
