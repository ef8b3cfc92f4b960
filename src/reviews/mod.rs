//! Post-Event Reviews
//!
//! Users who took part in an event (approved volunteer, attendee, or
//! donor) may leave one rated review after the event has ended. The
//! participation flags are snapshotted onto the review row so reads
//! can group by role without re-deriving eligibility.

pub mod db;
pub mod handlers;
pub mod model;

pub use model::{Review, RoleFlags};
