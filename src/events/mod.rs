//! Events
//!
//! Events are owned by their conducting organization and may hold at
//! most one collaborating organization (managed by the `collab`
//! module). The `total_attending` / `total_volunteering` counters are
//! denormalized and maintained by the edge modules.

pub mod db;
pub mod handlers;
pub mod model;

pub use model::Event;
