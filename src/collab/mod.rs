//! Collaboration Request Lifecycle
//!
//! An organization may request a collaboration slot on another org's
//! event; the conducting org accepts or rejects, the requester may
//! cancel. Invariants:
//!
//! - at most one *pending* request per (event, requester) pair,
//!   enforced by a partial unique index
//! - at most one collaborator per event, enforced by a conditional
//!   "set only while still null" update
//! - accepted/rejected/cancelled are terminal states
//!
//! Accept spans three writes (event, the accepted request, every other
//! pending sibling) inside a single transaction.
//!
//! - **`model`** - Request record and the status state machine
//! - **`db`** - Queries and the transactional accept
//! - **`handlers`** - HTTP endpoints

pub mod db;
pub mod handlers;
pub mod model;

pub use model::{CollabRequest, RequestStatus};
