//! Two-Party Chat
//!
//! A chat holds exactly two participants (each a user or an org).
//! Messages append inside a transaction that also advances the chat's
//! `last_activity_at`, which drives inbox ordering.

pub mod db;
pub mod handlers;
pub mod model;

pub use model::{Chat, Message};
