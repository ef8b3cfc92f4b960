//! Follow Edges
//!
//! A user follows an organization. The edge insert/delete and the two
//! denormalized counters (`followers_count` on the org,
//! `following_count` on the user) move inside one transaction, with
//! decrements clamped at zero.

pub mod db;
pub mod handlers;
