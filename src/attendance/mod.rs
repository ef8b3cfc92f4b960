//! Attendance Edges
//!
//! A user attends an event. Edge existence implies inclusion in the
//! event's `total_attending` counter; edge mutation and counter change
//! share one transaction.

pub mod db;
pub mod handlers;
