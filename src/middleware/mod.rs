//! HTTP Middleware
//!
//! Currently just bearer-token authentication.

pub mod auth;

pub use auth::{Actor, AuthActor};
