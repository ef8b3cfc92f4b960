//! API Error Module
//!
//! This module defines the domain error taxonomy used by every handler
//! and database operation, and its conversion into HTTP responses.
//!
//! # Module Structure
//!
//! - **`types`** - Error type definitions and sqlx error mapping
//! - **`conversion`** - `IntoResponse` implementation for Axum
//!
//! # Taxonomy
//!
//! - `Validation` - Malformed/missing input, no state change (400)
//! - `Unauthorized` - Missing/invalid credentials (401)
//! - `Forbidden` - Wrong actor type or not the owner (403)
//! - `NotFound` - Entity absent (404)
//! - `Conflict` - Duplicate key, lost race (409)
//! - `InvalidState` - Event past, slot filled, request not pending (400)
//! - `Database` - Storage/transaction failure, fully rolled back (500)

pub mod conversion;
pub mod types;

pub use types::ApiError;
