//! Route Configuration
//!
//! - **`router`** - Top-level router assembly (public + protected, trace layer)
//! - **`api_routes`** - The API surface, grouped by module

pub mod api_routes;
pub mod router;
