//! Server Module
//!
//! Initialization and configuration for the Axum HTTP server.
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Configuration loading (database, port)
//! - **`init`** - Server initialization and app creation

pub mod config;
pub mod init;
pub mod state;

pub use init::create_app;
pub use state::AppState;
