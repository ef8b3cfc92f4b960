/**
 * Application State Management
 *
 * `AppState` is the central state container handed to every handler:
 * the database pool and the notification queue handle. Both are cheap
 * to clone (`PgPool` is an `Arc` internally, `Notifier` wraps a
 * channel sender).
 *
 * The `FromRef` implementations let handlers extract just the part
 * they need, following Axum's recommended state pattern.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::notify::Notifier;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Handle to the notification dispatch queue
    pub notifier: Notifier,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.db_pool.clone()
    }
}

impl FromRef<AppState> for Notifier {
    fn from_ref(state: &AppState) -> Self {
        state.notifier.clone()
    }
}
