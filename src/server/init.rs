/**
 * Server Initialization
 *
 * Builds the application from its parts:
 * 1. Connect to the database and run migrations
 * 2. Spawn the notification dispatch worker
 * 3. Assemble the shared state
 * 4. Create and configure the router
 */

use axum::Router;

use crate::notify::Notifier;
use crate::routes::router::create_router;
use crate::server::config::connect_database;
use crate::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app() -> Result<Router, Box<dyn std::error::Error>> {
    tracing::info!("Initializing server");

    let db_pool = connect_database().await?;

    let notifier = Notifier::spawn(db_pool.clone());
    tracing::info!("Notification dispatch worker started");

    let app_state = AppState { db_pool, notifier };

    Ok(create_router(app_state))
}
