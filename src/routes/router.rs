/**
 * Router Configuration
 *
 * Merges the public and protected route groups, layering the JWT
 * middleware onto the protected group only, and adds request tracing
 * and the 404 fallback.
 */

use axum::http::StatusCode;
use axum::{middleware, Json, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::auth::auth_middleware;
use crate::routes::api_routes::{configure_protected_routes, configure_public_routes};
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let protected = configure_protected_routes().layer(middleware::from_fn_with_state(
        app_state.clone(),
        auth_middleware,
    ));

    Router::new()
        .merge(configure_public_routes())
        .merge(protected)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found", "status": 404 })),
    )
}
