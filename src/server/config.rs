/**
 * Server Configuration
 *
 * Configuration comes from environment variables. Unlike ancillary
 * services, the database is not optional: every operation in this API
 * persists something, so a missing or unreachable `DATABASE_URL` is a
 * startup failure rather than a degraded mode.
 */

use sqlx::PgPool;

/// Read the listen port from `SERVER_PORT`, defaulting to 3000
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000)
}

/// Connect to PostgreSQL and run pending migrations
///
/// # Errors
/// Fails if `DATABASE_URL` is unset, the connection cannot be
/// established, or a migration fails to apply.
pub async fn connect_database() -> Result<PgPool, Box<dyn std::error::Error>> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| "DATABASE_URL must be set")?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!().run(&pool).await?;

    tracing::info!("Database ready");
    Ok(pool)
}
