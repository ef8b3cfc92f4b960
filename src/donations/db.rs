/**
 * Donation Database Operations
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::donations::Donation;
use crate::error::ApiError;

/// Insert a completed donation
///
/// # Errors
/// `Conflict` if the external transaction id was already recorded.
pub async fn record_donation(
    pool: &PgPool,
    donor_id: Uuid,
    org_id: Uuid,
    event_id: Option<Uuid>,
    amount_cents: i64,
    transaction_id: &str,
) -> Result<Donation, ApiError> {
    let result = sqlx::query_as::<_, Donation>(
        r#"
        INSERT INTO donations (id, donor_id, event_id, org_id, amount_cents, transaction_id, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'completed', NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(donor_id)
    .bind(event_id)
    .bind(org_id)
    .bind(amount_cents)
    .bind(transaction_id)
    .fetch_one(pool)
    .await;

    match result {
        Ok(donation) => Ok(donation),
        Err(err) => match ApiError::from(err) {
            ApiError::Conflict(_) => Err(ApiError::conflict(
                "This transaction has already been recorded",
            )),
            other => Err(other),
        },
    }
}

/// Donations received by an org, newest first
pub async fn list_for_org(pool: &PgPool, org_id: Uuid) -> Result<Vec<Donation>, sqlx::Error> {
    sqlx::query_as::<_, Donation>(
        "SELECT * FROM donations WHERE org_id = $1 ORDER BY created_at DESC",
    )
    .bind(org_id)
    .fetch_all(pool)
    .await
}
