/**
 * Donation Handlers
 *
 * - `POST /api/orgs/{org_id}/donations` - Record a completed donation (users only)
 * - `GET  /api/orgs/me/donations` - Donations received by my org
 *
 * Gateway order creation and signature verification happen upstream;
 * this API only records the settled outcome.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::accounts::{self, AccountKind};
use crate::donations::{db, Donation};
use crate::error::ApiError;
use crate::events;
use crate::middleware::AuthActor;
use crate::notify::{NotificationDraft, NotificationKind};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordDonationBody {
    pub amount_cents: i64,
    pub transaction_id: String,
    pub event_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DonationListResponse {
    pub items: Vec<Donation>,
}

/// Record a completed donation to an organization
pub async fn record_donation(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(org_id): Path<Uuid>,
    Json(body): Json<RecordDonationBody>,
) -> Result<(StatusCode, Json<Donation>), ApiError> {
    if !actor.is_user() {
        return Err(ApiError::forbidden("Only users can donate"));
    }
    if body.amount_cents <= 0 {
        return Err(ApiError::validation("Donation amount must be positive"));
    }
    let transaction_id = body.transaction_id.trim();
    if transaction_id.is_empty() {
        return Err(ApiError::validation("transaction_id is required"));
    }

    let org = accounts::get_org_by_id(&state.db_pool, org_id).await?;

    // An event reference, if given, must belong to the beneficiary.
    if let Some(event_id) = body.event_id {
        let event = events::db::require_event(&state.db_pool, event_id).await?;
        if !event.is_managed_by(org_id) {
            return Err(ApiError::validation(
                "Event does not belong to this organization",
            ));
        }
    }

    let donation = db::record_donation(
        &state.db_pool,
        actor.id,
        org_id,
        body.event_id,
        body.amount_cents,
        transaction_id,
    )
    .await?;

    tracing::info!(
        donor = %actor.username,
        org_id = %org_id,
        amount_cents = donation.amount_cents,
        "donation recorded"
    );

    state.notifier.notify(
        NotificationDraft::new(
            org.id,
            AccountKind::Org,
            NotificationKind::DonationReceived,
            "Donation received",
        )
        .body(format!(
            "{} donated to your organization.",
            actor.username
        ))
        .actor(actor.id, AccountKind::User)
        .data(serde_json::json!({ "amountCents": donation.amount_cents })),
    );

    Ok((StatusCode::CREATED, Json(donation)))
}

/// Donations received by the authenticated organization
pub async fn list_my_donations(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> Result<Json<DonationListResponse>, ApiError> {
    if !actor.is_org() {
        return Err(ApiError::forbidden("Only organizations can view donations"));
    }

    let items = db::list_for_org(&state.db_pool, actor.id).await?;
    Ok(Json(DonationListResponse { items }))
}
