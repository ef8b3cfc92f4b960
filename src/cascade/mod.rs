//! Account Deletion Cascade
//!
//! There are no foreign-key constraints; every dependent row and every
//! denormalized counter a departing account contributed to is handled
//! here, in one transaction. A failure anywhere rolls the whole
//! cascade back.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::auth::accounts::AccountKind;
use crate::error::ApiError;

/// Rows removed by a cascade, for logging and the response body
#[derive(Debug, Default)]
pub struct CascadeReport {
    pub follows: u64,
    pub attendances: u64,
    pub volunteers: u64,
    pub collab_requests: u64,
    pub events: u64,
    pub chats: u64,
    pub messages: u64,
    pub notifications: u64,
    pub reviews: u64,
}

/// Delete an account and everything that depends on it
pub async fn delete_account(
    pool: &PgPool,
    account_id: Uuid,
    kind: AccountKind,
) -> Result<CascadeReport, ApiError> {
    let mut tx = pool.begin().await?;

    let report = match kind {
        AccountKind::User => delete_user(&mut tx, account_id).await?,
        AccountKind::Org => delete_org(&mut tx, account_id).await?,
        AccountKind::Admin => {
            return Err(ApiError::forbidden("Admin accounts cannot be deleted here"))
        }
    };

    sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        account_id = %account_id,
        kind = kind.as_str(),
        follows = report.follows,
        attendances = report.attendances,
        volunteers = report.volunteers,
        collab_requests = report.collab_requests,
        events = report.events,
        chats = report.chats,
        notifications = report.notifications,
        reviews = report.reviews,
        "account cascade complete"
    );

    Ok(report)
}

async fn delete_user(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<CascadeReport, ApiError> {
    let mut report = CascadeReport::default();

    // Counter contributions come off before the edges go.
    sqlx::query(
        r#"
        UPDATE accounts
        SET followers_count = GREATEST(followers_count - 1, 0), updated_at = NOW()
        FROM follows
        WHERE follows.org_id = accounts.id AND follows.user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE events
        SET total_attending = GREATEST(total_attending - 1, 0), updated_at = NOW()
        FROM attendances
        WHERE attendances.event_id = events.id AND attendances.user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE events
        SET total_volunteering = GREATEST(total_volunteering - 1, 0), updated_at = NOW()
        FROM volunteers
        WHERE volunteers.event_id = events.id
          AND volunteers.user_id = $1
          AND volunteers.status = 'approved'
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    report.follows = sqlx::query("DELETE FROM follows WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    report.attendances = sqlx::query("DELETE FROM attendances WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    report.volunteers = sqlx::query("DELETE FROM volunteers WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    report.reviews = sqlx::query("DELETE FROM reviews WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    let (chats, messages) = delete_chats_of(tx, user_id, AccountKind::User).await?;
    report.chats = chats;
    report.messages = messages;

    report.notifications = sqlx::query(
        "DELETE FROM notifications WHERE recipient_id = $1 AND recipient_kind = 'user'",
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?
    .rows_affected();

    Ok(report)
}

async fn delete_org(
    tx: &mut Transaction<'_, Postgres>,
    org_id: Uuid,
) -> Result<CascadeReport, ApiError> {
    let mut report = CascadeReport::default();

    sqlx::query(
        r#"
        UPDATE accounts
        SET following_count = GREATEST(following_count - 1, 0), updated_at = NOW()
        FROM follows
        WHERE follows.user_id = accounts.id AND follows.org_id = $1
        "#,
    )
    .bind(org_id)
    .execute(&mut **tx)
    .await?;

    report.follows = sqlx::query("DELETE FROM follows WHERE org_id = $1")
        .bind(org_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    // Conducted events take their edges and requests with them.
    let event_ids: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM events WHERE conducting_org_id = $1")
            .bind(org_id)
            .fetch_all(&mut **tx)
            .await?;

    if !event_ids.is_empty() {
        report.attendances = sqlx::query("DELETE FROM attendances WHERE event_id = ANY($1)")
            .bind(&event_ids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        report.volunteers = sqlx::query("DELETE FROM volunteers WHERE event_id = ANY($1)")
            .bind(&event_ids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        report.collab_requests =
            sqlx::query("DELETE FROM collab_requests WHERE event_id = ANY($1)")
                .bind(&event_ids)
                .execute(&mut **tx)
                .await?
                .rows_affected();

        report.reviews = sqlx::query("DELETE FROM reviews WHERE event_id = ANY($1)")
            .bind(&event_ids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        report.events = sqlx::query("DELETE FROM events WHERE id = ANY($1)")
            .bind(&event_ids)
            .execute(&mut **tx)
            .await?
            .rows_affected();
    }

    // Where the org is merely a collaborator, the event survives.
    sqlx::query(
        "UPDATE events SET collaborating_org_id = NULL, updated_at = NOW() WHERE collaborating_org_id = $1",
    )
    .bind(org_id)
    .execute(&mut **tx)
    .await?;

    report.collab_requests += sqlx::query("DELETE FROM collab_requests WHERE requester_org_id = $1")
        .bind(org_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    let (chats, messages) = delete_chats_of(tx, org_id, AccountKind::Org).await?;
    report.chats = chats;
    report.messages = messages;

    report.notifications = sqlx::query(
        "DELETE FROM notifications WHERE recipient_id = $1 AND recipient_kind = 'org'",
    )
    .bind(org_id)
    .execute(&mut **tx)
    .await?
    .rows_affected();

    Ok(report)
}

/// Delete every chat the account participates in, messages first
async fn delete_chats_of(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    kind: AccountKind,
) -> Result<(u64, u64), ApiError> {
    let chat_ids: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM chats
        WHERE (a_id = $1 AND a_kind = $2) OR (b_id = $1 AND b_kind = $2)
        "#,
    )
    .bind(id)
    .bind(kind.as_str())
    .fetch_all(&mut **tx)
    .await?;

    if chat_ids.is_empty() {
        return Ok((0, 0));
    }

    let messages = sqlx::query("DELETE FROM messages WHERE chat_id = ANY($1)")
        .bind(&chat_ids)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    let chats = sqlx::query("DELETE FROM chats WHERE id = ANY($1)")
        .bind(&chat_ids)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    Ok((chats, messages))
}
