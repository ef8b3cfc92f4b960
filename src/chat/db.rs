/**
 * Chat Database Operations
 *
 * A conversation is found regardless of which participant opened it:
 * the lookup matches both slot orderings. Message appends and the
 * `last_activity_at` bump share one transaction.
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::accounts::AccountKind;
use crate::chat::model::{Chat, Message};
use crate::error::ApiError;

/// Find the conversation between two accounts, if any
pub async fn find_chat(
    pool: &PgPool,
    a_id: Uuid,
    a_kind: AccountKind,
    b_id: Uuid,
    b_kind: AccountKind,
) -> Result<Option<Chat>, sqlx::Error> {
    sqlx::query_as::<_, Chat>(
        r#"
        SELECT * FROM chats
        WHERE (a_id = $1 AND a_kind = $2 AND b_id = $3 AND b_kind = $4)
           OR (a_id = $3 AND a_kind = $4 AND b_id = $1 AND b_kind = $2)
        "#,
    )
    .bind(a_id)
    .bind(a_kind.as_str())
    .bind(b_id)
    .bind(b_kind.as_str())
    .fetch_optional(pool)
    .await
}

/// Find or create the conversation between two accounts
pub async fn open_chat(
    pool: &PgPool,
    a_id: Uuid,
    a_kind: AccountKind,
    b_id: Uuid,
    b_kind: AccountKind,
) -> Result<Chat, ApiError> {
    if let Some(chat) = find_chat(pool, a_id, a_kind, b_id, b_kind).await? {
        return Ok(chat);
    }

    let chat = sqlx::query_as::<_, Chat>(
        r#"
        INSERT INTO chats (id, a_kind, a_id, b_kind, b_id, last_activity_at, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(a_kind.as_str())
    .bind(a_id)
    .bind(b_kind.as_str())
    .bind(b_id)
    .fetch_one(pool)
    .await?;

    Ok(chat)
}

/// Fetch a chat by id
pub async fn require_chat(pool: &PgPool, chat_id: Uuid) -> Result<Chat, ApiError> {
    let chat = sqlx::query_as::<_, Chat>("SELECT * FROM chats WHERE id = $1")
        .bind(chat_id)
        .fetch_optional(pool)
        .await?;

    chat.ok_or_else(|| ApiError::not_found("Chat not found"))
}

/// Append a message and advance `last_activity_at`, atomically
pub async fn add_message(
    pool: &PgPool,
    chat_id: Uuid,
    sender_id: Uuid,
    sender_kind: AccountKind,
    body: &str,
) -> Result<Message, ApiError> {
    let mut tx = pool.begin().await?;

    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (id, chat_id, sender_kind, sender_id, body, sent_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(chat_id)
    .bind(sender_kind.as_str())
    .bind(sender_id)
    .bind(body)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE chats SET last_activity_at = NOW() WHERE id = $1")
        .bind(chat_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(message)
}

/// List messages, newest first, with an exclusive `before` cursor
pub async fn list_messages(
    pool: &PgPool,
    chat_id: Uuid,
    before: Option<DateTime<Utc>>,
    limit: i64,
) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT * FROM messages
        WHERE chat_id = $1 AND ($2::timestamptz IS NULL OR sent_at < $2)
        ORDER BY sent_at DESC
        LIMIT $3
        "#,
    )
    .bind(chat_id)
    .bind(before)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// All chats an account participates in, most recently active first
pub async fn list_chats_for(
    pool: &PgPool,
    id: Uuid,
    kind: AccountKind,
) -> Result<Vec<Chat>, sqlx::Error> {
    sqlx::query_as::<_, Chat>(
        r#"
        SELECT * FROM chats
        WHERE (a_id = $1 AND a_kind = $2) OR (b_id = $1 AND b_kind = $2)
        ORDER BY last_activity_at DESC
        "#,
    )
    .bind(id)
    .bind(kind.as_str())
    .fetch_all(pool)
    .await
}
