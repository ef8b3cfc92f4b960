/**
 * Chat Handlers
 *
 * - `POST /api/chats` - Open (or return) a conversation with another account
 * - `GET  /api/chats` - My conversations, most recently active first
 * - `POST /api/chats/{id}/messages` - Send a message
 * - `GET  /api/chats/{id}/messages` - Page through messages
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::accounts::{self, AccountKind};
use crate::chat::db;
use crate::chat::model::{clamp_page_size, Chat, Message};
use crate::error::ApiError;
use crate::middleware::AuthActor;
use crate::notify::{NotificationDraft, NotificationKind};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OpenChatBody {
    pub other_id: Uuid,
    /// "user" | "org"
    pub other_kind: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub body: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListMessagesQuery {
    pub before: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ChatListResponse {
    pub items: Vec<Chat>,
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub items: Vec<Message>,
}

/// Open a conversation with another account, creating it if needed
pub async fn open_chat(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(body): Json<OpenChatBody>,
) -> Result<(StatusCode, Json<Chat>), ApiError> {
    let other_kind = AccountKind::parse(&body.other_kind)
        .filter(|k| *k != AccountKind::Admin)
        .ok_or_else(|| ApiError::validation("other_kind must be 'user' or 'org'"))?;

    if body.other_id == actor.id {
        return Err(ApiError::validation("Cannot open a chat with yourself"));
    }

    let other = accounts::get_account_by_id(&state.db_pool, body.other_id)
        .await?
        .filter(|a| a.account_kind() == Some(other_kind))
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    let chat = db::open_chat(&state.db_pool, actor.id, actor.kind, other.id, other_kind).await?;

    Ok((StatusCode::CREATED, Json(chat)))
}

/// List my conversations
pub async fn list_my_chats(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> Result<Json<ChatListResponse>, ApiError> {
    let items = db::list_chats_for(&state.db_pool, actor.id, actor.kind).await?;
    Ok(Json(ChatListResponse { items }))
}

/// Send a message in a conversation I participate in
pub async fn send_message(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(chat_id): Path<Uuid>,
    Json(body): Json<SendMessageBody>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let text = body.body.trim();
    if text.is_empty() {
        return Err(ApiError::validation("Message body cannot be empty"));
    }

    let chat = db::require_chat(&state.db_pool, chat_id).await?;
    if !chat.has_participant(actor.id, actor.kind) {
        return Err(ApiError::forbidden("Sender is not part of this chat"));
    }

    let message = db::add_message(&state.db_pool, chat_id, actor.id, actor.kind, text).await?;

    // The other participant gets an inbox entry.
    let (other_id, other_kind) = if chat.a_id == actor.id && chat.a_kind == actor.kind.as_str() {
        (chat.b_id, chat.b_kind.as_str())
    } else {
        (chat.a_id, chat.a_kind.as_str())
    };
    if let Some(other_kind) = AccountKind::parse(other_kind) {
        state.notifier.notify(
            NotificationDraft::new(
                other_id,
                other_kind,
                NotificationKind::ChatMessage,
                "New message",
            )
            .body(format!("{} sent you a message.", actor.username))
            .actor(actor.id, actor.kind)
            .entity("Chat", chat_id),
        );
    }

    Ok((StatusCode::CREATED, Json(message)))
}

/// Page through a conversation's messages, newest first
pub async fn list_messages(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(chat_id): Path<Uuid>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<MessageListResponse>, ApiError> {
    let chat = db::require_chat(&state.db_pool, chat_id).await?;
    if !chat.has_participant(actor.id, actor.kind) {
        return Err(ApiError::forbidden("Not a participant of this chat"));
    }

    let items = db::list_messages(
        &state.db_pool,
        chat_id,
        query.before,
        clamp_page_size(query.limit),
    )
    .await?;

    Ok(Json(MessageListResponse { items }))
}
