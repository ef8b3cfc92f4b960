/**
 * Notification Dispatch Queue
 *
 * Decouples notification creation from request handling. Handlers call
 * `Notifier::notify` after their primary transaction commits; the
 * draft travels over an unbounded channel to a worker task that owns
 * its own pool handle and performs the insert. Insert failures are
 * logged — they never fail or roll back the triggering request.
 */

use sqlx::PgPool;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::accounts::AccountKind;
use crate::notify::model::NotificationKind;

/// A notification waiting to be persisted
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub recipient_id: Uuid,
    pub recipient_kind: AccountKind,
    pub actor_id: Option<Uuid>,
    pub actor_kind: Option<AccountKind>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub data: serde_json::Value,
}

impl NotificationDraft {
    /// Start a draft addressed to `recipient_id`
    pub fn new(
        recipient_id: Uuid,
        recipient_kind: AccountKind,
        kind: NotificationKind,
        title: impl Into<String>,
    ) -> Self {
        Self {
            recipient_id,
            recipient_kind,
            actor_id: None,
            actor_kind: None,
            kind,
            title: title.into(),
            body: String::new(),
            entity_type: None,
            entity_id: None,
            data: serde_json::json!({}),
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn actor(mut self, actor_id: Uuid, actor_kind: AccountKind) -> Self {
        self.actor_id = Some(actor_id);
        self.actor_kind = Some(actor_kind);
        self
    }

    pub fn entity(mut self, entity_type: impl Into<String>, entity_id: Uuid) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// Handle for queueing notifications
///
/// Cheap to clone; lives in `AppState`.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<NotificationDraft>,
}

impl Notifier {
    /// Spawn the dispatch worker and return its queue handle
    pub fn spawn(pool: PgPool) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<NotificationDraft>();

        tokio::spawn(async move {
            while let Some(draft) = rx.recv().await {
                if let Err(e) = insert_notification(&pool, &draft).await {
                    // Best-effort: log and keep draining the queue
                    tracing::warn!(
                        kind = draft.kind.as_str(),
                        recipient = %draft.recipient_id,
                        "failed to persist notification: {:?}",
                        e
                    );
                }
            }
            tracing::info!("notification dispatch worker stopped");
        });

        Self { tx }
    }

    /// Queue a notification, best-effort
    ///
    /// Never blocks and never errors into the caller. A send failure
    /// (worker gone) is logged only.
    pub fn notify(&self, draft: NotificationDraft) {
        if self.tx.send(draft).is_err() {
            tracing::warn!("notification worker is gone; dropping notification");
        }
    }
}

/// Persist a single notification draft
async fn insert_notification(pool: &PgPool, draft: &NotificationDraft) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notifications
            (id, recipient_id, recipient_kind, actor_id, actor_kind,
             kind, title, body, entity_type, entity_id, data, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(draft.recipient_id)
    .bind(draft.recipient_kind.as_str())
    .bind(draft.actor_id)
    .bind(draft.actor_kind.map(|k| k.as_str()))
    .bind(draft.kind.as_str())
    .bind(&draft.title)
    .bind(&draft.body)
    .bind(&draft.entity_type)
    .bind(draft.entity_id)
    .bind(&draft.data)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_builder() {
        let recipient = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let event = Uuid::new_v4();

        let draft = NotificationDraft::new(
            recipient,
            AccountKind::Org,
            NotificationKind::CollabRequest,
            "New collaboration request",
        )
        .body("helping_hands requested collaboration for your event \"Beach Cleanup\".")
        .actor(actor, AccountKind::Org)
        .entity("Event", event)
        .data(serde_json::json!({ "requestId": "abc" }));

        assert_eq!(draft.recipient_id, recipient);
        assert_eq!(draft.actor_id, Some(actor));
        assert_eq!(draft.entity_type.as_deref(), Some("Event"));
        assert_eq!(draft.entity_id, Some(event));
        assert_eq!(draft.kind, NotificationKind::CollabRequest);
        assert!(draft.body.contains("Beach Cleanup"));
    }
}
