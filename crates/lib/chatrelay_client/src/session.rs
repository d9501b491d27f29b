//! Chat session — persists a turn around one relay call.
//!
//! Order per turn: write the user message, call the relay, write the
//! assistant message, reload the thread. The relay only ever sees the latest
//! message; history lives in the store.

use chatrelay_core::conversations::{
    ChatStore, ConversationRow, DEFAULT_TITLE, MessageRow, Role, title_from_message,
};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::relay_client::{ClientError, RelayClient};

/// Errors returned by [`ChatSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Conversation not found: {0}")]
    NotFound(Uuid),

    #[error("Storage error: {0}")]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Relay(#[from] ClientError),
}

/// A conversation and its full message list after a turn.
#[derive(Debug, Clone)]
pub struct Turn {
    pub conversation: ConversationRow,
    pub messages: Vec<MessageRow>,
}

impl Turn {
    /// The assistant reply written by this turn.
    pub fn reply(&self) -> Option<&MessageRow> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role() == Some(Role::Assistant))
    }
}

/// Chat operations for a single user.
pub struct ChatSession<S> {
    store: S,
    relay: RelayClient,
    user_id: Uuid,
}

impl<S: ChatStore> ChatSession<S> {
    pub fn new(store: S, relay: RelayClient, user_id: Uuid) -> Self {
        Self {
            store,
            relay,
            user_id,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Explicit "new chat".
    pub async fn new_conversation(
        &self,
        title: Option<&str>,
    ) -> Result<ConversationRow, SessionError> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);
        Ok(self.store.create_conversation(&self.user_id, title).await?)
    }

    /// Conversations of this user, most recently updated first.
    pub async fn conversations(&self) -> Result<Vec<ConversationRow>, SessionError> {
        Ok(self.store.list_conversations(&self.user_id).await?)
    }

    /// Messages of one of this user's conversations, oldest first.
    pub async fn history(&self, conversation_id: Uuid) -> Result<Vec<MessageRow>, SessionError> {
        self.owned_conversation(conversation_id).await?;
        Ok(self.store.list_messages(&conversation_id).await?)
    }

    /// Runs one chat turn.
    ///
    /// Without `conversation_id` a new conversation is created, titled from
    /// the message. A relay failure leaves the user message stored and is
    /// returned as is; nothing is retried.
    pub async fn send(
        &self,
        conversation_id: Option<Uuid>,
        text: &str,
    ) -> Result<Turn, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let conversation = match conversation_id {
            Some(id) => self.owned_conversation(id).await?,
            None => {
                let row = self
                    .store
                    .create_conversation(&self.user_id, &title_from_message(text))
                    .await?;
                info!(conversation_id = %row.id, "started conversation");
                row
            }
        };

        self.store
            .create_message(&conversation.id, Role::User, text)
            .await?;

        let reply = self.relay.send(text).await.inspect_err(|e| {
            error!(conversation_id = %conversation.id, error = %e, "relay call failed");
        })?;

        self.store
            .create_message(&conversation.id, Role::Assistant, &reply)
            .await?;

        let messages = self.store.list_messages(&conversation.id).await?;
        let conversation = self
            .store
            .get_conversation(&self.user_id, &conversation.id)
            .await?
            .unwrap_or(conversation);

        Ok(Turn {
            conversation,
            messages,
        })
    }

    async fn owned_conversation(&self, id: Uuid) -> Result<ConversationRow, SessionError> {
        self.store
            .get_conversation(&self.user_id, &id)
            .await?
            .ok_or(SessionError::NotFound(id))
    }
}
