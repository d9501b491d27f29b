//! Conversation and message persistence.
//!
//! The relay itself never touches these tables; they belong to the chat
//! client, which writes the user turn, calls the relay, then writes the reply.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Title given to conversations started without any text.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Maximum number of characters kept from the first message for a title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("unknown message role: {other}")),
        }
    }
}

/// Row returned by conversation queries.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ConversationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row returned by message queries.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl MessageRow {
    /// Parsed role; `None` only for rows written outside this crate.
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Derives a conversation title from the first message.
///
/// Keeps the first [`TITLE_MAX_CHARS`] characters of the trimmed text and
/// appends `...` when anything was cut.
pub fn title_from_message(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// CRUD contract for chat persistence.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Create a new conversation owned by `user_id`.
    async fn create_conversation(
        &self,
        user_id: &Uuid,
        title: &str,
    ) -> Result<ConversationRow, sqlx::Error>;

    /// Conversations of a user, most recently updated first.
    async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<ConversationRow>, sqlx::Error>;

    /// A single conversation, scoped to its owner.
    async fn get_conversation(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
    ) -> Result<Option<ConversationRow>, sqlx::Error>;

    /// Append a message and bump the conversation's `updated_at`.
    async fn create_message(
        &self,
        conversation_id: &Uuid,
        role: Role,
        content: &str,
    ) -> Result<MessageRow, sqlx::Error>;

    /// Messages of a conversation, oldest first.
    async fn list_messages(&self, conversation_id: &Uuid) -> Result<Vec<MessageRow>, sqlx::Error>;
}

/// PostgreSQL-backed [`ChatStore`].
#[derive(Debug, Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn create_conversation(
        &self,
        user_id: &Uuid,
        title: &str,
    ) -> Result<ConversationRow, sqlx::Error> {
        sqlx::query_as::<_, ConversationRow>(
            r#"
            INSERT INTO conversations (id, user_id, title)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<ConversationRow>, sqlx::Error> {
        sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM conversations
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_conversation(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
    ) -> Result<Option<ConversationRow>, sqlx::Error> {
        sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM conversations
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_message(
        &self,
        conversation_id: &Uuid,
        role: Role,
        content: &str,
    ) -> Result<MessageRow, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, conversation_id, role, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, conversation_id, role, content, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(conversation_id)
        .bind(role.as_str())
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        // Touch conversation updated_at
        sqlx::query("UPDATE conversations SET updated_at = now() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn list_messages(&self, conversation_id: &Uuid) -> Result<Vec<MessageRow>, sqlx::Error> {
        sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, conversation_id, role, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
    }
}
