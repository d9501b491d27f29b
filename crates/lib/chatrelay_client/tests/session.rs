//! Chat session tests — in-memory store, real relay router, stubbed Gemini.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chatrelay_api::{AppState, config::ApiConfig, routes};
use chatrelay_client::{ChatSession, ClientError, RelayClient, SessionError};
use chatrelay_core::conversations::{ChatStore, ConversationRow, MessageRow, Role};
use chatrelay_core::relay::APOLOGY_REPLY;
use chatrelay_core::secrets::StaticSecret;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

/// Store with a logical clock so orderings are deterministic.
#[derive(Default)]
struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    tick: i64,
    conversations: Vec<ConversationRow>,
    messages: Vec<MessageRow>,
}

impl Inner {
    fn now(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(self.tick)
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn create_conversation(
        &self,
        user_id: &Uuid,
        title: &str,
    ) -> Result<ConversationRow, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let now = inner.now();
        let row = ConversationRow {
            id: Uuid::now_v7(),
            user_id: *user_id,
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.conversations.push(row.clone());
        Ok(row)
    }

    async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<ConversationRow>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<_> = inner
            .conversations
            .iter()
            .filter(|c| c.user_id == *user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn get_conversation(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
    ) -> Result<Option<ConversationRow>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .conversations
            .iter()
            .find(|c| c.id == *conversation_id && c.user_id == *user_id)
            .cloned())
    }

    async fn create_message(
        &self,
        conversation_id: &Uuid,
        role: Role,
        content: &str,
    ) -> Result<MessageRow, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let now = inner.now();
        let conversation = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == *conversation_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        conversation.updated_at = now;
        let row = MessageRow {
            id: Uuid::now_v7(),
            conversation_id: *conversation_id,
            role: role.as_str().to_string(),
            content: content.to_string(),
            created_at: now,
        };
        inner.messages.push(row.clone());
        Ok(row)
    }

    async fn list_messages(&self, conversation_id: &Uuid) -> Result<Vec<MessageRow>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<_> = inner
            .messages
            .iter()
            .filter(|m| m.conversation_id == *conversation_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Gemini stub replying `"re: <message>"`.
fn echo_upstream() -> Router {
    Router::new().route(
        "/v1beta/models/{action}",
        post(|Json(body): Json<Value>| async move {
            let text = body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            Json(json!({"candidates": [{"content": {"parts": [{"text": format!("re: {text}")}]}}]}))
        }),
    )
}

/// Relay router in front of `upstream`, returning the relay endpoint URL.
async fn spawn_relay(upstream: Router) -> String {
    let upstream_base = spawn(upstream).await;
    let config = ApiConfig {
        upstream_base_url: upstream_base,
        model: "test-model".into(),
        ..ApiConfig::default()
    };
    let state = AppState::with_secrets(config, Arc::new(StaticSecret::new("key"))).unwrap();
    let relay_base = spawn(chatrelay_api::router(state)).await;
    format!("{relay_base}{}", routes::POST_RELAY)
}

async fn session(upstream: Router) -> ChatSession<MemoryStore> {
    let relay = RelayClient::new(&spawn_relay(upstream).await).unwrap();
    ChatSession::new(MemoryStore::default(), relay, Uuid::now_v7())
}

#[tokio::test]
async fn first_message_creates_titled_conversation() {
    let session = session(echo_upstream()).await;

    let turn = session.send(None, "  Hello  ").await.unwrap();

    assert_eq!(turn.conversation.title, "Hello");
    assert_eq!(turn.conversation.user_id, session.user_id());
    let roles: Vec<_> = turn.messages.iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec![Some(Role::User), Some(Role::Assistant)]);
    assert_eq!(turn.messages[0].content, "Hello");
    assert_eq!(turn.reply().unwrap().content, "re: Hello");
}

#[tokio::test]
async fn follow_up_appends_to_existing_conversation() {
    let session = session(echo_upstream()).await;

    let first = session.send(None, "one").await.unwrap();
    let second = session
        .send(Some(first.conversation.id), "two")
        .await
        .unwrap();

    assert_eq!(second.conversation.id, first.conversation.id);
    let contents: Vec<_> = second.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "re: one", "two", "re: two"]);
    assert_eq!(session.conversations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn most_recently_active_conversation_lists_first() {
    let session = session(echo_upstream()).await;

    let a = session.send(None, "first chat").await.unwrap();
    let b = session.new_conversation(None).await.unwrap();
    assert_eq!(b.title, "New Chat");
    session.send(Some(a.conversation.id), "again").await.unwrap();

    let ids: Vec<_> = session
        .conversations()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![a.conversation.id, b.id]);
}

#[tokio::test]
async fn blank_message_writes_nothing() {
    let session = session(echo_upstream()).await;

    assert!(matches!(
        session.send(None, " \n ").await,
        Err(SessionError::EmptyMessage)
    ));
    assert!(session.conversations().await.unwrap().is_empty());
}

#[tokio::test]
async fn upstream_failure_is_stored_as_apology() {
    let failing = Router::new().route(
        "/v1beta/models/{action}",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let session = session(failing).await;

    let turn = session.send(None, "Hello").await.unwrap();

    assert_eq!(turn.reply().unwrap().content, APOLOGY_REPLY);
}

#[tokio::test]
async fn unreachable_relay_keeps_user_message() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let relay = RelayClient::new(&format!("http://{addr}/relay")).unwrap();
    let session = ChatSession::new(MemoryStore::default(), relay, Uuid::now_v7());

    let err = session.send(None, "Hello").await.unwrap_err();
    assert!(matches!(err, SessionError::Relay(ClientError::Transport(_))));

    let conversations = session.conversations().await.unwrap();
    assert_eq!(conversations.len(), 1);
    let history = session.history(conversations[0].id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role(), Some(Role::User));
}

#[tokio::test]
async fn other_users_conversation_is_not_found() {
    let session = session(echo_upstream()).await;
    let foreign = session
        .store()
        .create_conversation(&Uuid::now_v7(), "theirs")
        .await
        .unwrap();

    assert!(matches!(
        session.history(foreign.id).await,
        Err(SessionError::NotFound(id)) if id == foreign.id
    ));
    assert!(matches!(
        session.send(Some(foreign.id), "hi").await,
        Err(SessionError::NotFound(_))
    ));
}
