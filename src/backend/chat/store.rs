/**
 * Chat History Store
 *
 * Chat history is an external collaborator of the live chat: the socket
 * path appends every accepted message here without waiting on it, and the
 * REST API reads and deletes from it.
 *
 * Two implementations exist:
 * - `PgChatStore` (in `db.rs`) - PostgreSQL, used when `DATABASE_URL` is set
 * - `InMemoryChatStore` - process-local, used otherwise and in tests
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::backend::error::StoreError;
use crate::shared::BroadcastMessage;

/// A chat message as written to history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    /// Stream (room) the message was sent to
    pub stream_id: String,
    /// Display name of the sender
    pub username: String,
    /// Message text
    pub message: String,
    /// Presentation colour
    pub color: String,
    /// Time the message was accepted
    pub timestamp: DateTime<Utc>,
}

impl From<&BroadcastMessage> for NewChatMessage {
    fn from(message: &BroadcastMessage) -> Self {
        Self {
            stream_id: message.room_id.clone(),
            username: message.sender.clone(),
            message: message.text.clone(),
            color: message.color.clone(),
            timestamp: message.timestamp,
        }
    }
}

/// A chat message read back from history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredChatMessage {
    /// Message ID
    pub id: Uuid,
    /// Stream (room) the message belongs to
    #[serde(skip)]
    pub stream_id: String,
    /// Display name of the sender
    pub username: String,
    /// Message text
    pub message: String,
    /// Presentation colour
    pub color: String,
    /// Time the message was accepted
    pub timestamp: DateTime<Utc>,
}

impl StoredChatMessage {
    fn from_new(id: Uuid, new: NewChatMessage) -> Self {
        Self {
            id,
            stream_id: new.stream_id,
            username: new.username,
            message: new.message,
            color: new.color,
            timestamp: new.timestamp,
        }
    }
}

/// Persistence of chat history
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Store a message and return its ID
    async fn append(&self, message: NewChatMessage) -> Result<Uuid, StoreError>;

    /// List a stream's history
    ///
    /// Skips the `offset` newest messages, takes the next `limit`, and
    /// returns them oldest first.
    async fn list(&self, stream_id: &str, limit: usize, offset: usize) -> Result<Vec<StoredChatMessage>, StoreError>;

    /// Fetch one message
    async fn get(&self, id: Uuid) -> Result<Option<StoredChatMessage>, StoreError>;

    /// Delete one message
    ///
    /// # Returns
    ///
    /// `true` if a message was deleted
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Process-local chat history
#[derive(Debug, Default)]
pub struct InMemoryChatStore {
    messages: RwLock<Vec<StoredChatMessage>>,
}

impl InMemoryChatStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored messages
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// Whether the store holds no messages
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn append(&self, message: NewChatMessage) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.messages.write().push(StoredChatMessage::from_new(id, message));
        Ok(id)
    }

    async fn list(&self, stream_id: &str, limit: usize, offset: usize) -> Result<Vec<StoredChatMessage>, StoreError> {
        let mut matching: Vec<StoredChatMessage> = self
            .messages
            .read()
            .iter()
            .rev()
            .filter(|m| m.stream_id == stream_id)
            .cloned()
            .collect();

        // Newest first (ties by insertion), then window, then back to oldest first
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let mut page: Vec<StoredChatMessage> = matching.into_iter().skip(offset).take(limit).collect();
        page.reverse();
        Ok(page)
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredChatMessage>, StoreError> {
        Ok(self.messages.read().iter().find(|m| m.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut messages = self.messages.write();
        let before = messages.len();
        messages.retain(|m| m.id != id);
        Ok(messages.len() != before)
    }
}
