/**
 * Database Operations for Chat History
 *
 * This module provides the PostgreSQL implementation of `ChatStore`.
 * The schema lives in `migrations/0001_streamchat.sql`.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::chat::store::{ChatStore, NewChatMessage, StoredChatMessage};
use crate::backend::error::StoreError;

#[derive(sqlx::FromRow)]
struct ChatMessageRow {
    id: Uuid,
    stream_id: String,
    username: String,
    message: String,
    color: String,
    timestamp: DateTime<Utc>,
}

impl From<ChatMessageRow> for StoredChatMessage {
    fn from(row: ChatMessageRow) -> Self {
        Self {
            id: row.id,
            stream_id: row.stream_id,
            username: row.username,
            message: row.message,
            color: row.color,
            timestamp: row.timestamp,
        }
    }
}

/// Chat history backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    /// Create a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    /// Save a message
    ///
    /// # Arguments
    /// * `message` - Message to save
    ///
    /// # Returns
    /// The generated message ID
    async fn append(&self, message: NewChatMessage) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, stream_id, username, message, color, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&message.stream_id)
        .bind(&message.username)
        .bind(&message.message)
        .bind(&message.color)
        .bind(message.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list(&self, stream_id: &str, limit: usize, offset: usize) -> Result<Vec<StoredChatMessage>, StoreError> {
        let rows = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT id, stream_id, username, message, color, timestamp
            FROM chat_messages
            WHERE stream_id = $1
            ORDER BY timestamp DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(stream_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        // Rows arrive newest first; history is returned oldest first
        let mut messages: Vec<StoredChatMessage> = rows.into_iter().map(StoredChatMessage::from).collect();
        messages.reverse();
        Ok(messages)
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredChatMessage>, StoreError> {
        let row = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT id, stream_id, username, message, color, timestamp
            FROM chat_messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoredChatMessage::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
