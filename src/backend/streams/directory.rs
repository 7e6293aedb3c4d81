/**
 * Stream Directory
 *
 * Stream lifecycle (creating streams, going live, ending) is owned by
 * another service. Chat only reads it: a message is accepted for a stream
 * that exists and is live, and the streamer may moderate their stream's
 * chat.
 */

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use sqlx::PgPool;

use crate::backend::error::StoreError;

/// What chat needs to know about a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
    /// Stream ID (also the chat room ID)
    pub stream_id: String,
    /// Username of the stream owner
    pub streamer_username: String,
    /// Stream title
    pub title: String,
    /// Whether the stream is currently live
    pub is_live: bool,
}

/// Read access to the stream lifecycle
#[async_trait]
pub trait StreamDirectory: Send + Sync {
    /// Look up a stream by ID
    ///
    /// # Returns
    /// `None` if no such stream exists
    async fn lookup(&self, stream_id: &str) -> Result<Option<StreamInfo>, StoreError>;
}

/// Process-local stream directory
///
/// Used when no database is configured and in tests. Streams are put in
/// place with [`InMemoryStreamDirectory::upsert`].
#[derive(Debug, Default)]
pub struct InMemoryStreamDirectory {
    streams: DashMap<String, StreamInfo>,
}

impl InMemoryStreamDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding `streams`
    pub fn with_streams(streams: impl IntoIterator<Item = StreamInfo>) -> Self {
        let directory = Self::new();
        for stream in streams {
            directory.upsert(stream);
        }
        directory
    }

    /// Insert or replace a stream
    pub fn upsert(&self, stream: StreamInfo) {
        self.streams.insert(stream.stream_id.clone(), stream);
    }

    /// Flip a stream's live flag
    ///
    /// # Returns
    /// `false` if the stream is unknown
    pub fn set_live(&self, stream_id: &str, is_live: bool) -> bool {
        match self.streams.get_mut(stream_id) {
            Some(mut stream) => {
                stream.is_live = is_live;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl StreamDirectory for InMemoryStreamDirectory {
    async fn lookup(&self, stream_id: &str) -> Result<Option<StreamInfo>, StoreError> {
        Ok(self.streams.get(stream_id).map(|entry| entry.value().clone()))
    }
}

#[derive(sqlx::FromRow)]
struct StreamRow {
    id: String,
    streamer_username: String,
    title: String,
    is_live: bool,
}

/// Stream directory backed by the `streams` table
#[derive(Debug, Clone)]
pub struct PgStreamDirectory {
    pool: PgPool,
}

impl PgStreamDirectory {
    /// Create a directory over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StreamDirectory for PgStreamDirectory {
    async fn lookup(&self, stream_id: &str) -> Result<Option<StreamInfo>, StoreError> {
        let row = sqlx::query_as::<_, StreamRow>(
            r#"
            SELECT id, streamer_username, title, is_live
            FROM streams
            WHERE id = $1
            "#,
        )
        .bind(stream_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| StreamInfo {
            stream_id: row.id,
            streamer_username: row.streamer_username,
            title: row.title,
            is_live: row.is_live,
        }))
    }
}
