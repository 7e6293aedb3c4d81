/**
 * Application State Management
 *
 * This module defines the application state shared by every handler
 * through Axum's `State` extractor.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The broadcast hub (and through it the room registry)
 * - The chat history store and stream directory collaborators
 * - The token authority
 * - Optional services (database)
 *
 * # Thread Safety
 *
 * Every field is an `Arc` (or `Option<PgPool>`, itself reference counted),
 * so cloning the state per request is cheap and all clones share one hub.
 *
 * # Example
 *
 * ```rust
 * use streamchat::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) -> String {
 *     state.hub.room_presence("42").to_string()
 * }
 * ```
 */

use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::auth::TokenAuthority;
use crate::backend::chat::{ChatStore, InMemoryChatStore};
use crate::backend::realtime::{BroadcastHub, RoomRegistry};
use crate::backend::server::config::ServerConfig;
use crate::backend::streams::{InMemoryStreamDirectory, StreamDirectory};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Live chat fan-out
    pub hub: Arc<BroadcastHub>,

    /// Chat history
    pub chat_store: Arc<dyn ChatStore>,

    /// Stream lifecycle lookups
    pub streams: Arc<dyn StreamDirectory>,

    /// Session token verification
    pub auth: Arc<TokenAuthority>,

    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Database connection pool
    ///
    /// This is `None` if the database is not configured (e.g., if
    /// `DATABASE_URL` is not set or unreachable). The collaborators are
    /// in-memory in that case.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Assemble state from already-built collaborators
    ///
    /// A fresh room registry and hub are created here; nothing else owns them.
    pub fn new(
        config: ServerConfig,
        chat_store: Arc<dyn ChatStore>,
        streams: Arc<dyn StreamDirectory>,
        db_pool: Option<PgPool>,
    ) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let auth = Arc::new(TokenAuthority::new(&config.jwt_secret));

        Self {
            hub: Arc::new(BroadcastHub::new(registry)),
            chat_store,
            streams,
            auth,
            config: Arc::new(config),
            db_pool,
        }
    }

    /// State backed entirely by in-memory collaborators
    ///
    /// The stream directory is seeded with `config.streams`.
    pub fn in_memory(config: ServerConfig) -> Self {
        let streams = InMemoryStreamDirectory::with_streams(config.streams.iter().cloned());
        Self::new(config, Arc::new(InMemoryChatStore::new()), Arc::new(streams), None)
    }

    /// The room registry behind the hub
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        self.hub.registry()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("hub", &self.hub)
            .field("config", &self.config)
            .field("db_pool", &self.db_pool.is_some())
            .finish_non_exhaustive()
    }
}
