/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including database loading, collaborator selection, state creation and
 * route configuration.
 *
 * # Initialization Process
 *
 * 1. Load the optional database
 * 2. Pick the chat history store and stream directory (Postgres when the
 *    database is available, in-memory otherwise)
 * 3. Create the room registry and broadcast hub inside `AppState`
 * 4. Create and configure the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::chat::{ChatStore, InMemoryChatStore, PgChatStore};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::streams::{InMemoryStreamDirectory, PgStreamDirectory, StreamDirectory};

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `config` - Loaded server configuration
///
/// # Returns
///
/// The configured router and the state it serves. The caller keeps the
/// state to shut the room registry down once the server stops.
///
/// # Error Handling
///
/// - Missing database: Server continues with in-memory collaborators
/// - Migration failures: Logged but don't prevent startup
pub async fn create_app(config: ServerConfig) -> (Router<()>, AppState) {
    tracing::info!("[Server] Initializing streamchat backend server");

    let db_pool = load_database(config.database_url.as_deref()).await;

    let (chat_store, streams): (Arc<dyn ChatStore>, Arc<dyn StreamDirectory>) = match &db_pool {
        Some(pool) => {
            tracing::info!("[Server] Using PostgreSQL chat history and stream directory");
            (
                Arc::new(PgChatStore::new(pool.clone())),
                Arc::new(PgStreamDirectory::new(pool.clone())),
            )
        }
        None => {
            tracing::info!(
                "[Server] Using in-memory chat history and stream directory ({} streams)",
                config.streams.len()
            );
            let streams = InMemoryStreamDirectory::with_streams(config.streams.iter().cloned());
            (Arc::new(InMemoryChatStore::new()), Arc::new(streams))
        }
    };

    let app_state = AppState::new(config, chat_store, streams, db_pool);
    let app = create_router(app_state.clone());

    tracing::info!("[Server] Router configured");

    (app, app_state)
}
