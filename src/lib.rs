//! Streamchat - Main Library
//!
//! Streamchat is the live chat backend of a streaming platform. Every
//! stream has a chat room; viewers connect over WebSocket and receive each
//! message sent to the room, and chat history is kept in PostgreSQL.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types exchanged with clients
//!   - Chat message payloads and their validation
//!   - Socket frame types
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Room registry and broadcast hub
//!   - WebSocket handler and chat REST API
//!   - Chat history store, stream directory, token verification
//!
//! # Feature Flags
//!
//! - **`ssr`** - Server build (enables the `backend` module); on by default
//!
//! # Usage
//!
//! ```rust,no_run
//! use streamchat::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() {
//! let (app, state) = create_app(ServerConfig::from_env()).await;
//! // Serve `app` with axum, then close every chat session:
//! state.registry().shutdown();
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The room registry is sharded (`dashmap`) and each session guards its
//! outbound channel with its own lock, so joins, leaves and broadcasts on
//! different rooms proceed in parallel and no send ever blocks on a slow
//! viewer.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
