//! Chat Backend Module
//!
//! This module contains the server-side chat functionality that sits
//! around the live fan-out in `realtime`:
//! - Chat history persistence (`ChatStore` and its implementations)
//! - REST handlers for sending, listing and moderating messages
//!
//! # Architecture
//!
//! - **`store`** - `ChatStore` trait and the in-memory store
//! - **`db`** - PostgreSQL `ChatStore`
//! - **`handlers`** - REST handlers (`/api/chat/...`)
//!
//! # Example
//!
//! ```rust,no_run
//! use streamchat::backend::chat::{ChatStore, InMemoryChatStore, NewChatMessage};
//! use streamchat::shared::BroadcastMessage;
//!
//! # async fn example() {
//! let store = InMemoryChatStore::new();
//! let message = BroadcastMessage::new("42", "alice", "hi", "#9146FF");
//! let id = store.append(NewChatMessage::from(&message)).await;
//! # }
//! ```

/// Chat history trait and in-memory store
pub mod store;

/// Database operations for chat history
pub mod db;

/// REST handlers
pub mod handlers;

/// Re-export commonly used types
pub use db::PgChatStore;
pub use store::{ChatStore, InMemoryChatStore, NewChatMessage, StoredChatMessage};
