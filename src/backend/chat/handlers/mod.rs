//! Chat Handlers Module
//!
//! This module contains the Axum handlers for the chat REST API.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── messages.rs - Send, list and delete chat messages
//! └── presence.rs - Room presence
//! ```
//!
//! # Route Handlers
//!
//! ## POST /api/chat/{stream_id}/message
//!
//! Requires a bearer token. Broadcasts the message to the stream's live
//! room and stores it in chat history.
//!
//! ## GET /api/chat/{stream_id}/messages?limit=50&skip=0
//!
//! Public. Returns the newest `limit` messages after skipping `skip`,
//! oldest first.
//!
//! ## DELETE /api/chat/{stream_id}/message/{message_id}
//!
//! Requires a bearer token belonging to the message's sender or the
//! stream's owner.
//!
//! ## GET /api/chat/{stream_id}/presence
//!
//! Public. Number of connected chat sessions.

/// Send, list and delete chat messages
pub mod messages;

/// Room presence
pub mod presence;

// Re-export handlers
pub use messages::{delete_chat_message, get_chat_messages, send_chat_message};
pub use presence::get_presence;
