//! Real-time Chat Module
//!
//! This module implements live chat fan-out for streams. Every stream has a
//! chat room; viewers connect over WebSocket, join the room, and receive
//! every message broadcast to it.
//!
//! # Architecture
//!
//! The realtime module is organized into focused submodules:
//!
//! - **`session`** - One live connection and its non-blocking send capability
//! - **`registry`** - Room → sessions membership, with empty-room pruning
//! - **`hub`** - Snapshot, deliver, then prune fan-out over the registry
//! - **`socket`** - WebSocket transport adapter (`/ws/chat/{stream_id}`)
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports and documentation
//! ├── session.rs   - Session trait and channel-backed sessions
//! ├── registry.rs  - Room registry
//! ├── hub.rs       - Broadcast hub
//! └── socket.rs    - WebSocket handler
//! ```
//!
//! # Lifecycle
//!
//! The registry and hub are created once in `server::init` and owned by
//! `AppState`. On shutdown `RoomRegistry::shutdown` closes every session,
//! which ends every connection's writer task.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use streamchat::backend::realtime::{BroadcastHub, ChannelSession, RoomRegistry};
//! use streamchat::shared::BroadcastMessage;
//!
//! let hub = BroadcastHub::new(Arc::new(RoomRegistry::new()));
//! let (session, _outbound) = ChannelSession::new("42", 16);
//! hub.join("42", session);
//!
//! let report = hub.broadcast("42", BroadcastMessage::new("42", "alice", "hi", "#9146FF"));
//! assert_eq!(report.delivered, 1);
//! ```

/// Sessions and their send capability
pub mod session;

/// Room membership registry
pub mod registry;

/// Broadcast fan-out
pub mod hub;

/// WebSocket transport adapter
pub mod socket;

// Re-export commonly used types
pub use hub::{BroadcastHub, DeliveryReport};
pub use registry::RoomRegistry;
pub use session::{ChannelSession, DeliveryError, Frame, Session, SessionId};
pub use socket::handle_chat_socket;
