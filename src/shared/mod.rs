//! Shared Module
//!
//! This module contains the wire types exchanged between the chat server and
//! its clients. Nothing here depends on the server runtime, so the types can
//! be reused by any client crate.

/// Chat message payloads and validation
pub mod message;

/// Frames pushed to chat sessions
pub mod event;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use message::{BroadcastMessage, InboundChatMessage};
pub use event::ChatEvent;
pub use error::SharedError;
