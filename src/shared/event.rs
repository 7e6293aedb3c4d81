/**
 * Chat Socket Events
 *
 * This module defines the frames the server pushes to a connected viewer.
 * Every frame is a JSON object with a `type` discriminator:
 *
 * - `system` - connection notices ("Connected to chat")
 * - `chat_message` - a message broadcast to the room
 * - `error` - a rejected inbound payload, sent only to its sender
 */
use serde::{Deserialize, Serialize};

use crate::shared::message::BroadcastMessage;

/// Frame pushed to a chat session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Connection notice
    System {
        /// Human-readable notice
        message: String,
        /// Stream the session is joined to
        stream_id: String,
    },
    /// Message broadcast to the room
    ChatMessage(BroadcastMessage),
    /// Inbound payload was rejected
    Error {
        /// Why the payload was rejected
        message: String,
    },
}

impl ChatEvent {
    /// The acknowledgement sent right after a session joins a room
    pub fn connected(stream_id: impl Into<String>) -> Self {
        Self::System {
            message: "Connected to chat".to_string(),
            stream_id: stream_id.into(),
        }
    }

    /// Create an error frame
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }

    /// Serialize to the JSON text sent over the socket
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<BroadcastMessage> for ChatEvent {
    fn from(message: BroadcastMessage) -> Self {
        Self::ChatMessage(message)
    }
}
