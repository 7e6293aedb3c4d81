/**
 * Chat Message Data Structures
 *
 * This module defines the messages that travel through a stream's chat room:
 * the inbound payload a viewer sends over the socket, and the broadcast
 * message the hub fans out to every member of the room.
 *
 * Both types are shared between the backend and any client, so they are
 * plain serde structs with no server-only dependencies.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Maximum length of a chat message, in characters
pub const MAX_MESSAGE_LENGTH: usize = 500;

/// Colour used when nothing else applies
pub const DEFAULT_COLOR: &str = "#9146FF";

/// Palette that server-assigned chat colours are drawn from
pub const COLOR_PALETTE: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FECA57", "#FF9FF3", "#54A0FF", "#5F27CD",
];

/// A chat message on its way to every viewer of a stream
///
/// This is the value handed to the broadcast hub. The room identifier is
/// carried for routing only and is not part of the wire payload, which is
/// exactly `{ sender, text, color, timestamp }`.
///
/// # Fields
/// * `room_id` - Identifier of the room (the stream id)
/// * `sender` - Display name of the authenticated sender
/// * `text` - Message content (1..=500 characters)
/// * `color` - Hex presentation colour, e.g. `#9146FF`
/// * `timestamp` - Server time the message was accepted (RFC3339 on the wire)
///
/// # Example
/// ```rust
/// use streamchat::shared::BroadcastMessage;
///
/// let message = BroadcastMessage::new("42", "alice", "hi", "#9146FF");
/// assert_eq!(message.room_id, "42");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BroadcastMessage {
    /// Room the message is addressed to
    #[serde(skip)]
    pub room_id: String,
    /// Display name of the sender
    pub sender: String,
    /// The message text content
    pub text: String,
    /// Hex presentation colour
    pub color: String,
    /// Time the server accepted the message
    pub timestamp: DateTime<Utc>,
}

impl BroadcastMessage {
    /// Create a new broadcast message stamped with the current UTC time
    pub fn new(
        room_id: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self::at(room_id, sender, text, color, Utc::now())
    }

    /// Create a broadcast message with an explicit timestamp
    ///
    /// Used when the timestamp was already fixed elsewhere, e.g. when the
    /// message was first written to history.
    pub fn at(
        room_id: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
        color: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            sender: sender.into(),
            text: text.into(),
            color: color.into(),
            timestamp,
        }
    }
}

/// Payload a viewer sends over the chat socket
///
/// The sender is never taken from the payload; it comes from the
/// authenticated connection. `message` is accepted as an alias of `text`
/// for clients written against the older wire format.
///
/// # Example
/// ```rust
/// use streamchat::shared::InboundChatMessage;
///
/// let inbound: InboundChatMessage = serde_json::from_str(r#"{"message":"gg"}"#).unwrap();
/// assert_eq!(inbound.text, "gg");
/// assert!(inbound.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundChatMessage {
    /// Message text
    #[serde(alias = "message")]
    pub text: String,
    /// Optional colour chosen by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl InboundChatMessage {
    /// Parse and validate a raw socket frame
    pub fn parse(raw: &str) -> Result<Self, SharedError> {
        let inbound: Self = serde_json::from_str(raw)?;
        inbound.validate()?;
        Ok(inbound)
    }

    /// Check the payload against the chat message rules
    ///
    /// # Errors
    ///
    /// * `ValidationError` on `text` - empty (after trimming) or longer than
    ///   [`MAX_MESSAGE_LENGTH`] characters
    /// * `ValidationError` on `color` - present but not a `#RRGGBB` colour
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_text(&self.text)?;
        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(SharedError::validation("color", "Colour must look like #RRGGBB"));
            }
        }
        Ok(())
    }

    /// Resolve the colour to broadcast with
    ///
    /// The client's own colour wins; otherwise a palette colour is derived
    /// from the sender so the same viewer keeps the same colour.
    pub fn resolve_color(&self, sender: &str) -> String {
        self.color.clone().unwrap_or_else(|| palette_color(sender).to_string())
    }
}

/// Validate chat message text
pub fn validate_text(text: &str) -> Result<(), SharedError> {
    if text.is_empty() {
        return Err(SharedError::validation("text", "Message text cannot be empty"));
    }
    let length = text.chars().count();
    if length > MAX_MESSAGE_LENGTH {
        return Err(SharedError::validation(
            "text",
            format!("Message is {} characters, the limit is {}", length, MAX_MESSAGE_LENGTH),
        ));
    }
    Ok(())
}

/// Check whether a string is a `#RRGGBB` hex colour
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Pick a stable palette colour for a display name
pub fn palette_color(sender: &str) -> &'static str {
    let index = sender.bytes().fold(0usize, |acc, b| acc.wrapping_add(b as usize));
    COLOR_PALETTE[index % COLOR_PALETTE.len()]
}
