/**
 * Chat Message Handlers
 *
 * REST access to a stream's chat:
 *
 * - `POST /api/chat/{stream_id}/message` - send a message (live broadcast
 *   plus history)
 * - `GET /api/chat/{stream_id}/messages` - page through history
 * - `DELETE /api/chat/{stream_id}/message/{message_id}` - moderate history
 *
 * Messages sent here reach socket viewers exactly like messages sent over
 * the socket; both go through `BroadcastHub::broadcast`.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::chat::store::{NewChatMessage, StoredChatMessage};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{BroadcastMessage, InboundChatMessage};

/// Default page size for history
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Largest page size a client may request
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Response body of a sent message
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message: String,
    /// History ID; `null` if the message was broadcast but not persisted
    pub message_id: Option<Uuid>,
    pub chat_message: SentChatMessage,
}

/// The message as broadcast
#[derive(Debug, Serialize)]
pub struct SentChatMessage {
    pub id: Option<Uuid>,
    pub username: String,
    pub message: String,
    pub color: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// History paging parameters
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub skip: usize,
}

fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Send a chat message to a stream
///
/// # Errors
///
/// * `400 Bad Request` - invalid text or colour, or the stream is offline
/// * `401 Unauthorized` - missing or invalid token
/// * `404 Not Found` - no such stream
/// * `503 Service Unavailable` - the stream directory cannot be reached
pub async fn send_chat_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(stream_id): Path<String>,
    Json(request): Json<InboundChatMessage>,
) -> Result<(StatusCode, Json<SendMessageResponse>), BackendError> {
    request.validate()?;

    let stream = state
        .streams
        .lookup(&stream_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Stream not found"))?;

    if !stream.is_live {
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            "Cannot send message to offline stream",
        ));
    }

    let color = request.resolve_color(&user.username);
    let message = BroadcastMessage::new(stream_id.as_str(), user.username.as_str(), request.text, color);
    let record = NewChatMessage::from(&message);
    let sent = SentChatMessage {
        id: None,
        username: message.sender.clone(),
        message: message.text.clone(),
        color: message.color.clone(),
        timestamp: message.timestamp,
    };

    let report = state.hub.broadcast(&stream_id, message);
    tracing::info!(
        "[Chat] {} sent a message to stream {} ({} delivered)",
        user.username,
        stream_id,
        report.delivered
    );

    let message_id = match state.chat_store.append(record).await {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!("[Chat] Failed to persist message for stream {}: {}", stream_id, e);
            None
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            message: "Chat message sent successfully".to_string(),
            message_id,
            chat_message: SentChatMessage { id: message_id, ..sent },
        }),
    ))
}

/// List a stream's chat history, oldest first
///
/// # Errors
///
/// * `400 Bad Request` - `limit` above [`MAX_HISTORY_LIMIT`]
pub async fn get_chat_messages(
    State(state): State<AppState>,
    Path(stream_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<StoredChatMessage>>, BackendError> {
    if query.limit > MAX_HISTORY_LIMIT {
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            format!("limit must be at most {}", MAX_HISTORY_LIMIT),
        ));
    }

    let messages = state.chat_store.list(&stream_id, query.limit, query.skip).await?;
    Ok(Json(messages))
}

/// Delete a chat message
///
/// Only the message's sender or the stream's owner may delete it.
///
/// # Errors
///
/// * `400 Bad Request` - malformed message ID
/// * `403 Forbidden` - neither sender nor streamer
/// * `404 Not Found` - no such message in this stream, or no such stream
pub async fn delete_chat_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((stream_id, message_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let message_id = Uuid::parse_str(&message_id)
        .map_err(|_| BackendError::handler(StatusCode::BAD_REQUEST, "Invalid message ID"))?;

    let message = state
        .chat_store
        .get(message_id)
        .await?
        .filter(|message| message.stream_id == stream_id)
        .ok_or_else(|| BackendError::not_found("Message not found"))?;

    let stream = state
        .streams
        .lookup(&stream_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Stream not found"))?;

    if message.username != user.username && stream.streamer_username != user.username {
        tracing::warn!(
            "[Chat] {} tried to delete message {} in stream {}",
            user.username,
            message_id,
            stream_id
        );
        return Err(BackendError::forbidden("Not authorized to delete this message"));
    }

    if !state.chat_store.delete(message_id).await? {
        return Err(BackendError::handler(StatusCode::BAD_REQUEST, "Failed to delete message"));
    }

    tracing::info!("[Chat] {} deleted message {} in stream {}", user.username, message_id, stream_id);
    Ok(Json(serde_json::json!({ "message": "Chat message deleted successfully" })))
}
