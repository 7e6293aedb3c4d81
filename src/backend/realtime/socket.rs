/**
 * Chat WebSocket Handler
 *
 * This module adapts one WebSocket connection to a chat session:
 *
 * - `GET /ws/chat/{stream_id}?token=<jwt>` upgrades the connection
 * - the connection gets a `ChannelSession`, is acknowledged with a
 *   `system` frame and joins the stream's room
 * - a writer task drains the session's outbound frames to the socket and
 *   pings every 30 seconds
 * - inbound text frames are validated and, for a live stream, broadcast to
 *   the room and appended to chat history in the background
 *
 * Viewers without a token may watch; only signed-in viewers may send.
 * Rejected payloads produce an `error` frame for the sender only.
 *
 * # Cancellation
 *
 * Membership is held by a guard whose `Drop` leaves the room, so a
 * connection that ends for any reason (close frame, network error, task
 * abort, server shutdown) is removed from its room.
 */

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use thiserror::Error;

use crate::backend::chat::{ChatStore, NewChatMessage};
use crate::backend::error::{BackendError, StoreError};
use crate::backend::realtime::hub::{BroadcastHub, DeliveryReport};
use crate::backend::realtime::session::{ChannelSession, Session, SessionId};
use crate::backend::server::state::AppState;
use crate::shared::{BroadcastMessage, ChatEvent, InboundChatMessage, SharedError};

/// Interval between server-initiated Ping frames
pub const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Query parameters of the chat socket route
#[derive(Debug, Default, Deserialize)]
pub struct ChatSocketQuery {
    /// Session token; absent for anonymous viewers
    pub token: Option<String>,
}

/// Why an inbound chat payload was not broadcast
#[derive(Debug, Error)]
pub enum InboundRejection {
    /// The connection has no signed-in user
    #[error("Sign in to chat")]
    Anonymous,

    /// Bad JSON, bad text or bad colour
    #[error(transparent)]
    Invalid(#[from] SharedError),

    /// The stream does not exist
    #[error("Stream not found")]
    UnknownStream,

    /// The stream exists but is not live
    #[error("Cannot send message to offline stream")]
    Offline,

    /// The stream directory could not be consulted
    #[error("Chat is temporarily unavailable")]
    Unavailable(#[from] StoreError),
}

/// Upgrade a request to a chat WebSocket
///
/// # Errors
///
/// Returns 401 before upgrading if a token is given but does not verify.
pub async fn handle_chat_socket(
    ws: WebSocketUpgrade,
    Path(stream_id): Path<String>,
    Query(query): Query<ChatSocketQuery>,
    State(state): State<AppState>,
) -> Result<Response, BackendError> {
    let username = match query.token.as_deref().filter(|token| !token.is_empty()) {
        Some(token) => Some(state.auth.username(token).map_err(|e| {
            tracing::warn!("[Realtime] Rejected chat socket for stream {}: {}", stream_id, e);
            e
        })?),
        None => None,
    };

    Ok(ws.on_upgrade(move |socket| run_chat_session(socket, state, stream_id, username)))
}

/// Drive one upgraded chat connection until it ends
pub async fn run_chat_session(socket: WebSocket, state: AppState, stream_id: String, username: Option<String>) {
    let (session, mut outbound) = ChannelSession::new(stream_id.as_str(), state.config.session_buffer);
    let session: Arc<dyn Session> = session;

    // Queued before joining so it precedes every broadcast
    if let Err(e) = session.send(Arc::new(ChatEvent::connected(stream_id.as_str()))) {
        tracing::warn!("[Realtime] Could not queue connect notice for {}: {}", session.id(), e);
        return;
    }

    if !state.hub.join(&stream_id, Arc::clone(&session)) {
        tracing::warn!("[Realtime] Session {} could not join room {}", session.id(), stream_id);
        return;
    }
    let _membership = MembershipGuard::new(Arc::clone(&state.hub), &stream_id, session.id());

    tracing::info!(
        "[Realtime] {} joined room {} as session {} ({} present)",
        username.as_deref().unwrap_or("anonymous viewer"),
        stream_id,
        session.id(),
        state.hub.room_presence(&stream_id)
    );

    let (mut ws_tx, mut ws_rx) = socket.split();

    let writer = async move {
        let mut ping_interval = tokio::time::interval(PING_INTERVAL);
        // Skip the immediate first tick
        ping_interval.tick().await;

        loop {
            tokio::select! {
                frame = outbound.recv() => {
                    let Some(frame) = frame else { break };
                    let text = match frame.to_json() {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("[Realtime] Failed to serialize chat frame: {}", e);
                            continue;
                        }
                    };
                    if ws_tx.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                _ = ping_interval.tick() => {
                    if ws_tx.send(Message::Ping(Vec::<u8>::new().into())).await.is_err() {
                        break;
                    }
                }
            }
        }

        let _ = ws_tx.close().await;
    };

    let reader = async {
        while let Some(Ok(message)) = ws_rx.next().await {
            match message {
                Message::Text(text) => {
                    handle_inbound(&state, &session, username.as_deref(), text.as_str()).await;
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    };

    tokio::select! {
        _ = writer => {}
        _ = reader => {}
    }

    tracing::info!("[Realtime] Session {} disconnected from room {}", session.id(), stream_id);
}

/// Handle one inbound text frame from `session`
///
/// On rejection the reason is sent to `session` alone.
pub async fn handle_inbound(
    state: &AppState,
    session: &Arc<dyn Session>,
    username: Option<&str>,
    raw: &str,
) -> Option<DeliveryReport> {
    match process_inbound(state, session.room_id(), username, raw).await {
        Ok(report) => Some(report),
        Err(rejection) => {
            tracing::debug!("[Chat] Rejected message from session {}: {}", session.id(), rejection);
            if let Err(e) = session.send(Arc::new(ChatEvent::error(rejection.to_string()))) {
                tracing::debug!("[Chat] Could not deliver rejection to session {}: {}", session.id(), e);
            }
            None
        }
    }
}

/// Validate an inbound payload and broadcast it to `stream_id`
///
/// The message is appended to chat history in a background task; the
/// broadcast does not wait for it.
pub async fn process_inbound(
    state: &AppState,
    stream_id: &str,
    username: Option<&str>,
    raw: &str,
) -> Result<DeliveryReport, InboundRejection> {
    let sender = username.ok_or(InboundRejection::Anonymous)?;
    let inbound = InboundChatMessage::parse(raw)?;

    let stream = state.streams.lookup(stream_id).await?.ok_or(InboundRejection::UnknownStream)?;
    if !stream.is_live {
        return Err(InboundRejection::Offline);
    }

    let color = inbound.resolve_color(sender);
    let message = BroadcastMessage::new(stream_id, sender, inbound.text, color);
    let record = NewChatMessage::from(&message);

    let report = state.hub.broadcast(stream_id, message);
    spawn_history_append(Arc::clone(&state.chat_store), record);

    Ok(report)
}

/// Append a message to chat history without waiting for the result
pub fn spawn_history_append(store: Arc<dyn ChatStore>, message: NewChatMessage) {
    tokio::spawn(async move {
        let stream_id = message.stream_id.clone();
        if let Err(e) = store.append(message).await {
            tracing::warn!("[Chat] Failed to persist message for stream {}: {}", stream_id, e);
        }
    });
}

/// Leaves the room when dropped
struct MembershipGuard {
    hub: Arc<BroadcastHub>,
    room_id: String,
    session_id: SessionId,
}

impl MembershipGuard {
    fn new(hub: Arc<BroadcastHub>, room_id: &str, session_id: SessionId) -> Self {
        Self {
            hub,
            room_id: room_id.to_string(),
            session_id,
        }
    }
}

impl Drop for MembershipGuard {
    fn drop(&mut self) {
        if self.hub.leave(&self.room_id, self.session_id) {
            tracing::debug!("[Realtime] Session {} left room {}", self.session_id, self.room_id);
        }
    }
}
