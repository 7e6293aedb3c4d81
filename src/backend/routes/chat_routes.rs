/**
 * Chat Route Configuration
 *
 * This module adds the chat endpoints to the router.
 *
 * # Routes
 *
 * - `GET /ws/chat/{stream_id}` - Chat WebSocket (optional `?token=`)
 * - `POST /api/chat/{stream_id}/message` - Send a message (auth)
 * - `GET /api/chat/{stream_id}/messages` - Chat history
 * - `DELETE /api/chat/{stream_id}/message/{message_id}` - Delete a message (auth)
 * - `GET /api/chat/{stream_id}/presence` - Connected viewers
 */

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::backend::chat::handlers::{delete_chat_message, get_chat_messages, get_presence, send_chat_message};
use crate::backend::realtime::handle_chat_socket;
use crate::backend::server::state::AppState;

/// Configure chat-related routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with chat routes configured
pub fn configure_chat_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/ws/chat/{stream_id}", get(handle_chat_socket))
        .route("/api/chat/{stream_id}/message", post(send_chat_message))
        .route("/api/chat/{stream_id}/messages", get(get_chat_messages))
        .route("/api/chat/{stream_id}/message/{message_id}", delete(delete_chat_message))
        .route("/api/chat/{stream_id}/presence", get(get_presence))
}
