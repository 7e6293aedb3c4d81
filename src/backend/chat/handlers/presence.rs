/**
 * Presence Handler
 *
 * `GET /api/chat/{stream_id}/presence` reports how many sessions are
 * currently joined to a stream's chat room.
 */

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::backend::server::state::AppState;

/// Presence of one stream's chat room
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PresenceResponse {
    pub stream_id: String,
    pub viewers: usize,
}

/// Report the number of connected chat sessions for a stream
///
/// Unknown streams report zero viewers.
pub async fn get_presence(State(state): State<AppState>, Path(stream_id): Path<String>) -> Json<PresenceResponse> {
    let viewers = state.hub.room_presence(&stream_id);
    Json(PresenceResponse { stream_id, viewers })
}
