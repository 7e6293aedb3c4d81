//! State and session fixtures

use std::sync::Arc;

use streamchat::backend::chat::InMemoryChatStore;
use streamchat::backend::realtime::{ChannelSession, Frame, Session};
use streamchat::backend::server::{AppState, ServerConfig};
use streamchat::backend::streams::{InMemoryStreamDirectory, StreamInfo};
use streamchat::shared::{BroadcastMessage, ChatEvent};
use tokio::sync::mpsc;

/// Owner of the stream every fixture creates
pub const STREAMER: &str = "streamer";

/// Application state plus handles on its in-memory collaborators
pub struct TestApp {
    pub state: AppState,
    pub streams: Arc<InMemoryStreamDirectory>,
    pub history: Arc<InMemoryChatStore>,
}

impl TestApp {
    /// State with one live stream, `"42"`
    pub fn new() -> Self {
        let streams = Arc::new(InMemoryStreamDirectory::new());
        let history = Arc::new(InMemoryChatStore::new());
        let state = AppState::new(ServerConfig::default(), history.clone(), streams.clone(), None);

        let app = Self { state, streams, history };
        app.add_stream("42", true);
        app
    }

    /// Register a stream owned by [`STREAMER`]
    pub fn add_stream(&self, stream_id: &str, is_live: bool) {
        self.streams.upsert(StreamInfo {
            stream_id: stream_id.to_string(),
            streamer_username: STREAMER.to_string(),
            title: format!("Stream {}", stream_id),
            is_live,
        });
    }

    /// A bearer header value for `username`
    pub fn bearer(&self, username: &str) -> String {
        format!("Bearer {}", self.state.auth.issue(username).unwrap())
    }

    /// Wait until the background history writer has stored `count` messages
    pub async fn wait_for_history(&self, count: usize) {
        for _ in 0..100 {
            if self.history.len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("history holds {} messages, expected {}", self.history.len(), count);
    }
}

/// A channel session not yet joined to any room
pub fn session(room_id: &str, buffer: usize) -> (Arc<dyn Session>, mpsc::Receiver<Frame>) {
    let (session, rx) = ChannelSession::new(room_id, buffer);
    let session: Arc<dyn Session> = session;
    (session, rx)
}

/// Receive the next frame, which must be a chat message
pub fn next_chat(rx: &mut mpsc::Receiver<Frame>) -> BroadcastMessage {
    match rx.try_recv() {
        Ok(frame) => match frame.as_ref() {
            ChatEvent::ChatMessage(message) => message.clone(),
            other => panic!("expected a chat message, got {:?}", other),
        },
        Err(e) => panic!("expected a queued frame: {:?}", e),
    }
}
