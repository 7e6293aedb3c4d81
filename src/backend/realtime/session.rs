/**
 * Chat Sessions
 *
 * A session is one live client connection joined to a single room. The
 * registry owns sessions; the broadcast hub only borrows them (`Arc`) long
 * enough to push a frame.
 *
 * # Send Capability
 *
 * `Session::send` never blocks. `ChannelSession` backs it with a bounded
 * `tokio::sync::mpsc` channel drained by the connection's writer task, and
 * uses `try_send`: a full buffer or a dropped receiver is reported as a
 * delivery failure instead of stalling the broadcaster.
 *
 * # Closing
 *
 * `close` and `send` take the same lock, so once `close` has returned no
 * frame can be enqueued for that session any more.
 */

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::shared::ChatEvent;

/// Frame as shared between every session of a broadcast
pub type Frame = Arc<ChatEvent>;

/// Opaque session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a frame could not be handed to a session
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The session's outbound buffer is full (client is not keeping up)
    #[error("outbound buffer is full")]
    BufferFull,
    /// The session was closed or its connection went away
    #[error("session is closed")]
    Closed,
}

/// One live, addressable client connection
pub trait Session: Send + Sync + fmt::Debug {
    /// Identifier of this session
    fn id(&self) -> SessionId;

    /// Room this session was created for
    fn room_id(&self) -> &str;

    /// Hand one frame to the connection without blocking
    fn send(&self, frame: Frame) -> Result<(), DeliveryError>;

    /// Permanently stop accepting frames
    fn close(&self);

    /// Whether `close` has been called or the connection is gone
    fn is_closed(&self) -> bool;
}

/// Session backed by a bounded mpsc channel
pub struct ChannelSession {
    id: SessionId,
    room_id: String,
    outbound: Mutex<Option<mpsc::Sender<Frame>>>,
}

impl ChannelSession {
    /// Create a session for `room_id` buffering at most `buffer` frames
    ///
    /// Returns the session and the receiving end the connection's writer
    /// task drains. The receiver yields `None` once the session is closed.
    pub fn new(room_id: impl Into<String>, buffer: usize) -> (Arc<Self>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let session = Arc::new(Self {
            id: SessionId::new(),
            room_id: room_id.into(),
            outbound: Mutex::new(Some(tx)),
        });
        (session, rx)
    }
}

impl Session for ChannelSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn room_id(&self) -> &str {
        &self.room_id
    }

    fn send(&self, frame: Frame) -> Result<(), DeliveryError> {
        let outbound = self.outbound.lock();
        let tx = outbound.as_ref().ok_or(DeliveryError::Closed)?;
        tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::BufferFull,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    fn close(&self) {
        self.outbound.lock().take();
    }

    fn is_closed(&self) -> bool {
        self.outbound.lock().as_ref().map_or(true, |tx| tx.is_closed())
    }
}

impl fmt::Debug for ChannelSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSession")
            .field("id", &self.id)
            .field("room_id", &self.room_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
