/**
 * Broadcast Hub
 *
 * The hub fans a message out to every session of a room and reclaims the
 * sessions that can no longer receive.
 *
 * # Algorithm
 *
 * 1. Snapshot the room's members with `RoomRegistry::members_of`
 * 2. Try one non-blocking send per member
 * 3. Collect the members whose send failed
 * 4. After the pass, `leave` each failed member on its behalf
 *
 * A failed send is taken as proof the connection is dead: there is no retry.
 * A client that comes back reconnects with a brand new session.
 *
 * # Ordering
 *
 * Broadcasts to the same room are serialized through a delivery gate, so
 * every member of a room sees the room's messages in the same order. Gates
 * are striped by a hash of the room id; rooms on different stripes never
 * wait on each other.
 */

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::realtime::registry::RoomRegistry;
use crate::backend::realtime::session::{Session, SessionId};
use crate::shared::{BroadcastMessage, ChatEvent};

/// Number of delivery gates shared by all rooms
const DELIVERY_STRIPES: usize = 64;

/// Outcome of one broadcast
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Room the broadcast targeted
    pub room_id: String,
    /// Number of sessions that accepted the frame
    pub delivered: usize,
    /// Sessions whose send failed and that have been removed from the room
    pub failed: Vec<SessionId>,
}

impl DeliveryReport {
    fn new(room_id: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
            ..Self::default()
        }
    }

    /// Number of sessions a delivery was attempted to
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed.len()
    }

    /// Whether the room had no members at broadcast time
    pub fn is_empty(&self) -> bool {
        self.attempted() == 0
    }
}

/// Fans chat frames out to the members of a room
#[derive(Debug)]
pub struct BroadcastHub {
    registry: Arc<RoomRegistry>,
    gates: Box<[Mutex<()>]>,
    hasher: RandomState,
}

impl BroadcastHub {
    /// Create a hub over an existing registry
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        let gates = (0..DELIVERY_STRIPES).map(|_| Mutex::new(())).collect();
        Self {
            registry,
            gates,
            hasher: RandomState::new(),
        }
    }

    /// The registry this hub reads membership from
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Register a session with a room
    ///
    /// See [`RoomRegistry::join`].
    pub fn join(&self, room_id: &str, session: Arc<dyn Session>) -> bool {
        self.registry.join(room_id, session)
    }

    /// Remove a session from a room
    ///
    /// See [`RoomRegistry::leave`].
    pub fn leave(&self, room_id: &str, session_id: SessionId) -> bool {
        self.registry.leave(room_id, session_id)
    }

    /// Number of sessions currently in a room
    pub fn room_presence(&self, room_id: &str) -> usize {
        self.registry.count(room_id)
    }

    /// Deliver a chat message to every member of `room_id`
    ///
    /// # Returns
    ///
    /// A [`DeliveryReport`]; an unknown room yields an empty report and is
    /// not created.
    pub fn broadcast(&self, room_id: &str, message: BroadcastMessage) -> DeliveryReport {
        self.broadcast_event(room_id, ChatEvent::from(message))
    }

    /// Deliver any chat frame to every member of `room_id`
    pub fn broadcast_event(&self, room_id: &str, event: ChatEvent) -> DeliveryReport {
        let frame = Arc::new(event);
        let mut report = DeliveryReport::new(room_id);

        {
            let _gate = self.gate_for(room_id).lock();
            let members = self.registry.members_of(room_id);

            for member in &members {
                match member.send(Arc::clone(&frame)) {
                    Ok(()) => report.delivered += 1,
                    Err(e) => {
                        tracing::warn!("[Realtime] Delivery to session {} in room {} failed: {}", member.id(), room_id, e);
                        report.failed.push(member.id());
                    }
                }
            }
        }

        for session_id in &report.failed {
            self.registry.leave(room_id, *session_id);
        }

        if !report.failed.is_empty() {
            tracing::info!(
                "[Realtime] Pruned {} dead sessions from room {} ({} remain)",
                report.failed.len(),
                room_id,
                self.registry.count(room_id)
            );
        }
        tracing::debug!("[Realtime] Broadcast to room {} reached {} sessions", room_id, report.delivered);
        report
    }

    fn gate_for(&self, room_id: &str) -> &Mutex<()> {
        let index = self.hasher.hash_one(room_id) as usize % self.gates.len();
        &self.gates[index]
    }
}
