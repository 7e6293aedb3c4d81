/**
 * Room Registry
 *
 * The registry maps a room identifier (the stream id) to the sessions
 * currently connected to that room's chat. It is the single source of truth
 * for membership; the broadcast hub only ever reads it through
 * `members_of` snapshots.
 *
 * # Invariants
 *
 * - A room is present if and only if it has at least one member. Rooms are
 *   created by the first `join` and pruned by the last `leave`, under the
 *   same lock as the membership change, so an empty room is never visible.
 * - A session id appears at most once per room. A duplicate `join` is
 *   rejected and leaves the room untouched.
 * - A session removed by `leave` is closed before `leave` returns.
 *
 * # Concurrency
 *
 * Rooms live in a sharded `DashMap`, so operations on rooms in different
 * shards never contend, while every operation on one room is mutually
 * exclusive with every other operation on it. No lock is held while a frame
 * is delivered.
 */

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::backend::realtime::session::{Session, SessionId};

/// Registry of chat rooms and their connected sessions
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Room ID → members, in join order
    rooms: DashMap<String, Vec<Arc<dyn Session>>>,
}

impl RoomRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `session` as a member of `room_id`
    ///
    /// Creates the room if it does not exist yet.
    ///
    /// # Returns
    ///
    /// `true` if the session joined; `false` if a session with the same id
    /// is already a member or the session is already closed. A rejected
    /// join changes nothing.
    pub fn join(&self, room_id: &str, session: Arc<dyn Session>) -> bool {
        if session.is_closed() {
            tracing::debug!("[Realtime] Refusing closed session {} for room {}", session.id(), room_id);
            return false;
        }

        let mut members = self.rooms.entry(room_id.to_string()).or_default();
        if members.iter().any(|member| member.id() == session.id()) {
            tracing::debug!("[Realtime] Session {} already in room {}", session.id(), room_id);
            return false;
        }

        members.push(session);
        tracing::debug!("[Realtime] Room {} now has {} members", room_id, members.len());
        true
    }

    /// Remove the session `session_id` from `room_id`
    ///
    /// Unknown rooms and non-members are a no-op. Removing the last member
    /// prunes the room. The removed session is closed.
    ///
    /// # Returns
    ///
    /// `true` if the session was a member and has been removed
    pub fn leave(&self, room_id: &str, session_id: SessionId) -> bool {
        let removed = match self.rooms.entry(room_id.to_string()) {
            Entry::Occupied(mut room) => {
                let members = room.get_mut();
                let removed = members
                    .iter()
                    .position(|member| member.id() == session_id)
                    .map(|index| members.remove(index));
                if members.is_empty() {
                    room.remove();
                    tracing::debug!("[Realtime] Room {} is empty, pruned", room_id);
                }
                removed
            }
            Entry::Vacant(_) => None,
        };

        match removed {
            Some(session) => {
                session.close();
                true
            }
            None => false,
        }
    }

    /// Point-in-time copy of a room's members, in join order
    ///
    /// The copy is detached from the registry: callers may iterate it while
    /// sessions keep joining and leaving. Unknown rooms yield an empty list.
    pub fn members_of(&self, room_id: &str) -> Vec<Arc<dyn Session>> {
        self.rooms
            .get(room_id)
            .map(|members| members.value().clone())
            .unwrap_or_default()
    }

    /// Number of members in a room (0 for unknown rooms)
    pub fn count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, |members| members.len())
    }

    /// Whether a room is currently present
    pub fn contains_room(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Number of rooms currently present
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Total number of sessions across all rooms
    pub fn session_count(&self) -> usize {
        self.rooms.iter().map(|room| room.value().len()).sum()
    }

    /// Close every session and drop every room
    ///
    /// Called once at process shutdown.
    ///
    /// # Returns
    ///
    /// Number of sessions that were closed
    pub fn shutdown(&self) -> usize {
        let mut closing = Vec::new();
        self.rooms.retain(|_, members| {
            closing.append(members);
            false
        });

        for session in &closing {
            session.close();
        }
        tracing::info!("[Realtime] Registry shut down, closed {} sessions", closing.len());
        closing.len()
    }
}
