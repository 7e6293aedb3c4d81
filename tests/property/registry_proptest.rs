//! Property-based tests for room membership
//!
//! Random join/leave/kill/broadcast sequences over a few rooms are checked
//! against a plain model: a room's count equals sessions joined minus
//! sessions removed, and a room exists exactly when that count is non-zero.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;
use streamchat::backend::realtime::{BroadcastHub, Frame, RoomRegistry, Session};
use streamchat::shared::BroadcastMessage;
use tokio::sync::mpsc;

use crate::common::session;

const ROOMS: [&str; 3] = ["42", "7", "lobby"];

#[derive(Debug, Clone)]
enum Op {
    Join(usize),
    /// Leave the n-th member (modulo) of a room
    Leave(usize, usize),
    /// Drop the receiver of the n-th member of a room
    Kill(usize, usize),
    Broadcast(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..ROOMS.len()).prop_map(Op::Join),
        2 => (0..ROOMS.len(), any::<usize>()).prop_map(|(r, n)| Op::Leave(r, n)),
        1 => (0..ROOMS.len(), any::<usize>()).prop_map(|(r, n)| Op::Kill(r, n)),
        1 => (0..ROOMS.len()).prop_map(Op::Broadcast),
    ]
}

struct Member {
    session: Arc<dyn Session>,
    rx: Option<mpsc::Receiver<Frame>>,
}

proptest! {
    #[test]
    fn test_count_matches_model(ops in proptest::collection::vec(op(), 1..80)) {
        let hub = BroadcastHub::new(Arc::new(RoomRegistry::new()));
        let mut model: HashMap<&str, Vec<Member>> = HashMap::new();

        for op in ops {
            match op {
                Op::Join(r) => {
                    let room = ROOMS[r];
                    let (s, rx) = session(room, 64);
                    prop_assert!(hub.join(room, Arc::clone(&s)));
                    model.entry(room).or_default().push(Member { session: s, rx: Some(rx) });
                }
                Op::Leave(r, n) => {
                    let room = ROOMS[r];
                    let members = model.entry(room).or_default();
                    if members.is_empty() {
                        continue;
                    }
                    let member = members.remove(n % members.len());
                    prop_assert!(hub.leave(room, member.session.id()));
                    prop_assert!(member.session.is_closed());
                }
                Op::Kill(r, n) => {
                    let members = model.entry(ROOMS[r]).or_default();
                    if members.is_empty() {
                        continue;
                    }
                    let index = n % members.len();
                    members[index].rx = None;
                }
                Op::Broadcast(r) => {
                    let room = ROOMS[r];
                    let report = hub.broadcast(room, BroadcastMessage::new(room, "bot", "tick", "#9146FF"));
                    let members = model.entry(room).or_default();
                    let dead = members.iter().filter(|m| m.rx.is_none()).count();
                    prop_assert_eq!(report.failed.len(), dead);
                    prop_assert_eq!(report.delivered, members.len() - dead);
                    members.retain(|m| m.rx.is_some());
                    // Keep buffers from filling up
                    for member in members.iter_mut() {
                        if let Some(rx) = member.rx.as_mut() {
                            while rx.try_recv().is_ok() {}
                        }
                    }
                }
            }

            for room in ROOMS {
                let expected = model.get(room).map_or(0, Vec::len);
                prop_assert_eq!(hub.registry().count(room), expected);
                prop_assert_eq!(hub.registry().contains_room(room), expected > 0);
            }
        }
    }

    #[test]
    fn test_duplicate_join_never_double_counts(joins in 1usize..10) {
        let registry = RoomRegistry::new();
        let (s, _rx) = session("42", 4);
        prop_assert!(registry.join("42", Arc::clone(&s)));
        for _ in 1..joins {
            prop_assert!(!registry.join("42", Arc::clone(&s)));
        }
        prop_assert_eq!(registry.count("42"), 1);
    }
}
