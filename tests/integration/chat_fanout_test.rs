//! Chat fan-out integration tests
//!
//! Exercises the registry and hub together the way the socket handler
//! does, including concurrent joins, leaves and broadcasts.

use std::sync::Arc;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use streamchat::backend::chat::ChatStore;
use streamchat::backend::realtime::{BroadcastHub, RoomRegistry, Session};
use streamchat::shared::{BroadcastMessage, ChatEvent};

use crate::common::{next_chat, session, TestApp};

fn hub() -> BroadcastHub {
    BroadcastHub::new(Arc::new(RoomRegistry::new()))
}

#[tokio::test]
async fn test_two_viewers_both_receive() {
    let hub = hub();
    let (a, mut a_rx) = session("42", 8);
    let (b, mut b_rx) = session("42", 8);
    assert!(hub.join("42", a));
    assert!(hub.join("42", b));

    let report = hub.broadcast("42", BroadcastMessage::new("42", "alice", "hi", "#9146FF"));

    assert_eq!(report.delivered, 2);
    assert!(report.failed.is_empty());
    assert_eq!(next_chat(&mut a_rx).text, "hi");
    assert_eq!(next_chat(&mut b_rx).text, "hi");
    assert_eq!(hub.room_presence("42"), 2);
}

#[tokio::test]
async fn test_dead_viewer_is_pruned_and_room_removed() {
    let hub = hub();
    let (a, a_rx) = session("42", 8);
    let a_id = a.id();
    assert!(hub.join("42", a));
    drop(a_rx);

    let report = hub.broadcast("42", BroadcastMessage::new("42", "alice", "hi", "#9146FF"));

    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed, vec![a_id]);
    assert_eq!(hub.room_presence("42"), 0);
    crate::assert_presence!(hub.registry(), "42", 0);
}

#[tokio::test]
async fn test_k_dead_of_n() {
    let hub = hub();
    let mut live = Vec::new();
    for i in 0..5 {
        let (s, rx) = session("42", 8);
        assert!(hub.join("42", s));
        if i % 2 == 0 {
            live.push(rx);
        }
    }

    let report = hub.broadcast("42", BroadcastMessage::new("42", "alice", "hi", "#9146FF"));

    assert_eq!(report.delivered, 3);
    assert_eq!(report.failed.len(), 2);
    crate::assert_presence!(hub.registry(), "42", 3);
    for rx in &mut live {
        assert_eq!(next_chat(rx).sender, "alice");
    }
}

#[tokio::test]
async fn test_broadcast_to_unknown_room_creates_nothing() {
    let hub = hub();
    let report = hub.broadcast("nobody-here", BroadcastMessage::new("nobody-here", "alice", "hi", "#9146FF"));

    assert!(report.is_empty());
    crate::assert_presence!(hub.registry(), "nobody-here", 0);
    assert_eq!(hub.registry().room_count(), 0);
}

#[tokio::test]
async fn test_leave_unknown_room_is_noop() {
    let hub = hub();
    let (a, _a_rx) = session("42", 8);
    assert!(!hub.leave("42", a.id()));
    assert_eq!(hub.registry().room_count(), 0);
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let hub = hub();
    let (a, mut a_rx) = session("42", 8);
    let (b, mut b_rx) = session("7", 8);
    hub.join("42", a);
    hub.join("7", b);

    hub.broadcast("42", BroadcastMessage::new("42", "alice", "only 42", "#9146FF"));

    assert_eq!(next_chat(&mut a_rx).text, "only 42");
    assert!(b_rx.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_join_leave_leaves_no_ghosts() {
    let hub = Arc::new(hub());
    let mut tasks = Vec::new();

    for worker in 0..8 {
        let hub = Arc::clone(&hub);
        tasks.push(tokio::spawn(async move {
            let room = format!("room-{}", worker % 2);
            let mut kept = Vec::new();
            for i in 0..200 {
                let (s, rx) = session(&room, 256);
                let id = s.id();
                assert!(hub.join(&room, s));
                if i % 4 == 0 {
                    kept.push(rx);
                } else {
                    assert!(hub.leave(&room, id));
                }
                tokio::task::yield_now().await;
            }
            kept
        }));
    }

    let broadcaster = {
        let hub = Arc::clone(&hub);
        tokio::spawn(async move {
            for i in 0..200 {
                let room = format!("room-{}", i % 2);
                hub.broadcast(&room, BroadcastMessage::new(room.as_str(), "bot", "tick", "#9146FF"));
                tokio::task::yield_now().await;
            }
        })
    };

    let mut kept = Vec::new();
    for task in tasks {
        kept.extend(task.await.unwrap());
    }
    broadcaster.await.unwrap();

    // 8 workers keep 50 sessions each, split over two rooms
    assert_eq!(kept.len(), 400);
    assert_eq!(hub.room_presence("room-0"), 200);
    assert_eq!(hub.room_presence("room-1"), 200);
    assert_eq!(hub.registry().session_count(), 400);

    // Dropping every receiver kills every session; one broadcast per room prunes them all
    drop(kept);
    let r0 = hub.broadcast("room-0", BroadcastMessage::new("room-0", "bot", "bye", "#9146FF"));
    let r1 = hub.broadcast("room-1", BroadcastMessage::new("room-1", "bot", "bye", "#9146FF"));
    assert_eq!(r0.failed.len() + r1.failed.len(), 400);
    crate::assert_presence!(hub.registry(), "room-0", 0);
    crate::assert_presence!(hub.registry(), "room-1", 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_broadcasts_keep_room_order() {
    let hub = Arc::new(hub());
    let (a, mut a_rx) = session("42", 1024);
    let (b, mut b_rx) = session("42", 1024);
    hub.join("42", a);
    hub.join("42", b);

    let mut tasks = Vec::new();
    for sender in 0..4 {
        let hub = Arc::clone(&hub);
        tasks.push(tokio::spawn(async move {
            for i in 0..100 {
                let text = format!("{}-{}", sender, i);
                hub.broadcast("42", BroadcastMessage::new("42", "bot", text, "#9146FF"));
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let mut a_seen = Vec::new();
    let mut b_seen = Vec::new();
    for _ in 0..400 {
        a_seen.push(next_chat(&mut a_rx).text);
        b_seen.push(next_chat(&mut b_rx).text);
    }
    assert_eq!(a_seen, b_seen);
}

#[tokio::test]
async fn test_shutdown_closes_every_session() {
    let app = TestApp::new();
    let (a, mut a_rx) = session("42", 8);
    let (b, mut b_rx) = session("7", 8);
    app.state.hub.join("42", Arc::clone(&a));
    app.state.hub.join("7", Arc::clone(&b));

    assert_eq!(app.state.registry().shutdown(), 2);

    assert!(a.is_closed());
    assert!(b.is_closed());
    assert_matches!(a_rx.recv().await, None);
    assert_matches!(b_rx.recv().await, None);
    assert_eq!(app.state.registry().room_count(), 0);
}

#[tokio::test]
async fn test_socket_message_reaches_viewers_and_history() {
    let app = TestApp::new();
    let (a, mut a_rx) = session("42", 8);
    let (b, mut b_rx) = session("42", 8);
    app.state.hub.join("42", Arc::clone(&a));
    app.state.hub.join("42", b);

    let report = streamchat::backend::realtime::socket::handle_inbound(
        &app.state,
        &a,
        Some("alice"),
        r#"{"text":"gg"}"#,
    )
    .await
    .unwrap();
    assert_eq!(report.delivered, 2);

    let to_a = next_chat(&mut a_rx);
    let to_b = next_chat(&mut b_rx);
    assert_eq!(to_a, to_b);
    assert_eq!(to_a.sender, "alice");

    app.wait_for_history(1).await;
    let history = app.history.list("42", 10, 0).await.unwrap();
    assert_eq!(history[0].message, "gg");
    assert_eq!(history[0].timestamp, to_a.timestamp);
}

#[tokio::test]
async fn test_socket_message_to_offline_stream_is_rejected() {
    let app = TestApp::new();
    app.streams.set_live("42", false);
    let (a, mut a_rx) = session("42", 8);
    app.state.hub.join("42", Arc::clone(&a));

    let report = streamchat::backend::realtime::socket::handle_inbound(
        &app.state,
        &a,
        Some("alice"),
        r#"{"text":"gg"}"#,
    )
    .await;

    assert!(report.is_none());
    assert_matches!(a_rx.try_recv().unwrap().as_ref(), ChatEvent::Error { message } if message.contains("offline"));
    assert!(app.history.is_empty());
}
