//! Chat WebSocket integration tests
//!
//! Serves the full router on a local `TcpListener` and talks to it with a
//! real WebSocket client.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::Value;
use streamchat::backend::routes::create_router;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::common::TestApp;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn serve(app: &TestApp) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = create_router(app.state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr, stream_id: &str, token: Option<&str>) -> WsStream {
    let url = match token {
        Some(token) => format!("ws://{}/ws/chat/{}?token={}", addr, stream_id, token),
        None => format!("ws://{}/ws/chat/{}", addr, stream_id),
    };
    let (ws, _) = connect_async(url).await.unwrap();
    ws
}

/// Read the next text frame as JSON
async fn read_json(ws: &mut WsStream) -> Value {
    loop {
        let msg = timeout(TIMEOUT, ws.next())
            .await
            .expect("timeout waiting for frame")
            .expect("stream closed")
            .expect("ws error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn wait_for_presence(app: &TestApp, stream_id: &str, expected: usize) {
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while app.state.hub.room_presence(stream_id) != expected {
        assert!(
            tokio::time::Instant::now() < deadline,
            "room {} has {} viewers, expected {}",
            stream_id,
            app.state.hub.room_presence(stream_id),
            expected
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_first_frame_is_connect_ack() {
    let app = TestApp::new();
    let addr = serve(&app).await;

    let mut ws = connect(addr, "42", None).await;

    let ack = read_json(&mut ws).await;
    assert_eq!(ack["type"], "system");
    assert_eq!(ack["message"], "Connected to chat");
    assert_eq!(ack["stream_id"], "42");
    assert_eq!(app.state.hub.room_presence("42"), 1);
}

#[tokio::test]
async fn test_message_reaches_other_viewer_and_presence_drops_on_close() {
    let app = TestApp::new();
    let addr = serve(&app).await;
    let token = app.state.auth.issue("alice").unwrap();

    let mut alice = connect(addr, "42", Some(&token)).await;
    let mut viewer = connect(addr, "42", None).await;
    read_json(&mut alice).await;
    read_json(&mut viewer).await;
    assert_eq!(app.state.hub.room_presence("42"), 2);

    alice.send(Message::text(r#"{"text":"gg"}"#)).await.unwrap();

    let frame = read_json(&mut viewer).await;
    assert_eq!(frame["type"], "chat_message");
    assert_eq!(frame["sender"], "alice");
    assert_eq!(frame["text"], "gg");
    assert_eq!(read_json(&mut alice).await["text"], "gg");
    app.wait_for_history(1).await;

    alice.close(None).await.unwrap();
    wait_for_presence(&app, "42", 1).await;

    drop(viewer);
    wait_for_presence(&app, "42", 0).await;
    assert!(!app.state.registry().contains_room("42"));
}

#[tokio::test]
async fn test_anonymous_send_gets_error_frame() {
    let app = TestApp::new();
    let addr = serve(&app).await;

    let mut ws = connect(addr, "42", None).await;
    read_json(&mut ws).await;

    ws.send(Message::text(r#"{"text":"hi"}"#)).await.unwrap();

    let frame = read_json(&mut ws).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["message"], "Sign in to chat");
    assert!(app.history.is_empty());
}

#[tokio::test]
async fn test_invalid_token_is_refused_before_upgrade() {
    let app = TestApp::new();
    let addr = serve(&app).await;

    let url = format!("ws://{}/ws/chat/42?token=forged", addr);
    match connect_async(url).await {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 401),
        other => panic!("expected a 401 handshake failure, got {:?}", other.map(|_| ())),
    }
    assert_eq!(app.state.hub.room_presence("42"), 0);
}
