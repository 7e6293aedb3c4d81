//! Integration tests

/// Room membership and fan-out
pub mod chat_fanout_test;


/// The chat WebSocket over a real TCP listener
pub mod websocket_test;
