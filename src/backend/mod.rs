//! Backend Module
//!
//! This module contains all server-side code for the stream chat service.
//! It is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`realtime`** - Room registry, broadcast hub, WebSocket handler
//! - **`chat`** - Chat history store and chat REST handlers
//! - **`streams`** - Stream directory (is a stream live, who owns it)
//! - **`auth`** - JWT token verification
//! - **`middleware`** - `AuthUser` extractor
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Route configuration and router assembly
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── realtime/       - Live chat fan-out
//! ├── chat/           - Chat history and REST handlers
//! ├── streams/        - Stream directory
//! ├── auth/           - Token verification
//! ├── middleware/     - Request extractors
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! └── error/          - Error types
//! ```
//!
//! # Message Flow
//!
//! 1. A viewer connects to `/ws/chat/{stream_id}` and joins the room
//! 2. A signed-in viewer sends `{"text": "..."}`
//! 3. The payload is validated and the stream is checked to be live
//! 4. `BroadcastHub::broadcast` delivers it to every session in the room,
//!    pruning sessions that can no longer receive
//! 5. The message is appended to chat history in the background

/// Live chat fan-out
pub mod realtime;

/// Chat history and REST handlers
pub mod chat;

/// Stream directory
pub mod streams;

/// Authentication
pub mod auth;

/// Request extractors
pub mod middleware;

/// Server initialization and state
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;
