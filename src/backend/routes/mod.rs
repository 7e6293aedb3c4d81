//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and CORS
//! ├── chat_routes.rs  - Chat WebSocket and chat REST API
//! └── api_routes.rs   - Service endpoints (banner, health)
//! ```
//!
//! # Route Types
//!
//! ## Chat Routes
//!
//! - `GET /ws/chat/{stream_id}` - Chat WebSocket
//! - `POST /api/chat/{stream_id}/message` - Send a message
//! - `GET /api/chat/{stream_id}/messages` - Chat history
//! - `DELETE /api/chat/{stream_id}/message/{message_id}` - Delete a message
//! - `GET /api/chat/{stream_id}/presence` - Connected viewers
//!
//! ## Service Routes
//!
//! - `GET /` - Service banner
//! - `GET /api/health` - Health check

/// Main router creation
pub mod router;

/// Chat-related routes
pub mod chat_routes;

/// Service endpoints
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
