//! Authentication Module
//!
//! Chat only needs to know who is speaking. This module verifies bearer
//! JWT tokens and yields the username they were issued to. Registration and
//! login live elsewhere; `TokenAuthority::issue` exists for tooling and tests.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs      - Module exports and documentation
//! └── sessions.rs - JWT token management
//! ```
//!
//! # Security
//!
//! - Tokens are HMAC-signed with `JWT_SECRET`
//! - Tokens expire after 30 minutes
//! - Invalid credentials return 401 with no detail about why

/// JWT token generation and validation
pub mod sessions;

// Re-export commonly used types
pub use sessions::{AuthError, Claims, TokenAuthority};
