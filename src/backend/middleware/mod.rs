//! Middleware Module
//!
//! This module contains request-processing helpers that run before
//! handlers.
//!
//! - **`auth`** - `AuthUser` extractor for routes that require a signed-in user
//!
//! # Example
//!
//! ```rust,ignore
//! async fn handler(AuthUser(user): AuthUser) -> String {
//!     user.username
//! }
//! ```

pub mod auth;

pub use auth::{bearer_token, AuthUser, AuthenticatedUser};
