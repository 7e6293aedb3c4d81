//! Stream Directory Module
//!
//! Read-only view of stream lifecycle used by chat to decide whether a
//! stream accepts messages and who moderates it.

/// Stream lookup trait and its implementations
pub mod directory;

pub use directory::{InMemoryStreamDirectory, PgStreamDirectory, StreamDirectory, StreamInfo};
