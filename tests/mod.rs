//! Test suite for streamchat
//!
//! This module organizes all tests

#[cfg(feature = "ssr")]
pub mod integration;
#[cfg(feature = "ssr")]
pub mod property;
