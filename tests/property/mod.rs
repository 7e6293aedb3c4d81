//! Property-based tests

/// Registry membership invariants under arbitrary join/leave sequences
pub mod registry_proptest;
