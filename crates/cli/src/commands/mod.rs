//! Command implementations for the `realm-export` binary.

pub mod export;
