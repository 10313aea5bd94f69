//! Realm Export Core - Shared types library.
//!
//! This crate provides common types used across the exporter components:
//! - `cli` - The `realm-export` binary (config, admin API client, export logic)
//! - `integration-tests` - End-to-end tests against a mock admin API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and the user status enum

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
