//! Realm Export library.
//!
//! This crate provides the exporter functionality as a library,
//! allowing it to be tested and reused. The `realm-export` binary in
//! `main.rs` is a thin clap wrapper around [`commands::export`].
//!
//! # Security
//!
//! The configured Atlas programmatic API key grants admin access to the
//! whole project group. Keep it out of logs and shell history; the config
//! loader stores it as a [`secrecy::SecretString`] and redacts it from
//! `Debug` output.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
pub mod config;
pub mod export;
pub mod realm;
