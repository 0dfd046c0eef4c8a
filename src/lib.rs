//! Top-Up WebApp Configuration Library
//!
//! Validated configuration resolution for the Steam top-up Telegram WebApp.
//!
//! This crate provides the core functionality for:
//! - Selecting one of the built-in deployment variants (fiat or crypto)
//! - Applying environment and command-line overrides
//! - Validating the merged result into an immutable snapshot
//! - Serializing the snapshot to JSON for the WebApp form layer

pub mod config;
