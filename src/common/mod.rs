//! # Common Components
//!
//! Shared utilities and data structures used across the client.
//!
//! ## Modules
//!
//! - [`messages`]: JSON payloads of the steganography service
//! - [`config`]: Configuration loading (TOML file, environment, defaults)
//! - [`logging`]: Logger setup for the binary

pub mod config;
pub mod logging;
pub mod messages;
