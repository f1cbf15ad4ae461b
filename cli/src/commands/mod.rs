//! # Mongodoki Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! The command handlers behind the `mongodoki` binary. Each command defines
//! its own arguments structure and an async handler that `main.rs` routes
//! to:
//!
//! - `start`: provision a MongoDB container and wait until it is usable
//! - `stop`: stop and remove a container, pruning its volumes
//!

/// Provisions a disposable MongoDB container (`mongodoki start`).
pub mod start;
/// Stops and removes a container (`mongodoki stop`).
pub mod stop;
