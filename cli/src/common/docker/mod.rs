//! # Mongodoki Docker Module Interface
//!
//! File: cli/src/common/docker/mod.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! This module is the public interface to the Docker plumbing used by the
//! provisioning flow. It organizes the `bollard`-facing code into focused
//! submodules and re-exports the types the rest of the crate works with.
//!
//! ## Architecture
//!
//! - **`connect`**: Establishes the connection to the local Docker daemon.
//! - **`engine`**: The [`ContainerEngine`] trait and its `bollard`-backed
//!   implementation, [`DockerEngine`]. Everything above this module talks
//!   to the daemon exclusively through the trait.
//! - **`state`**: Classifies inspection results into [`ContainerStatus`].
//! - **`lifecycle`**: Assembles container creation requests and the
//!   best-effort helper used by teardown paths.
//!

/// Handles establishing a connection to the local Docker daemon.
pub mod connect;
/// Defines the container-engine seam and its `bollard` implementation.
pub mod engine;
/// Scripted recording engine for unit tests.
#[cfg(test)]
pub mod fake;
/// Builds container creation requests; best-effort teardown helper.
pub mod lifecycle;
/// Classifies container state for lifecycle decisions.
pub mod state;

// --- Re-exports for easier access from other parts of the application ---

pub use engine::{ContainerEngine, ContainerSnapshot, DockerEngine, ExecStatus};
pub use state::ContainerStatus;
