//! # Mongodoki Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Shared infrastructure used by the provisioning flow: the Docker plumbing
//! and the archive utilities that package dump directories for upload. This
//! keeps the `bollard`-facing code separated from the lifecycle and database
//! logic in `doki` and `mongo`.
//!
//! ## Architecture
//!
//! - **`archive`**: Builds gzipped tarballs of dump directories. Includes
//!   the `tar` submodule.
//! - **`docker`**: Daemon connection, the [`docker::ContainerEngine`] seam,
//!   state classification, and container creation plumbing.
//!

/// Utilities for handling archive files (e.g., tarballs).
pub mod archive;
/// Core utilities for interacting with the Docker daemon.
pub mod docker;
