//! # Mongodoki Docker Connection Helper
//!
//! File: cli/src/common/docker/connect.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! A single, standardized function, `connect_docker`, responsible for
//! establishing a connection to the local Docker daemon using default
//! settings provided by the `bollard` crate. It centralizes connection logic
//! and error handling for the engine implementation in
//! [`super::engine::DockerEngine`].
//!
use crate::core::error::{DokiError, Result};
use anyhow::{anyhow, Context};
use bollard::Docker;
use tracing::instrument;

/// Establishes a connection to the local Docker daemon using default settings.
///
/// Connects to the daemon at its standard location (e.g.
/// `/var/run/docker.sock` on Unix, named pipe on Windows) via
/// `bollard::Docker::connect_with_local_defaults`.
///
/// # Returns
///
/// * `Result<Docker>` - A `bollard::Docker` client instance on success.
///
/// # Errors
///
/// Returns an `Err` wrapping `DokiError::DockerApi` if the connection fails,
/// with context suggesting the daemon may not be running or accessible.
#[instrument]
pub fn connect_docker() -> Result<Docker> {
    Docker::connect_with_local_defaults()
        .map_err(|e| anyhow!(DokiError::DockerApi { source: e }))
        .context("Failed to connect to Docker daemon. Is it running and accessible?")
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    /// Requires a running Docker daemon, so it only runs with
    /// `cargo test -- --ignored`.
    #[test]
    #[ignore] // Ignored because it requires a running Docker daemon.
    fn test_connect_docker_success() {
        let result = connect_docker();
        assert!(
            result.is_ok(),
            "Should connect successfully if Docker is running"
        );
    }
}
