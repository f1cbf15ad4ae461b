//! # Mongodoki Error Types
//!
//! File: cli/src/core/error.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout mongodoki. It provides
//! a consistent approach to error management: a domain enum for the failures
//! callers are expected to tell apart, and an `anyhow`-based `Result` alias
//! for everything that only needs context and propagation.
//!
//! ## Architecture
//!
//! The error system consists of two components:
//! - `DokiError`: a custom error enum using `thiserror` for the specific
//!   failure kinds of the provisioning flow (engine API failures, container
//!   absence, connection timeout, dump-restore failures).
//! - `Result<T>`: a type alias for `anyhow::Result<T>`.
//!
//! Container absence is deliberately its own variant: the lifecycle code
//! treats "not found" as a normal state, not a failure, and checks for it by
//! downcasting:
//!
//! ```rust,ignore
//! match result {
//!     Ok(value) => value,
//!     Err(e) if e.downcast_ref::<DokiError>()
//!         .is_some_and(|de| matches!(de, DokiError::ContainerNotFound { .. })) =>
//!     {
//!         // absence is fine here, fall through to creation
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the mongodoki provisioning flow.
// No PartialEq derive because the wrapped source errors don't implement it.
#[derive(Error, Debug)]
pub enum DokiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Docker API interaction failed: {source}")]
    DockerApi {
        #[from]
        source: bollard::errors::Error,
    },

    #[error("Docker operation failed: {0}")]
    DockerOperation(String),

    #[error("Container '{name}' not found.")]
    ContainerNotFound { name: String },

    #[error("Unable to connect to '{db}' DB on the '{container}' container.")]
    ConnectionTimeout { db: String, container: String },

    #[error("Restoring DB is taking too much time. Try increasing the timeout.")]
    RestoreTimeout,

    #[error("Failed to copy dump data into the container: {0}")]
    RestoreCopy(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
