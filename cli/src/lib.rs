//! # Mongodoki
//!
//! File: cli/src/lib.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Disposable MongoDB containers for integration tests. Mongodoki pulls the
//! `mongo` image, starts a throwaway container bound to localhost, waits
//! until the server actually answers, optionally restores a `mongodump`
//! directory into it, and hands back a connected [`mongodb::Database`].
//! When the test run is over, `stop_and_remove` tears everything down and
//! prunes the leftover volumes.
//!
//! ## Architecture
//!
//! - [`mongo::Mongodoki`]: the MongoDB facade most callers want.
//! - [`doki::Doki`]: the image-agnostic container lifecycle underneath
//!   (fresh provision vs. adopt-and-resume, best-effort teardown).
//! - [`common::docker`]: the [`ContainerEngine`] seam over the Docker
//!   daemon; injectable, so lifecycle behavior is unit-testable.
//! - [`core`]: configuration resolution, error types, and the retry
//!   budget shared by the connect and restore waits.
//!
//! The `mongodoki` binary wraps all of this in a small CLI (`mongodoki
//! start`, `mongodoki stop`).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mongodoki::{DokiOptions, Mongodoki};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> mongodoki::Result<()> {
//!     let md = Mongodoki::new(DokiOptions {
//!         tag: Some("4.2".to_string()),
//!         ..Default::default()
//!     })?;
//!     let db = md
//!         .acquire_database("testDB", Duration::from_secs(60), None)
//!         .await?;
//!     println!("collections: {:?}", db.list_collection_names().await?);
//!     md.stop_and_remove().await;
//!     Ok(())
//! }
//! ```
//!

/// Shared infrastructure: Docker plumbing and archive packaging.
pub mod common;
/// Core infrastructure: configuration, errors, retry budgets.
pub mod core;
/// Image-agnostic container lifecycle controller.
pub mod doki;
/// The MongoDB-aware provisioning facade.
pub mod mongo;

pub use crate::common::docker::{
    ContainerEngine, ContainerSnapshot, ContainerStatus, DockerEngine, ExecStatus,
};
pub use crate::core::config::{BoundPort, DokiConfig, DokiOptions, PortMapping, Volume};
pub use crate::core::error::{DokiError, Result};
pub use crate::doki::Doki;
pub use crate::mongo::{Mongodoki, DEFAULT_HOST_PORT, DEFAULT_IMAGE, DEFAULT_TIMEOUT};
