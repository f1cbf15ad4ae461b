//! # Mongodoki Stop Handler
//!
//! File: cli/src/commands/stop.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Implements `mongodoki stop`: stop the named container, remove it, and
//! prune the volumes it leaves behind. Both steps are best effort, so a
//! container that is already gone does not turn teardown into a failure.
//!
//! ## Usage
//!
//! ```bash
//! # Tear down the default container
//! mongodoki stop
//!
//! # Tear down a specifically named one
//! mongodoki stop ci-mongo
//! ```
//!
use anyhow::Context;
use clap::Parser;
use mongodoki::core::config;
use mongodoki::{DokiOptions, Mongodoki, Result};
use tracing::info;

/// Defines the command-line arguments accepted by `mongodoki stop`.
#[derive(Parser, Debug)]
#[command(about = "Stop and remove a mongodoki container")]
pub struct StopArgs {
    /// Container name. Defaults to the configured name, then "mongodoki".
    container_name: Option<String>,
}

/// Handler for `mongodoki stop`.
pub async fn handle_stop(args: StopArgs) -> Result<()> {
    let file_config = config::load_config().context("Failed to load configuration")?;
    let name = args
        .container_name
        .or(file_config.container_name)
        .unwrap_or_else(|| config::DEFAULT_CONTAINER_NAME.to_string());
    info!("Stopping container '{}'.", name);

    let md = Mongodoki::new(DokiOptions {
        container_name: Some(name.clone()),
        ..Default::default()
    })?;
    md.stop_and_remove().await;

    println!("Container '{}' stopped and removed.", name);
    Ok(())
}
