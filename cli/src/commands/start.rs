//! # Mongodoki Start Handler
//!
//! File: cli/src/commands/start.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Implements `mongodoki start`: provision a MongoDB container, wait until
//! the server answers, optionally restore a dump, and print how to reach
//! it. Flags override the optional configuration files, which override the
//! built-in defaults (`mongo:latest`, container `mongodoki`, port 27017,
//! database `testDB`).
//!
//! ## Usage
//!
//! ```bash
//! # All defaults: mongo:latest as 'mongodoki' on 127.0.0.1:27017
//! mongodoki start
//!
//! # A pinned tag on another port, waiting for a specific database
//! mongodoki start -t 4.2 -p 27018 -d appDB
//!
//! # Persistent data under ~/mongo-data, restored from a mongodump dir
//! mongodoki start -D ~/mongo-data --dump ./dump
//!
//! # Resume yesterday's container instead of recreating it
//! mongodoki start --reuse
//! ```
//!
use anyhow::Context;
use clap::Parser;
use mongodoki::core::config::{self, Volume};
use mongodoki::{DokiOptions, Mongodoki, Result, DEFAULT_HOST_PORT};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Database name the start command waits for when none is configured.
const DEFAULT_DB_NAME: &str = "testDB";
/// Where MongoDB keeps its data inside the container.
const DATA_CONTAINER_DIR: &str = "/data/db";

/// Defines the command-line arguments accepted by `mongodoki start`.
#[derive(Parser, Debug)]
#[command(about = "Start a disposable MongoDB container and wait until it is ready")]
pub struct StartArgs {
    /// Image tag to run (e.g. "4.2"). Defaults to "latest".
    #[arg(short, long)]
    tag: Option<String>,

    /// Container name. Defaults to "mongodoki".
    #[arg(short, long)]
    name: Option<String>,

    /// Host port to bind on 127.0.0.1. Defaults to 27017.
    #[arg(short, long)]
    port: Option<u16>,

    /// Database name to open once the server is up. Defaults to "testDB".
    #[arg(short = 'd', long = "dbname")]
    db_name: Option<String>,

    /// Host directory mounted at /data/db, for data that should survive
    /// the container.
    #[arg(short = 'D', long = "dbdata", value_name = "DIR")]
    data_dir: Option<String>,

    /// mongodump output directory to restore into the fresh container.
    #[arg(long, value_name = "DIR")]
    dump: Option<String>,

    /// Resume an existing same-named container instead of recreating it.
    /// Skips the dump restore.
    #[arg(long)]
    reuse: bool,

    /// Seconds to wait for the server (and for the restore) before giving up.
    #[arg(long, default_value = "60")]
    timeout: u64,
}

/// Handler for `mongodoki start`. Merges flags over file configuration,
/// provisions the container, and reports the connection details.
pub async fn handle_start(args: StartArgs) -> Result<()> {
    info!("Handling start command: {:?}", args);

    let file_config = config::load_config().context("Failed to load configuration")?;

    // Flags win over the config files, which win over built-in defaults.
    let tag = args
        .tag
        .or(file_config.tag)
        .unwrap_or_else(|| config::DEFAULT_TAG.to_string());
    let name = args
        .name
        .or(file_config.container_name)
        .unwrap_or_else(|| config::DEFAULT_CONTAINER_NAME.to_string());
    let port = args.port.or(file_config.host_port).unwrap_or(DEFAULT_HOST_PORT);
    let db_name = args
        .db_name
        .or(file_config.db_name)
        .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
    let data_dir = args
        .data_dir
        .or(file_config.data_dir)
        .map(|dir| shellexpand::tilde(&dir).into_owned());

    let volume = data_dir.map(|host_dir| Volume {
        host_dir,
        container_dir: DATA_CONTAINER_DIR.to_string(),
    });
    let dump_path = args
        .dump
        .map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned()));

    let options = DokiOptions {
        image: file_config.image,
        tag: Some(tag.clone()),
        container_name: Some(name.clone()),
        host_port: Some(port),
        ports: None,
        reuse: args.reuse,
        volume,
    };

    println!(
        "Starting MongoDB container '{}' (tag: {}, port: {})...",
        name, tag, port
    );

    let md = Mongodoki::new(options)?;
    let db = md
        .acquire_database(&db_name, Duration::from_secs(args.timeout), dump_path.as_deref())
        .await?;

    // One real command against the database before declaring victory.
    let collections = db
        .list_collection_names()
        .await
        .context("Connected, but listing collections failed")?;
    info!(
        "Database '{}' reports {} collection(s).",
        db_name,
        collections.len()
    );

    println!("MongoDB is up.");
    println!("  Container: {}", name);
    println!("  Database:  {} (mongodb://127.0.0.1:{}/{})", db_name, port, db_name);
    println!("Tear it down with: mongodoki stop {}", name);
    Ok(())
}

// --- Unit Tests ---
// Focus on argument parsing; the provisioning flow itself is covered by the
// library's unit tests and the ignored Docker integration suite.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_args_defaults() {
        let args = StartArgs::try_parse_from(["start"]).unwrap();
        assert!(args.tag.is_none());
        assert!(args.name.is_none());
        assert!(args.port.is_none());
        assert!(args.db_name.is_none());
        assert!(args.data_dir.is_none());
        assert!(args.dump.is_none());
        assert!(!args.reuse);
        assert_eq!(args.timeout, 60);
    }

    #[test]
    fn test_start_args_all_flags() {
        let args = StartArgs::try_parse_from([
            "start", "-t", "4.2", "-n", "ci-mongo", "-p", "27018", "-d", "appDB", "-D",
            "~/mongo-data", "--dump", "./dump", "--reuse", "--timeout", "120",
        ])
        .unwrap();
        assert_eq!(args.tag.as_deref(), Some("4.2"));
        assert_eq!(args.name.as_deref(), Some("ci-mongo"));
        assert_eq!(args.port, Some(27018));
        assert_eq!(args.db_name.as_deref(), Some("appDB"));
        assert_eq!(args.data_dir.as_deref(), Some("~/mongo-data"));
        assert_eq!(args.dump.as_deref(), Some("./dump"));
        assert!(args.reuse);
        assert_eq!(args.timeout, 120);
    }

    #[test]
    fn test_start_args_rejects_invalid_port() {
        let result = StartArgs::try_parse_from(["start", "-p", "notaport"]);
        assert!(result.is_err());
    }
}
