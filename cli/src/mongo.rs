//! # Mongodoki MongoDB Facade (`mongo`)
//!
//! File: cli/src/mongo.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! [`Mongodoki`] turns the generic container lifecycle in [`crate::doki`]
//! into a one-call MongoDB provisioner: bring a `mongo` container up, wait
//! until the server actually answers, optionally restore a database dump
//! into it, and hand back a connected [`mongodb::Database`].
//!
//! ## Architecture
//!
//! [`Mongodoki::acquire_database`] runs three stages in order:
//!
//! 1. **Provision** via [`crate::doki::Doki::ensure_running`].
//! 2. **Wait for readiness**: ping the server over the first bound host
//!    port, retrying on a fixed interval derived from the caller's timeout.
//!    `mongod` accepts TCP connections well before it serves commands, so
//!    only a successful `ping` counts.
//! 3. **Import** (fresh containers only): package the dump directory as a
//!    tarball, unpack it into the container at `/dbdata`, run
//!    `mongorestore /dbdata` in the container, and poll the exec until it
//!    finishes. A reused container keeps its data; the import is skipped so
//!    it cannot double-restore.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mongodoki::{DokiOptions, Mongodoki};
//! use std::time::Duration;
//!
//! # async fn run() -> mongodoki::Result<()> {
//! let md = Mongodoki::new(DokiOptions::default())?;
//! let db = md
//!     .acquire_database("testDB", Duration::from_secs(60), None)
//!     .await?;
//! println!("collections: {:?}", db.list_collection_names().await?);
//! md.stop_and_remove().await;
//! # Ok(())
//! # }
//! ```
//!
use crate::common::archive::tar::create_dump_archive;
use crate::common::docker::engine::ContainerEngine;
use crate::core::config::{DokiConfig, DokiOptions};
use crate::core::error::{DokiError, Result};
use crate::core::retry::{retry, Backoff, RetryBudget};
use crate::doki::Doki;
use anyhow::anyhow;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Image used when the options do not name one.
pub const DEFAULT_IMAGE: &str = "mongo";
/// Host port bound when the options specify no ports at all.
pub const DEFAULT_HOST_PORT: u16 = 27017;
/// Timeout suitable for most test setups, shared by connect and restore.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection attempts are spread evenly across the caller's timeout.
const CONNECT_MAX_RETRIES: u32 = 60;
/// Restore polls are spread evenly across the caller's timeout.
const RESTORE_MAX_RETRIES: u32 = 30;
/// Directory the dump contents land in inside the container.
const DUMP_TARGET_DIR: &str = "dbdata";

/// Disposable MongoDB provisioner built on [`Doki`].
pub struct Mongodoki {
    doki: Doki,
}

impl Mongodoki {
    /// Creates a provisioner talking to the local Docker daemon. Fills in
    /// the MongoDB defaults (`mongo` image, port 27017) for any option the
    /// caller left unset.
    pub fn new(mut options: DokiOptions) -> Result<Self> {
        apply_mongo_defaults(&mut options);
        Ok(Self {
            doki: Doki::new(options)?,
        })
    }

    /// Creates a provisioner on an injected engine, for tests.
    pub fn with_engine(
        mut options: DokiOptions,
        engine: Arc<dyn ContainerEngine>,
    ) -> Result<Self> {
        apply_mongo_defaults(&mut options);
        Ok(Self {
            doki: Doki::with_engine(options, engine)?,
        })
    }

    /// The underlying lifecycle controller.
    pub fn doki(&self) -> &Doki {
        &self.doki
    }

    /// The resolved provisioning configuration.
    pub fn config(&self) -> &DokiConfig {
        self.doki.config()
    }

    /// Provisions the container, waits until MongoDB answers a ping, and
    /// returns a handle to `db_name`. With a `dump_path`, a freshly created
    /// container gets the dump restored via `mongorestore` before the
    /// handle is returned; a reused container skips the import.
    ///
    /// The same `timeout` bounds both the connection wait and the restore
    /// wait, each spread over its own fixed-interval retry schedule.
    ///
    /// ## Errors
    ///
    /// * [`DokiError::ConnectionTimeout`] when the server never answers
    ///   within the timeout.
    /// * [`DokiError::RestoreCopy`] when the dump cannot be packaged or
    ///   copied into the container.
    /// * [`DokiError::RestoreTimeout`] when `mongorestore` is still running
    ///   after the timeout.
    /// * Provisioning errors from the fresh/adopt flows.
    #[instrument(skip(self, dump_path), fields(container = %self.doki.config().container_name, db = %db_name))]
    pub async fn acquire_database(
        &self,
        db_name: &str,
        timeout: Duration,
        dump_path: Option<&Path>,
    ) -> Result<Database> {
        self.doki.ensure_running().await?;
        let client = self.wait_until_reachable(db_name, timeout).await?;

        if !self.config().reuse {
            if let Some(dump) = dump_path {
                self.import_dump(dump, timeout).await?;
            }
        } else if dump_path.is_some() {
            debug!("Reusing an existing container; skipping the dump import.");
        }

        Ok(client.database(db_name))
    }

    /// Stops the container without removing it. Best effort.
    pub async fn stop(&self) {
        self.doki.stop().await
    }

    /// Removes the container and prunes unused volumes. Best effort.
    pub async fn remove(&self) {
        self.doki.remove().await
    }

    /// Stops and then removes the container. Best effort.
    pub async fn stop_and_remove(&self) {
        self.doki.stop_and_remove().await
    }

    /// Pings the server until it answers or the retry budget runs out.
    async fn wait_until_reachable(&self, db_name: &str, timeout: Duration) -> Result<Client> {
        let config = self.doki.config();
        let port = config.first_host_port().ok_or_else(|| {
            anyhow!(DokiError::Config(
                "no host port bound for the database".to_string()
            ))
        })?;

        let budget = RetryBudget::from_timeout(timeout, CONNECT_MAX_RETRIES);
        debug!(
            "Waiting for MongoDB on 127.0.0.1:{} (up to {} attempts every {:?}).",
            port,
            budget.max_attempts(),
            budget.interval
        );

        match retry(&budget, Backoff::Fixed, || try_connect(port, budget.interval)).await {
            Ok(client) => {
                info!("MongoDB is reachable on 127.0.0.1:{}.", port);
                Ok(client)
            }
            Err(exhausted) => {
                warn!(
                    "Giving up after {} connection attempts: {:#}",
                    exhausted.attempts, exhausted.last_error
                );
                Err(anyhow!(DokiError::ConnectionTimeout {
                    db: db_name.to_string(),
                    container: config.container_name.clone(),
                }))
            }
        }
    }

    /// Copies the dump directory into the container and runs `mongorestore`
    /// over it, polling the exec until it finishes.
    async fn import_dump(&self, dump_path: &Path, timeout: Duration) -> Result<()> {
        let name = self.doki.config().container_name.clone();
        info!(
            "Importing dump from '{}' into container '{}'.",
            dump_path.display(),
            name
        );

        let archive = create_dump_archive(dump_path, DUMP_TARGET_DIR)
            .map_err(|e| anyhow!(DokiError::RestoreCopy(format!("{:#}", e))))?;
        let engine = Arc::clone(self.doki.engine());
        engine
            .upload_archive(&name, archive)
            .await
            .map_err(|e| anyhow!(DokiError::RestoreCopy(format!("{:#}", e))))?;

        let cmd = vec!["mongorestore".to_string(), format!("/{}", DUMP_TARGET_DIR)];
        let exec_id = engine.create_exec(&name, &cmd).await?;
        engine.start_exec(&exec_id).await?;

        let budget = RetryBudget::from_timeout(timeout, RESTORE_MAX_RETRIES);
        let outcome = retry(&budget, Backoff::Fixed, || {
            let engine = Arc::clone(&engine);
            let exec_id = exec_id.clone();
            async move {
                // A still-running restore is the retryable case; engine
                // failures pass through and abort below.
                match engine.inspect_exec(&exec_id).await {
                    Ok(status) if status.running => Err(()),
                    other => Ok(other),
                }
            }
        })
        .await;

        let status = match outcome {
            Ok(result) => result?,
            Err(exhausted) => {
                warn!(
                    "Restore still running after {} status checks.",
                    exhausted.attempts
                );
                return Err(anyhow!(DokiError::RestoreTimeout));
            }
        };

        if let Some(code) = status.exit_code {
            if code != 0 {
                warn!("mongorestore exited with status {}.", code);
            }
        }
        info!("Dump import finished.");
        Ok(())
    }
}

fn apply_mongo_defaults(options: &mut DokiOptions) {
    if options.image.is_none() {
        options.image = Some(DEFAULT_IMAGE.to_string());
    }
    if options.host_port.is_none() && options.ports.is_none() {
        options.host_port = Some(DEFAULT_HOST_PORT);
    }
}

/// One connection attempt: parse, connect, ping. The driver connects
/// lazily, so only a successful `ping` proves the server is up.
async fn try_connect(port: u16, interval: Duration) -> Result<Client> {
    let uri = format!("mongodb://127.0.0.1:{}", port);
    let mut options = ClientOptions::parse(&uri).await?;
    // Cap each attempt so one dead socket can't eat the whole budget.
    let per_attempt = interval.max(Duration::from_millis(250));
    options.connect_timeout = Some(per_attempt);
    options.server_selection_timeout = Some(per_attempt);
    let client = Client::with_options(options)?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    Ok(client)
}
