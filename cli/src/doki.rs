//! # Mongodoki Container Lifecycle Controller (`doki`)
//!
//! File: cli/src/doki.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! [`Doki`] owns the lifecycle of one named, disposable container: provision
//! it (fresh or by adopting an existing one), stop it, and remove it. It is
//! image-agnostic; the MongoDB-aware layer in [`crate::mongo`] builds on top
//! of it.
//!
//! Two provisioning flows exist, selected by the `reuse` option:
//!
//! - **Fresh** ([`Doki::create_and_start`]): tear down whatever currently
//!   holds the configured name (best effort), then pull the image, create
//!   the container, and start it. Guarantees a clean instance.
//! - **Adopt** ([`Doki::start`]): resume an existing container where it
//!   stands (unpause it, start it) and only fall back to the fresh flow
//!   when there is nothing usable to resume.
//!
//! Teardown operations are deliberately forgiving: `stop` and `remove` log
//! failures and return normally, so cleanup at the end of a test run never
//! masks the test's own result.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mongodoki::{Doki, DokiOptions};
//!
//! # async fn run() -> mongodoki::Result<()> {
//! let doki = Doki::new(DokiOptions {
//!     image: Some("redis".to_string()),
//!     host_port: Some(6379),
//!     ..Default::default()
//! })?;
//! doki.ensure_running().await?;
//! // ... exercise the service ...
//! doki.stop_and_remove().await;
//! # Ok(())
//! # }
//! ```
//!
use crate::common::docker::engine::{ContainerEngine, DockerEngine};
use crate::common::docker::lifecycle::best_effort;
use crate::common::docker::state::{self, ContainerStatus};
use crate::core::config::{DokiConfig, DokiOptions};
use crate::core::error::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Lifecycle controller for one named, disposable container.
pub struct Doki {
    config: DokiConfig,
    engine: Arc<dyn ContainerEngine>,
}

impl Doki {
    /// Creates a controller talking to the local Docker daemon.
    ///
    /// ## Errors
    ///
    /// Fails when the options do not resolve (e.g. no image) or the daemon
    /// connection cannot be established.
    pub fn new(options: DokiOptions) -> Result<Self> {
        let engine = Arc::new(DockerEngine::connect()?);
        Self::with_engine(options, engine)
    }

    /// Creates a controller on an injected engine. This is how tests drive
    /// the lifecycle against a scripted engine.
    pub fn with_engine(options: DokiOptions, engine: Arc<dyn ContainerEngine>) -> Result<Self> {
        Ok(Self {
            config: options.resolve()?,
            engine,
        })
    }

    /// The resolved provisioning configuration.
    pub fn config(&self) -> &DokiConfig {
        &self.config
    }

    pub(crate) fn engine(&self) -> &Arc<dyn ContainerEngine> {
        &self.engine
    }

    /// Brings the configured container up using the flow the options asked
    /// for: adopt-if-possible when `reuse` is set, otherwise a fresh
    /// provision.
    pub async fn ensure_running(&self) -> Result<()> {
        if self.config.reuse {
            self.start().await
        } else {
            self.create_and_start().await
        }
    }

    /// Resumes the existing container where it stands: a running container
    /// is left alone, a paused one is unpaused, a stopped one is started.
    /// When the container is absent, or resuming it fails, falls back to
    /// [`Self::create_and_start`].
    #[instrument(skip(self), fields(container = %self.config.container_name))]
    pub async fn start(&self) -> Result<()> {
        let name = &self.config.container_name;
        match state::resolve_status(self.engine.as_ref(), name).await {
            Ok(ContainerStatus::Running) => {
                info!("Container '{}' is already running.", name);
                Ok(())
            }
            Ok(ContainerStatus::Paused) => {
                info!("Unpausing existing container '{}'.", name);
                match self.engine.unpause_container(name).await {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        warn!(
                            "Could not unpause '{}' ({:#}); provisioning a fresh container.",
                            name, e
                        );
                        self.create_and_start().await
                    }
                }
            }
            Ok(ContainerStatus::Stopped) => {
                info!("Starting existing container '{}'.", name);
                match self.engine.start_container(name).await {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        warn!(
                            "Could not start '{}' ({:#}); provisioning a fresh container.",
                            name, e
                        );
                        self.create_and_start().await
                    }
                }
            }
            Ok(ContainerStatus::Absent) => {
                info!("No container named '{}'; provisioning a fresh one.", name);
                self.create_and_start().await
            }
            Err(e) => {
                warn!(
                    "Could not inspect '{}' ({:#}); provisioning a fresh container.",
                    name, e
                );
                self.create_and_start().await
            }
        }
    }

    /// Provisions a fresh container: pull the configured image, create the
    /// container, start it.
    ///
    /// Any container currently holding the configured name is torn down
    /// first, even a healthy running one. The teardown is best effort; the
    /// pull/create/start sequence that follows is not, and its errors
    /// propagate.
    #[instrument(skip(self), fields(container = %self.config.container_name))]
    pub async fn create_and_start(&self) -> Result<()> {
        let name = &self.config.container_name;

        let teardown: Result<()> = async {
            if let Some(snapshot) = self.engine.inspect_container(name).await? {
                if snapshot.running {
                    if snapshot.paused {
                        self.engine.unpause_container(name).await?;
                    }
                    self.engine.stop_container(name).await?;
                }
                self.engine.remove_container(name).await?;
            }
            Ok(())
        }
        .await;
        best_effort("tear down the previous container", teardown);

        self.engine
            .pull_image(&self.config.image, &self.config.tag)
            .await?;
        self.engine
            .create_container(
                name,
                &self.config.image_ref(),
                &self.config.ports,
                self.config.volume.as_ref(),
            )
            .await?;
        self.engine.start_container(name).await?;
        info!("Container '{}' created and started.", name);
        Ok(())
    }

    /// Stops the container when it is running and not paused; a paused
    /// container is left paused. Best effort: failures are logged and
    /// swallowed, which is why this returns nothing.
    #[instrument(skip(self), fields(container = %self.config.container_name))]
    pub async fn stop(&self) {
        let name = &self.config.container_name;
        let attempt: Result<()> = async {
            if let Some(snapshot) = self.engine.inspect_container(name).await? {
                if snapshot.running && !snapshot.paused {
                    self.engine.stop_container(name).await?;
                    info!("Container '{}' stopped.", name);
                }
            }
            Ok(())
        }
        .await;
        best_effort("stop the container", attempt);
    }

    /// Removes the container, then prunes unused volumes so the database's
    /// anonymous data volume does not pile up on the host. Best effort:
    /// failures are logged and swallowed.
    #[instrument(skip(self), fields(container = %self.config.container_name))]
    pub async fn remove(&self) {
        let name = &self.config.container_name;
        let attempt: Result<()> = async {
            self.engine.remove_container(name).await?;
            self.engine.prune_volumes().await?;
            info!("Container '{}' removed.", name);
            Ok(())
        }
        .await;
        best_effort("remove the container", attempt);
    }

    /// Stops and then removes the container. Best effort on both steps.
    pub async fn stop_and_remove(&self) {
        self.stop().await;
        self.remove().await;
    }
}
