//! # Mongodoki Container Engine Abstraction
//!
//! File: cli/src/common/docker/engine.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! The [`ContainerEngine`] trait is the seam between the provisioning logic
//! and the Docker daemon. [`crate::doki::Doki`] holds the engine as an
//! injected trait object, so provisioning can be driven against the real
//! daemon in production ([`DockerEngine`], backed by `bollard`) and against
//! recording fakes in tests, with no process-wide client or hidden globals.
//!
//! ## Architecture
//!
//! The trait speaks in this crate's domain types (`ContainerSnapshot`,
//! `ExecStatus`, [`BoundPort`], [`Volume`]); all `bollard` request/response
//! plumbing stays inside `DockerEngine`. Two conventions worth noting:
//!
//! - `inspect_container` reports absence as `Ok(None)`. A missing container
//!   is a normal state for the lifecycle controller, not a failure.
//! - `start_exec` drains the command's output into the log from a background
//!   task; the caller polls completion via `inspect_exec`.
//!
use crate::core::config::{BoundPort, Volume};
use crate::core::error::{DokiError, Result};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use bollard::{
    container::{
        CreateContainerOptions, InspectContainerOptions, RemoveContainerOptions,
        StartContainerOptions, StopContainerOptions, UploadToContainerOptions,
    },
    exec::{CreateExecOptions, StartExecResults},
    image::CreateImageOptions,
    volume::PruneVolumesOptions,
    Docker,
};
use futures_util::StreamExt;
use tracing::{debug, error, info, instrument, warn};

use super::connect::connect_docker;
use super::lifecycle::container_config;

/// Last-observed container state, re-fetched on every lifecycle decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub running: bool,
    pub paused: bool,
}

/// State of an in-container exec instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecStatus {
    pub running: bool,
    pub exit_code: Option<i64>,
}

/// Container-engine operations the provisioning flow needs. Implemented by
/// [`DockerEngine`] for the local daemon; test code supplies fakes.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Inspects a container by name. Absence is a normal outcome, reported
    /// as `Ok(None)`; only engine-communication failures are errors.
    async fn inspect_container(&self, name: &str) -> Result<Option<ContainerSnapshot>>;

    /// Pulls `image:tag`, consuming the progress stream to completion.
    async fn pull_image(&self, image: &str, tag: &str) -> Result<()>;

    /// Creates a container with the standard stream flags, loopback port
    /// bindings, and optional volume bind.
    async fn create_container(
        &self,
        name: &str,
        image_ref: &str,
        ports: &[BoundPort],
        volume: Option<&Volume>,
    ) -> Result<()>;

    async fn start_container(&self, name: &str) -> Result<()>;

    async fn stop_container(&self, name: &str) -> Result<()>;

    async fn unpause_container(&self, name: &str) -> Result<()>;

    /// Removes a container. Removing an absent container is not an error.
    async fn remove_container(&self, name: &str) -> Result<()>;

    /// Prunes all currently-unused volumes on the host. Global, not scoped
    /// to containers this crate created.
    async fn prune_volumes(&self) -> Result<()>;

    /// Unpacks a gzipped tar archive into the container filesystem at `/`.
    async fn upload_archive(&self, name: &str, archive: Vec<u8>) -> Result<()>;

    /// Creates an exec instance for `cmd` and returns its id.
    async fn create_exec(&self, name: &str, cmd: &[String]) -> Result<String>;

    /// Starts a previously created exec instance.
    async fn start_exec(&self, exec_id: &str) -> Result<()>;

    /// Reports whether an exec instance is still running.
    async fn inspect_exec(&self, exec_id: &str) -> Result<ExecStatus>;
}

/// `bollard`-backed [`ContainerEngine`] talking to the local Docker daemon.
#[derive(Debug, Clone)]
pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    /// Connects to the local daemon with default settings.
    pub fn connect() -> Result<Self> {
        Ok(Self {
            docker: connect_docker()?,
        })
    }

    /// Wraps an existing `bollard` client.
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    #[instrument(skip(self, name), fields(container = %name))]
    async fn inspect_container(&self, name: &str) -> Result<Option<ContainerSnapshot>> {
        match self
            .docker
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
        {
            Ok(details) => {
                let state = details.state;
                let snapshot = ContainerSnapshot {
                    running: state.as_ref().and_then(|s| s.running).unwrap_or(false),
                    paused: state.as_ref().and_then(|s| s.paused).unwrap_or(false),
                };
                debug!("Container '{}' state: {:?}", name, snapshot);
                Ok(Some(snapshot))
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => {
                debug!("Container '{}' does not exist (404).", name);
                Ok(None)
            }
            Err(e) => {
                error!("Failed to inspect container '{}': {:?}", name, e);
                Err(anyhow!(DokiError::DockerApi { source: e })
                    .context(format!("Failed to inspect container '{}'", name)))
            }
        }
    }

    #[instrument(skip(self, image, tag), fields(image = %image, tag = %tag))]
    async fn pull_image(&self, image: &str, tag: &str) -> Result<()> {
        info!("Pulling image '{}:{}'...", image, tag);
        let options = CreateImageOptions {
            from_image: image.to_string(),
            tag: tag.to_string(),
            ..Default::default()
        };

        let mut stream = self.docker.create_image(Some(options), None, None);
        while let Some(event) = stream.next().await {
            let info = event.map_err(|e| {
                anyhow!(DokiError::DockerApi { source: e })
                    .context(format!("Failed to pull image '{}:{}'", image, tag))
            })?;
            if let Some(err) = info.error {
                error!("Pull error for '{}:{}': {}", image, tag, err);
                return Err(anyhow!(DokiError::DockerOperation(format!(
                    "Pulling image '{}:{}' failed: {}",
                    image, tag, err
                ))));
            }
            match (info.status, info.progress) {
                (Some(status), Some(progress)) => debug!("Pull: {} {}", status, progress),
                (Some(status), None) => debug!("Pull: {}", status),
                _ => {}
            }
        }
        info!("Image '{}:{}' pulled.", image, tag);
        Ok(())
    }

    #[instrument(skip(self, name, image_ref, ports, volume), fields(container = %name, image = %image_ref))]
    async fn create_container(
        &self,
        name: &str,
        image_ref: &str,
        ports: &[BoundPort],
        volume: Option<&Volume>,
    ) -> Result<()> {
        let config = container_config(image_ref, ports, volume);
        let options = Some(CreateContainerOptions {
            name: name.to_string(),
            platform: None,
        });
        let response = self
            .docker
            .create_container(options, config)
            .await
            .map_err(|e| anyhow!(DokiError::DockerApi { source: e }))
            .with_context(|| format!("Failed to create container '{}'", name))?;
        debug!("Created container '{}' (ID: {})", name, response.id);
        Ok(())
    }

    async fn start_container(&self, name: &str) -> Result<()> {
        match self
            .docker
            .start_container(name, None::<StartContainerOptions<String>>)
            .await
        {
            Ok(()) => Ok(()),
            // 304: already started, which satisfies the goal.
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 304, ..
            }) => {
                debug!("Container '{}' is already running (304).", name);
                Ok(())
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Err(anyhow!(DokiError::ContainerNotFound {
                name: name.to_string()
            })),
            Err(e) => Err(anyhow!(DokiError::DockerApi { source: e })
                .context(format!("Failed to start container '{}'", name))),
        }
    }

    async fn stop_container(&self, name: &str) -> Result<()> {
        match self
            .docker
            .stop_container(name, None::<StopContainerOptions>)
            .await
        {
            Ok(()) => Ok(()),
            // 304: already stopped.
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 304, ..
            }) => {
                debug!("Container '{}' is already stopped (304).", name);
                Ok(())
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Err(anyhow!(DokiError::ContainerNotFound {
                name: name.to_string()
            })),
            Err(e) => Err(anyhow!(DokiError::DockerApi { source: e })
                .context(format!("Failed to stop container '{}'", name))),
        }
    }

    async fn unpause_container(&self, name: &str) -> Result<()> {
        match self.docker.unpause_container(name).await {
            Ok(()) => Ok(()),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Err(anyhow!(DokiError::ContainerNotFound {
                name: name.to_string()
            })),
            Err(e) => Err(anyhow!(DokiError::DockerApi { source: e })
                .context(format!("Failed to unpause container '{}'", name))),
        }
    }

    async fn remove_container(&self, name: &str) -> Result<()> {
        match self
            .docker
            .remove_container(name, None::<RemoveContainerOptions>)
            .await
        {
            Ok(()) => {
                debug!("Removed container '{}'.", name);
                Ok(())
            }
            // Already gone; removal is idempotent.
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => {
                debug!("Container '{}' already removed (404).", name);
                Ok(())
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 409, ..
            }) => Err(anyhow!(DokiError::DockerOperation(format!(
                "Cannot remove container '{}': it is still running",
                name
            )))),
            Err(e) => Err(anyhow!(DokiError::DockerApi { source: e })
                .context(format!("Failed to remove container '{}'", name))),
        }
    }

    async fn prune_volumes(&self) -> Result<()> {
        let response = self
            .docker
            .prune_volumes(None::<PruneVolumesOptions<String>>)
            .await
            .map_err(|e| anyhow!(DokiError::DockerApi { source: e }))
            .context("Failed to prune unused volumes")?;
        let pruned = response.volumes_deleted.map(|v| v.len()).unwrap_or(0);
        info!("Pruned {} unused volume(s).", pruned);
        Ok(())
    }

    #[instrument(skip(self, name, archive), fields(container = %name, bytes = archive.len()))]
    async fn upload_archive(&self, name: &str, archive: Vec<u8>) -> Result<()> {
        let options = Some(UploadToContainerOptions {
            path: "/".to_string(),
            ..Default::default()
        });
        self.docker
            .upload_to_container(name, options, archive.into())
            .await
            .map_err(|e| anyhow!(DokiError::DockerApi { source: e }))
            .with_context(|| format!("Failed to upload archive into container '{}'", name))?;
        debug!("Archive uploaded into container '{}'.", name);
        Ok(())
    }

    async fn create_exec(&self, name: &str, cmd: &[String]) -> Result<String> {
        let options = CreateExecOptions {
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            tty: Some(true),
            cmd: Some(cmd.to_vec()),
            ..Default::default()
        };
        let response = self.docker.create_exec(name, options).await.map_err(|e| {
            match e {
                bollard::errors::Error::DockerResponseServerError {
                    status_code: 404, ..
                } => anyhow!(DokiError::ContainerNotFound {
                    name: name.to_string()
                }),
                _ => anyhow!(DokiError::DockerApi { source: e }).context(format!(
                    "Failed to create exec instance in container '{}'",
                    name
                )),
            }
        })?;
        debug!("Created exec instance {} in '{}'.", response.id, name);
        Ok(response.id)
    }

    async fn start_exec(&self, exec_id: &str) -> Result<()> {
        let started = self
            .docker
            .start_exec(exec_id, None)
            .await
            .map_err(|e| anyhow!(DokiError::DockerApi { source: e }))
            .context("Failed to start exec instance")?;
        match started {
            StartExecResults::Attached { mut output, .. } => {
                // Drain the command's output in the background so the exec
                // can't stall on a full pipe; the caller polls inspect_exec.
                tokio::spawn(async move {
                    while let Some(chunk) = output.next().await {
                        match chunk {
                            Ok(log) => debug!("exec output: {}", log),
                            Err(e) => {
                                warn!("exec output stream error: {}", e);
                                break;
                            }
                        }
                    }
                });
            }
            StartExecResults::Detached => {}
        }
        Ok(())
    }

    async fn inspect_exec(&self, exec_id: &str) -> Result<ExecStatus> {
        let details = self
            .docker
            .inspect_exec(exec_id)
            .await
            .map_err(|e| anyhow!(DokiError::DockerApi { source: e }))
            .context("Failed to inspect exec instance")?;
        Ok(ExecStatus {
            running: details.running.unwrap_or(false),
            exit_code: details.exit_code,
        })
    }
}
