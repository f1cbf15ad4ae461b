//! # Mongodoki Configuration System
//!
//! File: cli/src/core/config.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Two configuration layers live here:
//!
//! 1. **Provisioning options** (`DokiOptions` resolved into `DokiConfig`):
//!    the options a caller hands to [`crate::doki::Doki`] or
//!    [`crate::mongo::Mongodoki`].
//!    All defaulting happens exactly once, in [`DokiOptions::resolve`]; the
//!    resulting `DokiConfig` is immutable and fully explicit (every port has
//!    both sides, the image tag is always present).
//! 2. **File configuration** (`FileConfig`): optional TOML files supplying
//!    defaults for the CLI, so a project can pin its Mongo image or port
//!    without repeating flags.
//!
//! ## Architecture
//!
//! File configuration sources, in order of precedence:
//! 1. Project-specific `.mongodoki.toml` in the current directory or its
//!    ancestors (the search stops at a `.git` boundary)
//! 2. User-specific `~/.config/mongodoki/config.toml`
//! 3. Built-in defaults
//!
//! Host paths from files are tilde-expanded before use. The library-level
//! `DokiOptions` never reads files; the CLI merges `FileConfig` into the
//! options it builds from flags.
//!
use crate::core::error::{DokiError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Default image tag when none is configured.
pub const DEFAULT_TAG: &str = "latest";
/// Default container name when none is configured.
pub const DEFAULT_CONTAINER_NAME: &str = "mongodoki";

// --- Provisioning options ---

/// A host directory bind-mounted into the container.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Volume {
    /// Path on the host machine (may use `~`, expanded by the CLI loader).
    pub host_dir: String,
    /// Path inside the container (e.g. `/data/db`).
    pub container_dir: String,
}

/// A port mapping as supplied by the caller. The container side is optional
/// and defaults to the host side during resolution.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PortMapping {
    pub host: u16,
    #[serde(default)]
    pub container: Option<u16>,
}

/// A fully resolved host-to-container TCP port pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundPort {
    pub host: u16,
    pub container: u16,
}

/// Caller-facing provisioning options. Every field is optional; defaults are
/// applied once by [`DokiOptions::resolve`]. `host_port` is a shorthand that,
/// when set, replaces `ports` with a single mapping.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DokiOptions {
    /// Image to run (e.g. `mongo`). Required by the time `resolve` runs;
    /// [`crate::mongo::Mongodoki`] fills it in for you.
    pub image: Option<String>,
    /// Image tag, defaults to `latest`.
    pub tag: Option<String>,
    /// Container name, defaults to `mongodoki`.
    pub container_name: Option<String>,
    /// Shorthand for a single `host:host` port mapping. Overrides `ports`.
    pub host_port: Option<u16>,
    /// Full port mappings. Leave unset to let the facade pick its default.
    pub ports: Option<Vec<PortMapping>>,
    /// Prefer resuming an existing same-named container over recreating it.
    #[serde(default)]
    pub reuse: bool,
    /// Optional host directory bind mount.
    pub volume: Option<Volume>,
}

/// Resolved, immutable provisioning configuration. Built only via
/// [`DokiOptions::resolve`]; after that point no defaulting happens anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DokiConfig {
    pub image: String,
    pub tag: String,
    pub container_name: String,
    pub ports: Vec<BoundPort>,
    pub reuse: bool,
    pub volume: Option<Volume>,
}

impl DokiOptions {
    /// Resolves the options into a validated [`DokiConfig`], applying
    /// defaults exactly once.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the image is missing, the
    /// container name is empty, a port is zero, or a volume has an empty
    /// directory on either side.
    pub fn resolve(self) -> Result<DokiConfig> {
        let image = self
            .image
            .ok_or_else(|| anyhow!(DokiError::Config("no image specified".to_string())))?;
        if image.is_empty() {
            return Err(anyhow!(DokiError::Config(
                "image name cannot be empty".to_string()
            )));
        }

        let tag = self.tag.unwrap_or_else(|| DEFAULT_TAG.to_string());
        let container_name = self
            .container_name
            .unwrap_or_else(|| DEFAULT_CONTAINER_NAME.to_string());
        if container_name.is_empty() {
            return Err(anyhow!(DokiError::Config(
                "container name cannot be empty".to_string()
            )));
        }

        // `host_port` is the single-port shorthand and wins over `ports`.
        let mappings = match self.host_port {
            Some(host) => vec![PortMapping {
                host,
                container: None,
            }],
            None => self.ports.unwrap_or_default(),
        };
        let mut ports = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            if mapping.host == 0 || mapping.container == Some(0) {
                return Err(anyhow!(DokiError::Config(
                    "port 0 is not a valid mapping".to_string()
                )));
            }
            ports.push(BoundPort {
                host: mapping.host,
                container: mapping.container.unwrap_or(mapping.host),
            });
        }

        if let Some(volume) = &self.volume {
            if volume.host_dir.is_empty() || volume.container_dir.is_empty() {
                return Err(anyhow!(DokiError::Config(
                    "volume must set both host_dir and container_dir".to_string()
                )));
            }
        }

        let config = DokiConfig {
            image,
            tag,
            container_name,
            ports,
            reuse: self.reuse,
            volume: self.volume,
        };
        debug!("Resolved provisioning configuration: {:?}", config);
        Ok(config)
    }
}

impl DokiConfig {
    /// Full image reference, `image:tag`.
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }

    /// Host port the database will be reachable on, when any port is bound.
    pub fn first_host_port(&self) -> Option<u16> {
        self.ports.first().map(|p| p.host)
    }
}

// --- File configuration (CLI defaults) ---

/// Optional defaults for the CLI, loaded from TOML. Absent fields fall back
/// to the built-in defaults in the `start`/`stop` handlers.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Image to run instead of `mongo`.
    pub image: Option<String>,
    /// Image tag instead of `latest`.
    pub tag: Option<String>,
    /// Container name instead of `mongodoki`.
    pub container_name: Option<String>,
    /// Host port instead of 27017.
    pub host_port: Option<u16>,
    /// Database name the `start` command should wait for.
    pub db_name: Option<String>,
    /// Host directory for persistent DB data (may use `~`).
    pub data_dir: Option<String>,
}

const PROJECT_CONFIG_FILENAME: &str = ".mongodoki.toml";

/// Loads the merged file configuration: user config overlaid by a project
/// config when one exists, with host paths expanded and values validated.
pub fn load_config() -> Result<FileConfig> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged);
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<FileConfig>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Mongodoki", "mongodoki") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<FileConfig>> {
    if let Some(project_config_path) = find_project_config_path()? {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.mongodoki.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut path: &Path = &current_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Ok(Some(project_config));
        }
        // A .git directory marks the project root; don't search beyond it.
        if path.join(".git").is_dir() {
            return Ok(None);
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => break,
        }
    }
    Ok(None)
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: FileConfig, project: Option<FileConfig>) -> FileConfig {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    FileConfig {
        image: project.image.or(user.image),
        tag: project.tag.or(user.tag),
        container_name: project.container_name.or(user.container_name),
        host_port: project.host_port.or(user.host_port),
        db_name: project.db_name.or(user.db_name),
        data_dir: project.data_dir.or(user.data_dir),
    }
}

fn expand_config_paths(config: &mut FileConfig) {
    if let Some(dir) = &config.data_dir {
        let expanded = shellexpand::tilde(dir).into_owned();
        debug!("Expanded data directory: {}", expanded);
        config.data_dir = Some(expanded);
    }
}

fn validate_config(config: &FileConfig) -> Result<()> {
    if let Some(name) = &config.container_name {
        if name.is_empty() {
            return Err(anyhow!(DokiError::Config(
                "container_name in configuration file cannot be empty".to_string()
            )));
        }
    }
    if config.host_port == Some(0) {
        return Err(anyhow!(DokiError::Config(
            "host_port in configuration file cannot be 0".to_string()
        )));
    }
    Ok(())
}
