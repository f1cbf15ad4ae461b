//! # Mongodoki Container State Classification
//!
//! File: cli/src/common/docker/state.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Classifies the raw `running`/`paused` flags reported by the engine into
//! the four states the lifecycle controller actually distinguishes: absent,
//! stopped, paused, and running. Every lifecycle decision starts from a
//! fresh classification; state is never cached across transitions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::common::docker::state::{self, ContainerStatus};
//!
//! match state::resolve_status(engine, "mongodoki").await? {
//!     ContainerStatus::Running => {} // nothing to do
//!     ContainerStatus::Paused => engine.unpause_container("mongodoki").await?,
//!     ContainerStatus::Stopped => engine.start_container("mongodoki").await?,
//!     ContainerStatus::Absent => { /* create it */ }
//! }
//! ```
//!
use crate::core::error::Result;
use tracing::debug;

use super::engine::{ContainerEngine, ContainerSnapshot};

/// The container states the lifecycle controller distinguishes.
///
/// Docker reports a paused container as both running and paused; here
/// `Paused` wins, so each observation maps to exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    /// No container with the given name exists.
    Absent,
    /// The container exists but is not running (created or exited).
    Stopped,
    /// The container is running but its processes are frozen.
    Paused,
    /// The container is running normally.
    Running,
}

/// Maps an inspection result onto a [`ContainerStatus`].
pub fn status_from_snapshot(snapshot: Option<ContainerSnapshot>) -> ContainerStatus {
    match snapshot {
        None => ContainerStatus::Absent,
        Some(s) if s.running && s.paused => ContainerStatus::Paused,
        Some(s) if s.running => ContainerStatus::Running,
        Some(_) => ContainerStatus::Stopped,
    }
}

/// Fetches a fresh snapshot of `name` and classifies it.
///
/// # Errors
///
/// Propagates engine-communication failures from the inspect call. Absence
/// is not an error; it maps to [`ContainerStatus::Absent`].
pub async fn resolve_status(engine: &dyn ContainerEngine, name: &str) -> Result<ContainerStatus> {
    let status = status_from_snapshot(engine.inspect_container(name).await?);
    debug!("Container '{}' status: {:?}", name, status);
    Ok(status)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn snap(running: bool, paused: bool) -> Option<ContainerSnapshot> {
        Some(ContainerSnapshot { running, paused })
    }

    #[test]
    fn test_missing_container_is_absent() {
        assert_eq!(status_from_snapshot(None), ContainerStatus::Absent);
    }

    #[test]
    fn test_stopped_container() {
        assert_eq!(
            status_from_snapshot(snap(false, false)),
            ContainerStatus::Stopped
        );
    }

    #[test]
    fn test_running_container() {
        assert_eq!(
            status_from_snapshot(snap(true, false)),
            ContainerStatus::Running
        );
    }

    #[test]
    fn test_paused_wins_over_running() {
        assert_eq!(
            status_from_snapshot(snap(true, true)),
            ContainerStatus::Paused
        );
    }

    #[test]
    fn test_paused_flag_without_running_is_stopped() {
        // Docker never reports this combination, but the mapping should
        // still land somewhere sane.
        assert_eq!(
            status_from_snapshot(snap(false, true)),
            ContainerStatus::Stopped
        );
    }
}
