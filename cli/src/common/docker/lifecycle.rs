//! # Mongodoki Container Creation Assembly
//!
//! File: cli/src/common/docker/lifecycle.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Builds the Docker container configuration used when (re)creating the
//! database container: exposed ports, loopback-only host port bindings,
//! optional host-directory bind, and the stream/TTY flags the container is
//! always created with. Also home to the `best_effort` helper that makes
//! ignore-and-log error handling explicit at cleanup call sites.
//!
//! ## Architecture
//!
//! Every configured port maps `container/tcp` to `127.0.0.1:host`. The
//! database is only ever exposed on loopback, never on all interfaces, so an
//! ephemeral test database cannot be reached externally.
//!
use crate::core::config::{BoundPort, Volume};
use crate::core::error::Result;
use bollard::{
    container::Config as ContainerConfig,
    models::{HostConfig, PortBinding},
};
use std::collections::HashMap;
use tracing::warn;

/// Builds the `bollard` container configuration for the database container.
///
/// # Arguments
///
/// * `image_ref` - Full image reference (`image:tag`).
/// * `ports` - Resolved port pairs; each becomes an exposed `container/tcp`
///   port bound to `127.0.0.1:host`.
/// * `volume` - Optional host directory bind (`host_dir:container_dir`).
pub fn container_config(
    image_ref: &str,
    ports: &[BoundPort],
    volume: Option<&Volume>,
) -> ContainerConfig<String> {
    let mut exposed_ports: HashMap<String, HashMap<(), ()>> = HashMap::new();
    let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();

    for port in ports {
        let container_port_proto = format!("{}/tcp", port.container);
        exposed_ports.insert(container_port_proto.clone(), HashMap::new());
        let binding = PortBinding {
            // Loopback only; never bind the test database on all interfaces.
            host_ip: Some("127.0.0.1".to_string()),
            host_port: Some(port.host.to_string()),
        };
        port_bindings
            .entry(container_port_proto)
            .or_default()
            .get_or_insert_with(Vec::new)
            .push(binding);
    }

    let binds = volume.map(|v| vec![format!("{}:{}", v.host_dir, v.container_dir)]);

    let host_config = HostConfig {
        port_bindings: if port_bindings.is_empty() {
            None
        } else {
            Some(port_bindings)
        },
        binds,
        ..Default::default()
    };

    ContainerConfig {
        image: Some(image_ref.to_string()),
        exposed_ports: if exposed_ports.is_empty() {
            None
        } else {
            Some(exposed_ports)
        },
        host_config: Some(host_config),
        attach_stdin: Some(false),
        attach_stdout: Some(true),
        attach_stderr: Some(true),
        tty: Some(true),
        open_stdin: Some(false),
        stdin_once: Some(false),
        ..Default::default()
    }
}

/// Logs and discards a failure from a best-effort operation.
///
/// Cleanup steps (unpausing, stopping, or removing a container that may not
/// exist) must not abort the provisioning flow; routing their results through
/// this helper makes that policy visible in the code instead of burying a
/// silent `let _ =`. Returns the value on success, `None` on failure.
pub(crate) fn best_effort<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring failure to {}: {:#}", what, e);
            None
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_container_config_binds_loopback_ports() {
        let ports = [
            BoundPort {
                host: 27017,
                container: 27017,
            },
            BoundPort {
                host: 28000,
                container: 27018,
            },
        ];
        let config = container_config("mongo:latest", &ports, None);

        assert_eq!(config.image.as_deref(), Some("mongo:latest"));
        let exposed = config.exposed_ports.unwrap();
        assert!(exposed.contains_key("27017/tcp"));
        assert!(exposed.contains_key("27018/tcp"));

        let host_config = config.host_config.unwrap();
        let bindings = host_config.port_bindings.unwrap();
        let first = bindings["27017/tcp"].as_ref().unwrap();
        assert_eq!(first[0].host_ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(first[0].host_port.as_deref(), Some("27017"));
        let second = bindings["27018/tcp"].as_ref().unwrap();
        assert_eq!(second[0].host_port.as_deref(), Some("28000"));
        assert!(host_config.binds.is_none());
    }

    #[test]
    fn test_container_config_stream_flags() {
        let config = container_config("mongo:latest", &[], None);
        assert_eq!(config.attach_stdin, Some(false));
        assert_eq!(config.attach_stdout, Some(true));
        assert_eq!(config.attach_stderr, Some(true));
        assert_eq!(config.tty, Some(true));
        assert_eq!(config.open_stdin, Some(false));
        assert_eq!(config.stdin_once, Some(false));
        assert!(config.exposed_ports.is_none());
    }

    #[test]
    fn test_container_config_volume_bind() {
        let volume = Volume {
            host_dir: "/tmp/mongo-data".to_string(),
            container_dir: "/data/db".to_string(),
        };
        let config = container_config("mongo:6.0", &[], Some(&volume));
        let binds = config.host_config.unwrap().binds.unwrap();
        assert_eq!(binds, vec!["/tmp/mongo-data:/data/db".to_string()]);
    }

    #[test]
    fn test_best_effort_swallows_errors() {
        assert_eq!(best_effort("do a thing", Ok(7)), Some(7));
        let failed: Result<i32> = Err(anyhow!("boom"));
        assert_eq!(best_effort("do a thing", failed), None);
    }
}
