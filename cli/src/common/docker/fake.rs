//! # Mongodoki Recording Engine (test support)
//!
//! File: cli/src/common/docker/fake.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! An in-memory [`ContainerEngine`] for unit tests. Every call is recorded
//! as a `"method args"` line so tests can assert on the exact sequence of
//! engine operations a lifecycle flow produced; inspect results and exec
//! statuses are scripted up front, and individual methods can be told to
//! fail. Compiled only for tests.
//!
use crate::common::docker::engine::{ContainerEngine, ContainerSnapshot, ExecStatus};
use crate::core::config::{BoundPort, Volume};
use crate::core::error::{DokiError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// Scripted engine that records every call it receives.
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<String>>,
    inspect_queue: Mutex<VecDeque<Option<ContainerSnapshot>>>,
    inspect_fallback: Mutex<Option<ContainerSnapshot>>,
    exec_queue: Mutex<VecDeque<ExecStatus>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a one-shot inspect result; once the queue is empty the
    /// fallback set by [`Self::set_inspect_fallback`] is returned (absent
    /// by default).
    pub fn queue_inspect(&self, snapshot: Option<ContainerSnapshot>) {
        self.inspect_queue.lock().unwrap().push_back(snapshot);
    }

    pub fn set_inspect_fallback(&self, snapshot: Option<ContainerSnapshot>) {
        *self.inspect_fallback.lock().unwrap() = snapshot;
    }

    /// Queues a one-shot exec status; once empty, the exec reads as
    /// finished with exit code 0.
    pub fn queue_exec_status(&self, status: ExecStatus) {
        self.exec_queue.lock().unwrap().push_back(status);
    }

    /// Makes the named trait method return a scripted error.
    pub fn fail_on(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    /// Everything recorded so far, one `"method args"` line per call.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose line starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    /// Position of the first recorded call starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls()
            .iter()
            .position(|call| call.starts_with(prefix))
    }

    fn record(&self, line: String) {
        self.calls.lock().unwrap().push(line);
    }

    fn check(&self, method: &'static str) -> Result<()> {
        if self.failing.lock().unwrap().contains(method) {
            Err(anyhow!(DokiError::DockerOperation(format!(
                "scripted failure in {}",
                method
            ))))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContainerEngine for RecordingEngine {
    async fn inspect_container(&self, name: &str) -> Result<Option<ContainerSnapshot>> {
        self.record(format!("inspect {}", name));
        self.check("inspect_container")?;
        let queued = self.inspect_queue.lock().unwrap().pop_front();
        match queued {
            Some(snapshot) => Ok(snapshot),
            None => Ok(*self.inspect_fallback.lock().unwrap()),
        }
    }

    async fn pull_image(&self, image: &str, tag: &str) -> Result<()> {
        self.record(format!("pull {}:{}", image, tag));
        self.check("pull_image")
    }

    async fn create_container(
        &self,
        name: &str,
        image_ref: &str,
        ports: &[BoundPort],
        volume: Option<&Volume>,
    ) -> Result<()> {
        self.record(format!(
            "create {} image={} ports={} volume={}",
            name,
            image_ref,
            ports.len(),
            volume.is_some()
        ));
        self.check("create_container")
    }

    async fn start_container(&self, name: &str) -> Result<()> {
        self.record(format!("start {}", name));
        self.check("start_container")
    }

    async fn stop_container(&self, name: &str) -> Result<()> {
        self.record(format!("stop {}", name));
        self.check("stop_container")
    }

    async fn unpause_container(&self, name: &str) -> Result<()> {
        self.record(format!("unpause {}", name));
        self.check("unpause_container")
    }

    async fn remove_container(&self, name: &str) -> Result<()> {
        self.record(format!("remove {}", name));
        self.check("remove_container")
    }

    async fn prune_volumes(&self) -> Result<()> {
        self.record("prune_volumes".to_string());
        self.check("prune_volumes")
    }

    async fn upload_archive(&self, name: &str, archive: Vec<u8>) -> Result<()> {
        self.record(format!("upload {} bytes={}", name, archive.len()));
        self.check("upload_archive")
    }

    async fn create_exec(&self, name: &str, cmd: &[String]) -> Result<String> {
        self.record(format!("create_exec {} {}", name, cmd.join(" ")));
        self.check("create_exec")?;
        Ok("exec-1".to_string())
    }

    async fn start_exec(&self, exec_id: &str) -> Result<()> {
        self.record(format!("start_exec {}", exec_id));
        self.check("start_exec")
    }

    async fn inspect_exec(&self, exec_id: &str) -> Result<ExecStatus> {
        self.record(format!("inspect_exec {}", exec_id));
        self.check("inspect_exec")?;
        let queued = self.exec_queue.lock().unwrap().pop_front();
        Ok(queued.unwrap_or(ExecStatus {
            running: false,
            exit_code: Some(0),
        }))
    }
}
