//! # Mongodoki CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files in `cli/tests/`. Each
//! `.rs` file in that directory is compiled as its own test crate, so the
//! helpers live here and are pulled in with `mod common;`.
//!

// Different test files use different helpers from this module.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// Creates an `assert_cmd::Command` for the compiled `mongodoki` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn mongodoki_cmd() -> Command {
    Command::cargo_bin("mongodoki").expect("Failed to find mongodoki binary for testing")
}
