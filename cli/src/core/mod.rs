//! # Mongodoki Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Foundational components shared across the crate: configuration,
//! error types, and the bounded-retry combinator.
//!
//! ## Architecture
//!
//! - `config`: provisioning option resolution and CLI file configuration
//! - `error`: error types and the crate-wide `Result` alias
//! - `retry`: retry budgets and the bounded-retry loop used by the
//!   readiness and restore pollers
//!
pub mod config;
pub mod error;
pub mod retry;
