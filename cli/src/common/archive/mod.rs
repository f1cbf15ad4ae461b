//! # Mongodoki Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Archive-related utilities. The single current use case is packaging a
//! database dump directory as a gzipped tarball for upload into a container,
//! handled by the `tar` submodule.
//!

pub mod tar;

pub use tar::create_dump_archive;
