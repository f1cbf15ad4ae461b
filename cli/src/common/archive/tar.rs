//! # Mongodoki TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Builds the gzipped tarball used to ship a database dump into a container.
//! The Docker `put-archive` endpoint unpacks an archive relative to a target
//! path, so the dump directory's contents are rooted under a named directory
//! inside the archive; uploading at `/` then lands them at `/<target_dir>`,
//! the same layout `docker cp <dump_dir> container:/<target_dir>` produces.
//!
//! ## Architecture
//!
//! The `tar` crate builds the archive structure and `flate2` gzips it, all
//! in memory. Dumps are small enough that streaming is not worth the
//! complexity here.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::path::Path;

/// Creates an in-memory `.tar.gz` of `dump_dir`'s contents, rooted under
/// `target_dir` inside the archive.
///
/// ## Arguments
///
/// * `dump_dir` - Directory holding the dump files. Must exist.
/// * `target_dir` - Directory name the contents appear under in the archive
///   (and therefore under `/` once uploaded), e.g. `"dbdata"`.
///
/// ## Errors
///
/// Returns an `Err` if the dump directory cannot be read, any entry cannot
/// be added, or finalizing the tar structure or gzip stream fails.
pub fn create_dump_archive(dump_dir: &Path, target_dir: &str) -> Result<Vec<u8>> {
    let mut tar_gz_bytes = Vec::new();
    let enc = flate2::write::GzEncoder::new(&mut tar_gz_bytes, flate2::Compression::default());
    let mut tar_builder = tar::Builder::new(enc);

    tar_builder
        .append_dir_all(target_dir, dump_dir)
        .with_context(|| {
            format!(
                "Failed to add dump directory '{}' to the tar archive",
                dump_dir.display()
            )
        })?;

    let encoder = tar_builder
        .into_inner()
        .context("Failed to finalize tar archive structure")?;

    encoder
        .finish()
        .context("Failed to finish gzip compression stream")?;

    Ok(tar_gz_bytes)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::fs;
    use tar::Archive;
    use tempfile::tempdir;

    #[test]
    fn test_create_dump_archive_prefixes_entries() -> Result<()> {
        let temp_dir = tempdir()?;
        let dir_path = temp_dir.path();
        fs::write(dir_path.join("testDB.bson"), "bson bytes")?;
        fs::create_dir(dir_path.join("testDB"))?;
        fs::write(dir_path.join("testDB/collection.metadata.json"), "{}")?;

        let tar_data = create_dump_archive(dir_path, "dbdata")?;
        assert!(!tar_data.is_empty());

        let gz_decoder = GzDecoder::new(tar_data.as_slice());
        let mut tar_archive = Archive::new(gz_decoder);
        let mut found_files = std::collections::HashSet::new();
        for entry_result in tar_archive.entries()? {
            let entry = entry_result?;
            let path = entry.path()?.to_path_buf();
            found_files.insert(path.to_string_lossy().to_string().replace('\\', "/"));
        }
        assert!(found_files.contains("dbdata"));
        assert!(found_files.contains("dbdata/testDB.bson"));
        assert!(found_files.contains("dbdata/testDB/collection.metadata.json"));
        Ok(())
    }

    #[test]
    fn test_create_dump_archive_missing_dir_fails() {
        let temp_dir = tempdir().expect("tempdir");
        let missing = temp_dir.path().join("no-such-dump");
        let result = create_dump_archive(&missing, "dbdata");
        assert!(result.is_err());
    }
}
