//! Archive extractor: pulls the qualifying markdown templates out of a zip
//! snapshot of the repository.
//!
//! Entries are read fully and then filtered, in this order:
//! 1. the path must contain `.md`,
//! 2. the path must not contain `README.md`,
//! 3. the base filename must not start with a dot.
//!
//! Snapshot archives wrap the tree in one synthetic root directory
//! (`owner-repo-sha/`); that first segment is stripped from every path with
//! more than one segment. Output follows the archive's own entry order.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use tracing::{debug, error, info};
use zip::ZipArchive;

use crate::contract::ArchiveEntry;
use crate::error::ArchiveError;

/// Extract qualifying entries from any seekable zip stream.
pub fn extract_entries<R: Read + Seek>(reader: R) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = ZipArchive::new(reader).map_err(|e| {
        error!(error = ?e, "Failed to open zip archive");
        ArchiveError::Open(e)
    })?;
    info!(entries = archive.len(), "Opened zip archive");

    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|source| ArchiveError::Entry { index, source })?;
        if file.is_dir() {
            continue;
        }
        let raw_path = file.name().to_string();

        // The declared size is untrusted; let the buffer grow as data arrives.
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(|source| {
            error!(error = ?source, path = %raw_path, "Failed to read archive entry");
            ArchiveError::Read {
                path: raw_path.clone(),
                source,
            }
        })?;

        if !qualifies(&raw_path) {
            debug!(path = %raw_path, "Skipping archive entry");
            continue;
        }

        entries.push(ArchiveEntry {
            relative_path: strip_archive_root(&raw_path),
            content: String::from_utf8_lossy(&buf).into_owned(),
        });
    }

    info!(count = entries.len(), "Extracted templates from archive");
    Ok(entries)
}

/// Extract qualifying entries from an in-memory zip.
pub fn extract_bytes(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    extract_entries(Cursor::new(bytes))
}

/// Extract qualifying entries from a zip file on local storage.
pub fn extract_file(path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let file = File::open(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to open archive file");
        ArchiveError::Io(e)
    })?;
    extract_entries(BufReader::new(file))
}

/// Whether an archive path names a template file.
pub fn qualifies(path: &str) -> bool {
    if !path.contains(".md") {
        return false;
    }
    if path.contains("README.md") {
        return false;
    }
    let base = path.rsplit('/').next().unwrap_or(path);
    !base.starts_with('.')
}

/// Drop the synthetic root directory from a multi-segment archive path.
pub fn strip_archive_root(path: &str) -> String {
    match path.split_once('/') {
        Some((_, rest)) => rest.to_string(),
        None => path.to_string(),
    }
}
