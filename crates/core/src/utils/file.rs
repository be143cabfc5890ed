//! Filesystem conventions shared by the locator, reader and executor.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Whether `path` is a file with at least one byte.
///
/// A zero-byte file counts as absent everywhere in strz: skip and existence
/// decisions are made on this predicate before any content is read.
pub fn has_content(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

/// Read `path` if it has content, `None` when it is missing or empty.
pub fn read_if_present(path: &Path) -> Result<Option<String>> {
    if !has_content(path) {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}
