// SPDX-License-Identifier: MPL-2.0
//! Writing diagnostic reports to disk.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use chrono::Local;

/// Errors raised while exporting a report.
#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Serialization(serde_json::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
            ExportError::Serialization(e) => write!(f, "Serialization error: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err)
    }
}

/// Returns a timestamped report file name, e.g.
/// `mosaic_lens_diagnostics_20250101_120000.json`.
#[must_use]
pub fn generate_default_filename() -> String {
    format!(
        "mosaic_lens_diagnostics_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Writes `content` to a temporary sibling file and renames it over `path`.
///
/// # Errors
///
/// Returns any I/O error; the temporary file is removed on failure.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
