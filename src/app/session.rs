// SPDX-License-Identifier: MPL-2.0
//! Session identity.
//!
//! The session identifier scopes every interaction row to this installation.
//! It is generated once, stored in the data directory and reused forever.

use crate::app::paths;
use crate::domain::interaction::SessionId;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// File holding the session identifier inside the data directory.
pub const SESSION_FILE: &str = "session_id";

/// Returns the stored session identifier, creating it on first use.
///
/// When no data directory can be determined, an unsaved identifier is
/// returned so the application still works for the current run.
pub fn load_or_create() -> Result<SessionId> {
    load_or_create_with_override(None)
}

/// Same as [`load_or_create`] with an explicit data directory.
pub fn load_or_create_with_override(data_dir: Option<PathBuf>) -> Result<SessionId> {
    match paths::data_file_with_override(SESSION_FILE, data_dir) {
        Some(path) => load_or_create_at(&path),
        None => {
            tracing::warn!("no data directory available, session will not persist");
            Ok(generate())
        }
    }
}

/// Reads the identifier at `path`, or generates and writes a new one when
/// the file is missing or blank.
pub fn load_or_create_at(path: &Path) -> Result<SessionId> {
    if path.exists() {
        let stored = fs::read_to_string(path)?;
        let stored = stored.trim();
        if !stored.is_empty() {
            return Ok(SessionId::new(stored));
        }
    }

    let session = generate();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, session.as_str())?;
    tracing::info!(path = %path.display(), "created new session id");
    Ok(session)
}

fn generate() -> SessionId {
    SessionId::new(uuid::Uuid::new_v4().to_string())
}
