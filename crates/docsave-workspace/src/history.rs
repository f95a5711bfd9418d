//! Local history of overwritten resources.
//!
//! Before an overwrite with `keep_history`, the previous file is copied to
//! `<root>/.history/<resource path>/<UTC timestamp>`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use docsave_model::{ResourcePath, StoreError};

/// Folder under the workspace root that holds local history.
pub const HISTORY_DIR: &str = ".history";

const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.9fZ";

/// One retained revision of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub saved_at: DateTime<Utc>,
    pub location: PathBuf,
}

fn history_dir(root: &Path, path: &ResourcePath) -> PathBuf {
    root.join(HISTORY_DIR).join(path.to_relative_path())
}

/// Copy the current contents of `source` into the history of `path`.
pub(crate) fn record(root: &Path, path: &ResourcePath, source: &Path) -> Result<PathBuf, StoreError> {
    let dir = history_dir(root, path);
    fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
        operation: "create history for",
        path: path.clone(),
        source: e,
    })?;

    let entry = dir.join(Utc::now().format(STAMP_FORMAT).to_string());
    fs::copy(source, &entry).map_err(|e| StoreError::Io {
        operation: "record history for",
        path: path.clone(),
        source: e,
    })?;

    tracing::debug!(resource = %path, entry = %entry.display(), "Recorded local history");
    Ok(entry)
}

/// Retained revisions of `path`, oldest first.
pub(crate) fn list(root: &Path, path: &ResourcePath) -> Result<Vec<HistoryEntry>, StoreError> {
    let dir = history_dir(root, path);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(StoreError::Io {
                operation: "read history of",
                path: path.clone(),
                source: e,
            });
        }
    };

    let mut history: Vec<HistoryEntry> = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let name = entry.file_name();
            let stamp = NaiveDateTime::parse_from_str(name.to_str()?, STAMP_FORMAT).ok()?;
            Some(HistoryEntry {
                saved_at: stamp.and_utc(),
                location: entry.path(),
            })
        })
        .collect();
    history.sort_by_key(|entry| entry.saved_at);
    Ok(history)
}
