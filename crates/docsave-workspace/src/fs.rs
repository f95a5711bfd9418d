//! Filesystem-backed workspace.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use docsave_model::{ResourcePath, StoreError, TargetState};

use crate::history::{self, HISTORY_DIR, HistoryEntry};
use crate::store::{ManagedStore, RefreshDepth};

/// Workspace whose projects are the top-level folders of a root directory.
///
/// The workspace remembers the modification time of every file it wrote or
/// refreshed. A file whose current modification time differs from the
/// remembered one, or that was never seen, is out of sync.
#[derive(Debug)]
pub struct FsWorkspace {
    root: PathBuf,
    synced: Mutex<HashMap<ResourcePath, SystemTime>>,
}

impl FsWorkspace {
    /// Open an existing directory as a workspace.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let root = fs::canonicalize(&root).map_err(|e| StoreError::Io {
            operation: "open",
            path: ResourcePath::root(),
            source: e,
        })?;
        if !root.is_dir() {
            return Err(StoreError::NotFound {
                path: ResourcePath::root(),
            });
        }
        tracing::debug!(root = %root.display(), "Opened workspace");
        Ok(Self {
            root,
            synced: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Retained revisions of a resource, oldest first.
    pub fn history(&self, path: &ResourcePath) -> Result<Vec<HistoryEntry>, StoreError> {
        history::list(&self.root, path)
    }

    /// Whether the file on disk differs from what the workspace last saw.
    pub fn is_out_of_sync(&self, path: &ResourcePath) -> Result<bool, StoreError> {
        let modified = modified_time(&self.location(path));
        let synced = self.synced()?;
        Ok(match (synced.get(path), modified) {
            (Some(seen), Some(current)) => *seen != current,
            (None, Some(_)) => true,
            (_, None) => false,
        })
    }

    fn synced(&self) -> Result<MutexGuard<'_, HashMap<ResourcePath, SystemTime>>, StoreError> {
        self.synced.lock().map_err(|_| StoreError::Host {
            message: "workspace sync index lock poisoned".to_string(),
        })
    }

    fn mark_synced(&self, path: &ResourcePath) -> Result<(), StoreError> {
        let modified = modified_time(&self.location(path));
        let mut synced = self.synced()?;
        match modified {
            Some(time) => synced.insert(path.clone(), time),
            None => synced.remove(path),
        };
        Ok(())
    }

    fn file_path(&self, path: &ResourcePath, operation: &'static str) -> Result<PathBuf, StoreError> {
        if path.is_root() {
            return Err(StoreError::Root { operation });
        }
        Ok(self.location(path))
    }

    /// Write `contents` to a sibling temp file, then rename it over `location`.
    fn write_atomic(
        &self,
        path: &ResourcePath,
        location: &Path,
        contents: &[u8],
        operation: &'static str,
    ) -> Result<(), StoreError> {
        let io_error = |source: std::io::Error| StoreError::Io {
            operation,
            path: path.clone(),
            source,
        };
        let parent = location.parent().unwrap_or(&self.root);
        let mut temp = tempfile::Builder::new()
            .prefix(".docsave-")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(io_error)?;
        temp.write_all(contents).map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;

        if let Ok(metadata) = fs::metadata(location) {
            if let Err(e) = temp.as_file().set_permissions(metadata.permissions()) {
                tracing::warn!(resource = %path, error = %e, "Could not carry over file permissions");
            }
        }

        temp.persist(location).map_err(|e| io_error(e.error))?;
        Ok(())
    }

    fn refresh_children(&self, path: &ResourcePath, recursive: bool) -> Result<(), StoreError> {
        let location = self.location(path);
        let entries = match fs::read_dir(&location) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::NotADirectory => {
                return Ok(());
            }
            Err(e) => {
                return Err(StoreError::Io {
                    operation: "refresh",
                    path: path.clone(),
                    source: e,
                });
            }
        };

        for entry in entries.flatten() {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if path.is_root() && name == HISTORY_DIR {
                continue;
            }
            let Ok(child) = path.join(&name) else {
                continue;
            };
            let entry_path = entry.path();
            if entry_path.is_dir() {
                if recursive {
                    self.refresh_children(&child, true)?;
                }
            } else {
                self.mark_synced(&child)?;
            }
        }
        Ok(())
    }

    fn forget_missing(&self, path: &ResourcePath) -> Result<(), StoreError> {
        let mut synced = self.synced()?;
        synced.retain(|known, _| {
            !known.segments().starts_with(path.segments()) || self.location(known).exists()
        });
        Ok(())
    }
}

impl ManagedStore for FsWorkspace {
    fn state(&self, path: &ResourcePath) -> Result<TargetState, StoreError> {
        let location = self.location(path);
        let metadata = fs::metadata(&location).ok();
        let parent_exists = match path.parent() {
            Some(parent) if !parent.is_root() => self.location(&parent).is_dir(),
            _ => true,
        };
        Ok(TargetState {
            exists: metadata.is_some(),
            read_only: metadata.as_ref().is_some_and(|m| m.permissions().readonly()),
            parent_exists,
        })
    }

    fn create_folder(&self, path: &ResourcePath) -> Result<(), StoreError> {
        if path.is_root() {
            return Ok(());
        }
        let location = self.location(path);
        if location.is_file() {
            return Err(StoreError::AlreadyExists { path: path.clone() });
        }
        fs::create_dir_all(&location).map_err(|e| StoreError::Io {
            operation: "create folder",
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(folder = %path, "Created workspace folder");
        Ok(())
    }

    fn create(&self, path: &ResourcePath, contents: &[u8], overwrite: bool) -> Result<(), StoreError> {
        let location = self.file_path(path, "create")?;
        let state = self.state(path)?;
        if state.exists {
            if !overwrite {
                return Err(StoreError::AlreadyExists { path: path.clone() });
            }
            if state.read_only {
                return Err(StoreError::ReadOnly { path: path.clone() });
            }
        }
        if !state.parent_exists {
            return Err(StoreError::NotFound {
                path: path.parent().unwrap_or_else(ResourcePath::root),
            });
        }

        self.write_atomic(path, &location, contents, "create")?;
        self.mark_synced(path)?;
        tracing::debug!(resource = %path, bytes = contents.len(), "Created resource");
        Ok(())
    }

    fn set_contents(
        &self,
        path: &ResourcePath,
        contents: &[u8],
        force: bool,
        keep_history: bool,
    ) -> Result<(), StoreError> {
        let location = self.file_path(path, "update")?;
        let metadata = match fs::metadata(&location) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(StoreError::NotFound { path: path.clone() }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound { path: path.clone() });
            }
            Err(e) => {
                return Err(StoreError::Io {
                    operation: "update",
                    path: path.clone(),
                    source: e,
                });
            }
        };
        if metadata.permissions().readonly() {
            return Err(StoreError::ReadOnly { path: path.clone() });
        }
        if !force && self.is_out_of_sync(path)? {
            return Err(StoreError::OutOfSync { path: path.clone() });
        }

        if keep_history {
            history::record(&self.root, path, &location)?;
        }

        self.write_atomic(path, &location, contents, "update")?;
        self.mark_synced(path)?;
        tracing::debug!(resource = %path, bytes = contents.len(), "Updated resource");
        Ok(())
    }

    fn refresh_local(&self, path: &ResourcePath, depth: RefreshDepth) -> Result<(), StoreError> {
        let location = self.location(path);
        if !path.is_root() && location.is_file() {
            self.mark_synced(path)?;
        }
        match depth {
            RefreshDepth::Zero => {
                if !location.exists() {
                    self.synced()?.remove(path);
                }
            }
            RefreshDepth::One => {
                self.refresh_children(path, false)?;
                self.forget_missing(path)?;
            }
            RefreshDepth::Infinite => {
                self.refresh_children(path, true)?;
                self.forget_missing(path)?;
            }
        }
        tracing::trace!(resource = %path, ?depth, "Refreshed resource");
        Ok(())
    }

    fn location(&self, path: &ResourcePath) -> PathBuf {
        self.root.join(path.to_relative_path())
    }

    fn project_location(&self, project: &str) -> Option<PathBuf> {
        let location = self.root.join(project);
        (project != HISTORY_DIR && location.is_dir()).then_some(location)
    }
}

fn modified_time(location: &Path) -> Option<SystemTime> {
    fs::metadata(location).and_then(|m| m.modified()).ok()
}
