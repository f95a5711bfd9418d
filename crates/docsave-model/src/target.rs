//! Save targets.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::path::ResourcePath;

/// Where a document is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetLocation {
    /// An arbitrary file on the local filesystem.
    LocalPath(PathBuf),
    /// A resource inside a managed workspace.
    ManagedResource(ResourcePath),
}

impl TargetLocation {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::LocalPath(path.into())
    }

    pub fn managed(path: ResourcePath) -> Self {
        Self::ManagedResource(path)
    }

    /// Path shown to the user: the absolute filesystem path for local files,
    /// the full workspace path for managed resources.
    pub fn display_path(&self) -> String {
        match self {
            Self::LocalPath(path) => absolute(path).display().to_string(),
            Self::ManagedResource(path) => path.to_string(),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LocalPath(_) => "file",
            Self::ManagedResource(_) => "resource",
        }
    }
}

impl fmt::Display for TargetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_path())
    }
}

/// Existence and writability of a target at the moment it was probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetState {
    pub exists: bool,
    pub read_only: bool,
    pub parent_exists: bool,
}

impl TargetState {
    /// True when the target exists and must not be overwritten.
    pub fn is_write_protected(&self) -> bool {
        self.exists && self.read_only
    }
}

/// Probe a local filesystem path.
///
/// A file is read-only when it carries the read-only flag or the current
/// user is denied write access to it, whatever the group and other bits say.
pub fn probe_local(path: &Path) -> TargetState {
    let metadata = fs::metadata(path).ok();
    let parent_exists = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
        _ => true,
    };
    let read_only = metadata.as_ref().is_some_and(|m| {
        m.permissions().readonly() || (m.is_file() && !writable_by_current_user(path))
    });
    TargetState {
        exists: metadata.is_some(),
        read_only,
        parent_exists,
    }
}

/// Opens for writing without truncating; the handle is dropped at once.
fn writable_by_current_user(path: &Path) -> bool {
    match OpenOptions::new().write(true).open(path) {
        Ok(_) => true,
        Err(e) => e.kind() != ErrorKind::PermissionDenied,
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
