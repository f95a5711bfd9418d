//! Editor inputs.
//!
//! An editor input describes which document an editor frame is showing. It
//! is either a file inside the managed workspace or a URI pointing anywhere.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::path::ResourcePath;

/// Project that owns a workspace file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub name: String,
    /// Project root on the local filesystem.
    pub location: PathBuf,
}

/// A file that lives in the managed workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceFileInput {
    pub resource: ResourcePath,
    /// Where the workspace stores the file on disk.
    pub location: PathBuf,
    pub project: Option<ProjectRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditorInput {
    WorkspaceFile(WorkspaceFileInput),
    Uri { uri: String },
    Other { description: String },
}

impl EditorInput {
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri { uri: uri.into() }
    }

    pub fn other(description: impl Into<String>) -> Self {
        Self::Other {
            description: description.into(),
        }
    }

    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match self {
            Self::WorkspaceFile(file) => format!("workspace file {}", file.resource),
            Self::Uri { uri } => format!("uri {uri}"),
            Self::Other { description } => description.clone(),
        }
    }
}

/// Where a document was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrigin {
    Workspace,
    FileSystem,
}

impl DocumentOrigin {
    pub fn of(input: &EditorInput) -> Self {
        match input {
            EditorInput::WorkspaceFile(_) => Self::Workspace,
            _ => Self::FileSystem,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::FileSystem => "file system",
        }
    }
}
