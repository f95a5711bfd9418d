//! Error types.
//!
//! Every error that can reach a user implements [`Reportable`], which
//! supplies a dialog title, a message naming the affected path, and an
//! optional hint for resolving the problem.

use std::path::PathBuf;

use thiserror::Error;

use crate::path::ResourcePath;

/// An error that can be shown to the user.
pub trait Reportable: std::error::Error {
    /// Dialog title.
    fn title(&self) -> &'static str;

    /// Message naming the concrete path involved.
    fn user_message(&self) -> String;

    /// How the user might resolve the problem.
    fn suggestion(&self) -> Option<String> {
        None
    }
}

/// Invalid workspace resource path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Resource path is empty")]
    Empty,

    #[error("Resource path must start with '/': {0}")]
    NotAbsolute(String),

    #[error("Invalid resource path segment: {0:?}")]
    InvalidSegment(String),
}

/// Managed storage error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Resource not found: {path}")]
    NotFound { path: ResourcePath },

    #[error("Resource already exists: {path}")]
    AlreadyExists { path: ResourcePath },

    #[error("Resource is read-only: {path}")]
    ReadOnly { path: ResourcePath },

    /// The file changed on disk since the workspace last refreshed it.
    #[error("Resource is out of sync with the file system: {path}")]
    OutOfSync { path: ResourcePath },

    #[error("Cannot {operation} the workspace root")]
    Root { operation: &'static str },

    #[error("Failed to {operation} resource: {path}")]
    Io {
        operation: &'static str,
        path: ResourcePath,
        #[source]
        source: std::io::Error,
    },

    /// The workspace machinery itself failed.
    #[error("Workspace failure: {message}")]
    Host { message: String },
}

impl StoreError {
    /// Host faults are not recoverable by the caller.
    pub fn is_host_fault(&self) -> bool {
        matches!(self, Self::Host { .. })
    }
}

/// Recoverable save failure.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The target exists and is not writable.
    #[error("Target is read-only: {path}")]
    ReadOnlyTarget { path: String },

    /// The target's parent container could not be created.
    #[error("Failed to create container: {path}")]
    ContainerCreateFailed {
        path: String,
        #[source]
        source: StoreError,
    },

    /// Opening, writing, flushing or committing the target failed.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SaveError {
    pub fn io(
        operation: &'static str,
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source: source.into(),
        }
    }

    /// Path named by the error.
    pub fn path(&self) -> &str {
        match self {
            Self::ReadOnlyTarget { path }
            | Self::ContainerCreateFailed { path, .. }
            | Self::Io { path, .. } => path.as_str(),
        }
    }
}

impl Reportable for SaveError {
    fn title(&self) -> &'static str {
        match self {
            Self::ReadOnlyTarget { .. } => "Read-Only File Encountered",
            Self::ContainerCreateFailed { .. } => "Cannot Create Folder",
            Self::Io { .. } => "Save Failed",
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::ReadOnlyTarget { path } => {
                format!("The file {path} is read-only and cannot be overwritten.")
            }
            Self::ContainerCreateFailed { path, source } => {
                format!("Could not create the folder {path}: {source}")
            }
            Self::Io {
                operation,
                path,
                source,
            } => format!("Could not {operation} the file at {path}: {source}"),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::ReadOnlyTarget { .. } => {
                Some("Clear the read-only flag or save to a different location.".into())
            }
            Self::ContainerCreateFailed { .. } => {
                Some("Check that you have permission to create folders in the workspace.".into())
            }
            Self::Io { .. } => {
                Some("Check disk space and that you have permission to write to this location.".into())
            }
        }
    }
}

/// Fault in the machinery running the save, as opposed to the save itself.
#[derive(Debug, Error)]
pub enum HostTaskFailure {
    #[error("Failed to start the save task")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    #[error("Save task panicked while writing {target}: {message}")]
    WorkerPanicked { target: String, message: String },

    #[error("Save lock poisoned by an earlier failed save")]
    LockPoisoned,

    #[error("No workspace is attached; cannot save {target}")]
    NoWorkspace { target: String },

    #[error("Workspace failed while saving {target}")]
    Store {
        target: String,
        #[source]
        source: StoreError,
    },
}

impl Reportable for HostTaskFailure {
    fn title(&self) -> &'static str {
        "Save Failed"
    }

    fn user_message(&self) -> String {
        match self {
            Self::Spawn { source } => format!("The save could not be started: {source}"),
            Self::WorkerPanicked { target, .. } => {
                format!("An internal error interrupted saving {target}.")
            }
            Self::LockPoisoned => {
                "An earlier save failed unexpectedly; no further saves can run.".to_string()
            }
            Self::NoWorkspace { target } => {
                format!("{target} is a workspace resource but no workspace is open.")
            }
            Self::Store { target, source } => {
                format!("The workspace failed while saving {target}: {source}")
            }
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::LockPoisoned | Self::WorkerPanicked { .. } => {
                Some("Restart the application and try again.".into())
            }
            Self::NoWorkspace { .. } => Some("Open the workspace before saving.".into()),
            _ => None,
        }
    }
}

/// Failure to open a document from an editor input.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document: {path}")]
    Document {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Reportable for LoadError {
    fn title(&self) -> &'static str {
        "Open Failed"
    }

    fn user_message(&self) -> String {
        match self {
            Self::Io { path, source } => {
                format!("Could not open the file at {}: {source}", path.display())
            }
            Self::Document { path, source } => {
                format!("The file at {} is not a valid document: {source}", path.display())
            }
        }
    }
}
