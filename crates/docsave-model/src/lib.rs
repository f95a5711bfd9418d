//! Data model shared by the docsave crates.
//!
//! - `document` - the [`DocumentHandle`] capability a caller hands to the saver
//! - `path` - normalized workspace resource paths
//! - `target` - save targets and their probed on-disk state
//! - `input` - editor inputs that describe where a document came from
//! - `outcome` - the result of a single save call
//! - `error` - error taxonomy with user-facing messages

pub mod document;
pub mod error;
pub mod input;
pub mod outcome;
pub mod path;
pub mod target;

pub use document::{DocumentHandle, JsonDocument};
pub use error::{HostTaskFailure, LoadError, PathError, Reportable, SaveError, StoreError};
pub use input::{DocumentOrigin, EditorInput, ProjectRef, WorkspaceFileInput};
pub use outcome::{SaveOutcome, SaveSummary};
pub use path::ResourcePath;
pub use target::{TargetLocation, TargetState, probe_local};
