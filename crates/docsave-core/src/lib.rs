//! Document saving for editor frames.
//!
//! [`DocumentSaver`] writes a [`DocumentHandle`](docsave_model::DocumentHandle)
//! to a local file or a managed workspace resource. It refuses read-only
//! targets, creates missing workspace folders, runs the write on a worker
//! thread behind a modal progress wait, and never leaves partial output
//! behind.
//!
//! [`DocumentProvider`] sits on top of the saver and maps editor inputs to
//! documents and save targets.
//!
//! # Example
//!
//! ```no_run
//! use docsave_core::{DocumentSaver, ErrorReporter, NoProgress, SaverConfig};
//! use docsave_model::TargetLocation;
//!
//! let saver = DocumentSaver::new(SaverConfig::default(), ErrorReporter::headless());
//! let outcome = saver
//!     .save("hello\n", &TargetLocation::local("/tmp/hello.txt"), &mut NoProgress)
//!     .expect("save task failed");
//! assert!(outcome.is_saved());
//! ```

pub mod cancel;
pub mod config;
pub mod progress;
pub mod provider;
pub mod report;
pub mod resolve;
pub mod saver;

pub use cancel::CancellationToken;
pub use config::{ConfigError, DEFAULT_BUFFER_SIZE, LocalWriteStrategy, SaverConfig};
pub use progress::{
    Interrupted, NoProgress, ProgressRunner, ProgressSink, SaveStep, SaveUpdate, TaskContext,
};
pub use provider::{AppInfo, CreationProperties, DocumentLoader, DocumentProvider, target_for};
pub use report::{ErrorReporter, LogNotifier, Notifier};
pub use resolve::{resolve_path, resolve_project_folder, uri_path};
pub use saver::DocumentSaver;
