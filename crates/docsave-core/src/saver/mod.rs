//! The document saver.
//!
//! A save runs in this order, each step only after the previous one:
//!
//! 1. probe the target and refuse read-only targets
//! 2. create missing parent folders (managed resources only)
//! 3. serialize the document
//! 4. write and commit the bytes
//! 5. refresh the workspace (managed resources only)
//!
//! Steps 2-5 run on a worker thread behind a modal wait. Cancellation is
//! checked before steps 2, 3 and 4.

mod local;
mod managed;

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use docsave_model::{
    DocumentHandle, HostTaskFailure, SaveError, SaveOutcome, SaveSummary, StoreError,
    TargetLocation, TargetState, probe_local,
};
use docsave_workspace::ManagedStore;

use crate::cancel::CancellationToken;
use crate::config::SaverConfig;
use crate::progress::{Interrupted, ProgressRunner, ProgressSink};
use crate::report::ErrorReporter;

/// Bytes written and whether the target was new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WriteReport {
    bytes_written: u64,
    created: bool,
}

/// Why the worker stopped early.
#[derive(Debug)]
enum TaskError {
    Save(SaveError),
    Cancelled,
    Host(HostTaskFailure),
}

impl From<SaveError> for TaskError {
    fn from(error: SaveError) -> Self {
        Self::Save(error)
    }
}

impl From<Interrupted> for TaskError {
    fn from(_: Interrupted) -> Self {
        Self::Cancelled
    }
}

/// Writer that counts the bytes passing through it.
struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    fn into_parts(self) -> (W, u64) {
        (self.inner, self.count)
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Saves documents to local files or managed workspace resources.
///
/// One saver runs one save at a time; concurrent calls queue on an internal
/// lock. Nothing guards against other savers or external writers touching
/// the same target.
pub struct DocumentSaver {
    config: SaverConfig,
    store: Option<Arc<dyn ManagedStore>>,
    reporter: ErrorReporter,
    runner: ProgressRunner,
    run_lock: Mutex<()>,
}

impl std::fmt::Debug for DocumentSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSaver")
            .field("config", &self.config)
            .field("has_store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

impl DocumentSaver {
    pub fn new(config: SaverConfig, reporter: ErrorReporter) -> Self {
        let runner = ProgressRunner::new(config.poll_interval());
        Self {
            config,
            store: None,
            reporter,
            runner,
            run_lock: Mutex::new(()),
        }
    }

    /// Attach the workspace managed resources are written to.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ManagedStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &SaverConfig {
        &self.config
    }

    pub fn store(&self) -> Option<&Arc<dyn ManagedStore>> {
        self.store.as_ref()
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Save `doc` to `target`.
    ///
    /// Expected failures are reported and returned as
    /// [`SaveOutcome::Failed`]; only faults of the task machinery or the
    /// workspace itself are returned as `Err`.
    pub fn save<D>(
        &self,
        doc: &D,
        target: &TargetLocation,
        progress: &mut dyn ProgressSink,
    ) -> Result<SaveOutcome, HostTaskFailure>
    where
        D: DocumentHandle + Sync + ?Sized,
    {
        self.save_with_token(doc, target, progress, &CancellationToken::new())
    }

    /// Save with a caller-held cancellation token.
    pub fn save_with_token<D>(
        &self,
        doc: &D,
        target: &TargetLocation,
        progress: &mut dyn ProgressSink,
        token: &CancellationToken,
    ) -> Result<SaveOutcome, HostTaskFailure>
    where
        D: DocumentHandle + Sync + ?Sized,
    {
        let _guard = self.run_lock.lock().map_err(|_| {
            let failure = HostTaskFailure::LockPoisoned;
            self.reporter.handle(&failure, false);
            failure
        })?;

        let shown = target.display_path();
        let start = Instant::now();
        tracing::debug!(target_kind = target.kind(), path = %shown, "Saving document");

        let state = match self.probe(target) {
            Ok(state) => state,
            Err(TaskError::Save(error)) => return Ok(self.fail(error)),
            Err(TaskError::Host(failure)) => return Err(self.fatal(failure)),
            Err(TaskError::Cancelled) => return Ok(self.cancelled(&shown)),
        };

        if state.is_write_protected() {
            tracing::warn!(path = %shown, "Refusing to overwrite read-only target");
            return Ok(self.fail(SaveError::ReadOnlyTarget { path: shown }));
        }

        let config = &self.config;
        let store = self.store.as_deref();
        let result = self.runner.run(&shown, token, progress, |ctx| match target {
            TargetLocation::LocalPath(path) => local::write(ctx, doc, path, &state, config),
            TargetLocation::ManagedResource(path) => match store {
                Some(store) => managed::write(ctx, doc, store, path, &state, config),
                None => Err(TaskError::Host(HostTaskFailure::NoWorkspace {
                    target: path.to_string(),
                })),
            },
        });

        match result {
            Ok(Ok(report)) => {
                let summary = SaveSummary {
                    target: target.clone(),
                    bytes_written: report.bytes_written,
                    created: report.created,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                };
                tracing::info!(
                    path = %shown,
                    bytes = summary.bytes_written,
                    created = summary.created,
                    elapsed_ms = summary.elapsed_ms,
                    "Saved document"
                );
                Ok(SaveOutcome::Saved(summary))
            }
            Ok(Err(TaskError::Save(error))) => Ok(self.fail(error)),
            Ok(Err(TaskError::Cancelled)) => Ok(self.cancelled(&shown)),
            Ok(Err(TaskError::Host(failure))) | Err(failure) => Err(self.fatal(failure)),
        }
    }

    fn probe(&self, target: &TargetLocation) -> Result<TargetState, TaskError> {
        match target {
            TargetLocation::LocalPath(path) => Ok(probe_local(path)),
            TargetLocation::ManagedResource(path) => {
                let store = self.store.as_ref().ok_or_else(|| {
                    TaskError::Host(HostTaskFailure::NoWorkspace {
                        target: path.to_string(),
                    })
                })?;
                store
                    .state(path)
                    .map_err(|e| store_failure(e, "inspect", &target.display_path()))
            }
        }
    }

    fn fail(&self, error: SaveError) -> SaveOutcome {
        let silent = matches!(error, SaveError::Io { .. }) && self.config.silent_io_errors;
        self.reporter.handle(&error, silent);
        SaveOutcome::Failed(error)
    }

    fn fatal(&self, failure: HostTaskFailure) -> HostTaskFailure {
        self.reporter.handle(&failure, false);
        failure
    }

    fn cancelled(&self, shown: &str) -> SaveOutcome {
        tracing::info!(path = %shown, "Save cancelled");
        SaveOutcome::Cancelled
    }
}

/// Classify a store error: host faults are fatal, the rest are I/O failures.
fn store_failure(error: StoreError, operation: &'static str, target: &str) -> TaskError {
    if error.is_host_fault() {
        TaskError::Host(HostTaskFailure::Store {
            target: target.to_string(),
            source: error,
        })
    } else {
        TaskError::Save(SaveError::io(operation, target, error))
    }
}
