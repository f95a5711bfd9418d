//! Progress reporting and the modal task runner.
//!
//! A save runs as one unit of work on a worker thread. The calling thread
//! blocks in a modal wait that forwards [`SaveUpdate`] messages to the
//! caller's [`ProgressSink`] and turns a cancel request from the sink into a
//! trip of the shared [`CancellationToken`].

use std::any::Any;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use docsave_model::HostTaskFailure;

use crate::cancel::CancellationToken;

/// Steps within a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStep {
    #[default]
    CheckingTarget,
    CreatingContainer,
    Serializing,
    Writing,
    Refreshing,
}

impl SaveStep {
    /// Get human-readable label for UI.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CheckingTarget => "Checking target...",
            Self::CreatingContainer => "Creating folder...",
            Self::Serializing => "Serializing document...",
            Self::Writing => "Writing file...",
            Self::Refreshing => "Refreshing workspace...",
        }
    }
}

/// Messages sent from the save worker to the modal wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveUpdate {
    /// A save of `target` has started.
    Started { target: String },
    /// The worker entered a new step.
    Step(SaveStep),
    /// The document produced this many bytes.
    Serialized { bytes: u64 },
}

/// Receiver of progress for a running save.
///
/// Called on the thread that invoked the save, never on the worker.
pub trait ProgressSink {
    fn update(&mut self, update: &SaveUpdate);

    /// Called once after the worker has finished, whatever the outcome.
    fn finish(&mut self) {}

    /// Polled during the modal wait; returning true interrupts the save at
    /// its next checkpoint.
    fn is_cancel_requested(&self) -> bool {
        false
    }
}

/// Sink that discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&mut self, _update: &SaveUpdate) {}
}

impl ProgressSink for Vec<SaveUpdate> {
    fn update(&mut self, update: &SaveUpdate) {
        self.push(update.clone());
    }
}

/// Returned by a checkpoint when cancellation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

/// Handle the worker uses to report progress and observe cancellation.
#[derive(Debug)]
pub struct TaskContext {
    token: CancellationToken,
    updates: Sender<SaveUpdate>,
}

impl TaskContext {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop here if cancelled, otherwise announce `step`.
    pub fn checkpoint(&self, step: SaveStep) -> Result<(), Interrupted> {
        if self.token.is_cancelled() {
            tracing::debug!(step = ?step, "Save interrupted at checkpoint");
            return Err(Interrupted);
        }
        self.report(SaveUpdate::Step(step));
        Ok(())
    }

    pub fn report(&self, update: SaveUpdate) {
        // The modal wait outlives the worker, so a failed send only means
        // nobody is listening any more.
        let _ = self.updates.send(update);
    }
}

/// Runs a unit of work on a worker thread behind a blocking modal wait.
#[derive(Debug, Clone)]
pub struct ProgressRunner {
    poll_interval: Duration,
}

impl Default for ProgressRunner {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

impl ProgressRunner {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Run `work` on a worker thread and block until it returns.
    ///
    /// Only faults of the runner itself are errors; whatever `work` returns
    /// is passed through.
    pub fn run<T, F>(
        &self,
        target: &str,
        token: &CancellationToken,
        sink: &mut dyn ProgressSink,
        work: F,
    ) -> Result<T, HostTaskFailure>
    where
        F: FnOnce(&TaskContext) -> T + Send,
        T: Send,
    {
        let (sender, receiver) = mpsc::channel();
        let context = TaskContext {
            token: token.clone(),
            updates: sender,
        };

        sink.update(&SaveUpdate::Started {
            target: target.to_string(),
        });

        let result: Result<T, HostTaskFailure> = thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("docsave-worker".to_string())
                .spawn_scoped(scope, move || work(&context))
                .map_err(|e| HostTaskFailure::Spawn { source: e })?;

            loop {
                match receiver.recv_timeout(self.poll_interval) {
                    Ok(update) => sink.update(&update),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                if sink.is_cancel_requested() && !token.is_cancelled() {
                    tracing::info!(path = target, "Cancellation requested");
                    token.cancel();
                }
            }

            worker
                .join()
                .map_err(|panic| HostTaskFailure::WorkerPanicked {
                    target: target.to_string(),
                    message: panic_message(panic.as_ref()),
                })
        });

        sink.finish();
        result
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
