//! Result of a single save call.

use crate::error::SaveError;
use crate::target::TargetLocation;

/// Details of a completed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub target: TargetLocation,
    pub bytes_written: u64,
    /// Whether the target did not exist before the save.
    pub created: bool,
    pub elapsed_ms: u64,
}

/// Outcome of `DocumentSaver::save`.
///
/// Expected failures are values here, not errors; only host faults are
/// returned as `Err` by the saver.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved(SaveSummary),
    Failed(SaveError),
    /// The user interrupted the save before any byte reached the target.
    Cancelled,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn summary(&self) -> Option<&SaveSummary> {
        match self {
            Self::Saved(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SaveError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}
