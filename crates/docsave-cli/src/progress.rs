//! Terminal progress display.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use docsave_core::{ProgressSink, SaveUpdate};

/// Spinner on stderr that follows the steps of a save.
pub struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for SpinnerProgress {
    fn update(&mut self, update: &SaveUpdate) {
        match update {
            SaveUpdate::Started { target } => self.bar.set_message(format!("Saving {target}")),
            SaveUpdate::Step(step) => self.bar.set_message(step.label()),
            SaveUpdate::Serialized { bytes } => {
                self.bar.set_message(format!("Serialized {bytes} bytes"));
            }
        }
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}
