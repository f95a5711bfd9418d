//! Error reporting.
//!
//! Every failure the saver catches goes through one [`ErrorReporter`]. The
//! reporter always logs; unless asked to stay silent it also shows the error
//! through the injected [`Notifier`], which a UI implements as a dialog.

use std::fmt;
use std::sync::Arc;

use docsave_model::Reportable;

/// Shows blocking error messages to the user.
pub trait Notifier: Send + Sync {
    fn error(&self, title: &str, message: &str);
}

/// Notifier for headless use: the message only reaches the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, title: &str, message: &str) {
        tracing::warn!(title = title, "{message}");
    }
}

/// Routes caught errors to the log and, optionally, the user.
#[derive(Clone)]
pub struct ErrorReporter {
    notifier: Arc<dyn Notifier>,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::headless()
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter").finish_non_exhaustive()
    }
}

impl ErrorReporter {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Reporter that only logs.
    pub fn headless() -> Self {
        Self::new(Arc::new(LogNotifier))
    }

    /// Log `error` and, unless `silent`, show it to the user.
    pub fn handle<E: Reportable>(&self, error: &E, silent: bool) {
        tracing::error!(
            error = %error,
            cause = %source_chain(error),
            silent,
            "{}",
            error.title()
        );
        if silent {
            return;
        }

        let mut message = error.user_message();
        if let Some(suggestion) = error.suggestion() {
            message.push_str("\n\n");
            message.push_str(&suggestion);
        }
        self.notifier.error(error.title(), &message);
    }
}

/// Causes of `error` joined with `: `, empty when there are none.
fn source_chain(error: &dyn std::error::Error) -> String {
    let mut causes = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes.join(": ")
}
