//! Error dialogs rendered on the terminal.

use docsave_core::Notifier;

/// Prints error dialogs to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn error(&self, title: &str, message: &str) {
        eprintln!("{}", render_dialog(title, message));
    }
}

/// Title line, underline, then the message.
pub fn render_dialog(title: &str, message: &str) -> String {
    format!("{title}\n{}\n{message}", "-".repeat(title.chars().count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_dialog() {
        assert_eq!(
            render_dialog("Save Failed", "Disk full."),
            "Save Failed\n-----------\nDisk full."
        );
    }
}
