//! Terminal notices on stderr.

use console::{style, Term};
use indicatif::ProgressBar;

use crate::domain::ports::{Notice, NoticeLevel, Notifier};

/// Prints notices to stderr and mirrors them into the log.
///
/// Stdout stays reserved for command output so `--json` remains parseable.
/// When a spinner is attached, it is suspended while a notice prints.
#[derive(Clone)]
pub struct ConsoleNotifier {
    term: Term,
    quiet: bool,
    progress: Option<ProgressBar>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            quiet: false,
            progress: None,
        }
    }

    /// Only log notices; print nothing.
    pub fn quiet() -> Self {
        Self {
            term: Term::stderr(),
            quiet: true,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    fn format(notice: &Notice) -> String {
        match notice.level {
            NoticeLevel::Info => format!("{} {}", style("•").cyan(), notice.message),
            NoticeLevel::Success => format!("{} {}", style("✓").green().bold(), notice.message),
            NoticeLevel::Warning => format!("{} {}", style("!").yellow().bold(), notice.message),
            NoticeLevel::Error => format!("{} {}", style("✗").red().bold(), notice.message),
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(text = %notice.message, "user notice");
            }
            NoticeLevel::Warning => tracing::warn!(text = %notice.message, "user notice"),
            NoticeLevel::Error => tracing::error!(text = %notice.message, "user notice"),
        }

        if self.quiet {
            return;
        }
        let line = Self::format(&notice);
        // A closed stderr is not worth failing the sync over.
        match &self.progress {
            Some(progress) => progress.suspend(|| {
                let _ = self.term.write_line(&line);
            }),
            None => {
                let _ = self.term.write_line(&line);
            }
        }
    }
}
