//! Terminal messages on stderr.

use std::path::Path;

use console::{Style, Term};
use rv_review::ConvertSummary;

/// Terminal output formatter.
///
/// Everything goes to stderr; the converted markup only ever lands in the
/// output file.
pub(crate) struct Output {
    term: Term,
    path: Style,
    ok: Style,
    failure: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            path: Style::new().cyan().bold(),
            ok: Style::new().green(),
            failure: Style::new().red(),
        }
    }

    /// Announce the document being converted.
    pub(crate) fn converting(&self, input: &Path) {
        let line = format!("Converting {}", self.path.apply_to(input.display()));
        let _ = self.term.write_line(&line);
    }

    /// Report a finished conversion (green).
    pub(crate) fn converted(&self, target: &Path, summary: &ConvertSummary) {
        let line = format!(
            "Wrote {} ({} lines, {} images, {} footnotes)",
            target.display(),
            summary.lines,
            summary.images,
            summary.footnotes
        );
        let _ = self.term.write_line(&self.ok.apply_to(line).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.failure.apply_to(msg).to_string());
    }
}
