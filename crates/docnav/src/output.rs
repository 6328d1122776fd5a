//! Styled messages on stderr.

use std::fmt::Display;

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn emit(&self, style: &Style, msg: impl Display) {
        // A closed stderr leaves nowhere to report to.
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }

    pub(crate) fn info(&self, msg: impl Display) {
        self.emit(&Style::new(), msg);
    }

    pub(crate) fn success(&self, msg: impl Display) {
        self.emit(&Style::new().green(), msg);
    }

    pub(crate) fn warning(&self, msg: impl Display) {
        self.emit(&Style::new().yellow(), msg);
    }

    pub(crate) fn error(&self, msg: impl Display) {
        self.emit(&Style::new().red(), msg);
    }

    /// Secondary detail, dimmed.
    pub(crate) fn muted(&self, msg: impl Display) {
        self.emit(&Style::new().dim(), msg);
    }
}
