//! A single check outcome and its protocol rendering.

use std::borrow::Cow;

use crate::error::Error;

/// The outcome of one check, as submitted to a [`Reporter`](crate::Reporter).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Check {
    /// Whether the check passed.
    pub is_ok: bool,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Reason for skipping the check, if skipped.
    pub skip: Option<String>,
    /// Reason the check is expected to fail, if marked TODO.
    pub todo: Option<String>,
}

impl Check {
    /// Creates a check with the given outcome and no description or directive.
    pub const fn new(is_ok: bool) -> Self {
        Self {
            is_ok,
            description: None,
            skip: None,
            todo: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the check as skipped for the given reason.
    #[must_use]
    pub fn with_skip(mut self, reason: impl Into<String>) -> Self {
        self.skip = Some(reason.into());
        self
    }

    /// Marks the check as TODO for the given reason.
    #[must_use]
    pub fn with_todo(mut self, reason: impl Into<String>) -> Self {
        self.todo = Some(reason.into());
        self
    }

    /// Returns an error if the check carries more than one directive.
    pub(crate) const fn validate(&self) -> Result<(), Error> {
        if self.skip.is_some() && self.todo.is_some() {
            Err(Error::ConflictingDirective)
        } else {
            Ok(())
        }
    }

    /// Returns whether this outcome counts toward the suite's failures. TODO checks never do.
    pub const fn counts_as_failure(&self) -> bool {
        self.todo.is_none() && !self.is_ok
    }

    /// Renders the protocol line for this check at the given sequence number.
    pub fn render(&self, seq: usize) -> String {
        let mut line = format!("{} {seq}", if self.is_ok { "ok" } else { "not ok" });

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            line.push_str(" - ");
            line.push_str(&escape_text(description));
        }

        if let Some(reason) = &self.skip {
            line.push_str(" # SKIP ");
            line.push_str(&escape_text(reason));
        }

        if let Some(reason) = &self.todo {
            line.push_str(if self.is_ok {
                " # TODO - UNEXPECTED SUCCESS - "
            } else {
                " # TODO "
            });
            line.push_str(&escape_text(reason));
        }

        line
    }
}

// A bare '#' would start a directive, and a newline would end the line early.
fn escape_text(text: &str) -> Cow<'_, str> {
    if text.contains(['#', '\n', '\r']) {
        Cow::Owned(
            text.replace('#', "\\#")
                .replace("\r\n", " ")
                .replace(['\n', '\r'], " "),
        )
    } else {
        Cow::Borrowed(text)
    }
}
