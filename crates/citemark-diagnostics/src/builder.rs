//! Builder API for diagnostic messages.
//!
//! The builder encodes the tidyverse layout: a title, one problem statement,
//! a few bulleted details and optional hints.
//!
//! # Example
//!
//! ```
//! use citemark_diagnostics::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::error("Non-unique Citation")
//!     .with_code("CM-2-1")
//!     .problem("Two citations render identically")
//!     .add_detail("`smith2020a` and `smith2020b` both render as `Smith, 2020`")
//!     .add_hint("Assign distinct disambiguation letters?")
//!     .build();
//!
//! assert_eq!(msg.code.as_deref(), Some("CM-2-1"));
//! assert_eq!(msg.details.len(), 1);
//! ```

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
use crate::source::SourceInfo;

#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        DiagnosticMessageBuilder {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.message.location = Some(location);
        self
    }

    /// Set the problem statement. Calling this twice keeps the last one.
    pub fn problem(mut self, problem: impl Into<MessageContent>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    /// Add an error detail (✖ bullet).
    pub fn add_detail(self, detail: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Error, detail.into(), None)
    }

    /// Add an error detail pointing at a second source location.
    pub fn add_detail_at(self, detail: impl Into<MessageContent>, location: SourceInfo) -> Self {
        self.push_detail(DetailKind::Error, detail.into(), Some(location))
    }

    /// Add an info detail (ℹ bullet).
    pub fn add_info(self, info: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Info, info.into(), None)
    }

    /// Add a note detail (• bullet).
    pub fn add_note(self, note: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Note, note.into(), None)
    }

    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }

    fn push_detail(
        mut self,
        kind: DetailKind,
        content: MessageContent,
        location: Option<SourceInfo>,
    ) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content,
            location,
        });
        self
    }
}
