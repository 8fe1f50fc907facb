//! Error types for citation marker formatting.

use citemark_diagnostics::{DiagnosticMessage, DiagnosticMessageBuilder};
use thiserror::Error;

/// Result type alias for citemark operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The style could not be loaded or is not valid.
    #[error(transparent)]
    Style(#[from] citemark_style::Error),

    /// Two adjacent citations render identically but cite different sources.
    #[error(
        "Citations '{first_key}' and '{second_key}' both render as '{marker}' and cannot be told apart"
    )]
    NonUniqueCitation {
        first_key: String,
        second_key: String,
        marker: String,
    },

    /// An author cap the formatter does not support.
    #[error("Unsupported author cap {value} for {context}")]
    InvalidAuthorCap { value: i32, context: String },

    /// A citation entry with a record but no collection, or the reverse.
    #[error("Citation '{key}' has a record without its collection, or a collection without a record")]
    InconsistentLookup { key: String },

    #[error("Expected {expected} page info values, found {found}")]
    PageInfoLengthMismatch { expected: usize, found: usize },

    /// A broken internal invariant. Always a bug in citemark.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convert this error to a DiagnosticMessage.
    ///
    /// Formatting errors use CM-2-*; style errors keep their CM-1-* codes.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            Error::Style(e) => e.to_diagnostic(),

            Error::NonUniqueCitation {
                first_key,
                second_key,
                marker,
            } => DiagnosticMessageBuilder::error("Non-unique Citation")
                .with_code("CM-2-1")
                .problem(format!("Two citations render as `{}`", marker))
                .add_detail(format!(
                    "`{}` and `{}` have the same authors, year and disambiguation letter",
                    first_key, second_key
                ))
                .add_hint("Assign distinct disambiguation letters before rendering?")
                .build(),

            Error::InvalidAuthorCap { value, context } => {
                DiagnosticMessageBuilder::error("Invalid Author Cap")
                    .with_code("CM-2-2")
                    .problem(format!("Author cap `{}` is not supported for {}", value, context))
                    .add_info("Supported values are `-1` (no limit) and positive counts")
                    .build()
            }

            Error::InconsistentLookup { key } => {
                DiagnosticMessageBuilder::error("Inconsistent Lookup")
                    .with_code("CM-2-3")
                    .problem(format!(
                        "Citation `{}` has only one half of its record lookup",
                        key
                    ))
                    .add_info("A resolved citation needs both its record and the collection it came from")
                    .build()
            }

            Error::PageInfoLengthMismatch { expected, found } => {
                DiagnosticMessageBuilder::error("Page Info Length Mismatch")
                    .with_code("CM-2-4")
                    .problem(format!(
                        "{} citation numbers were given with {} page info values",
                        expected, found
                    ))
                    .add_hint("Pass one page info value (or `None`) per number?")
                    .build()
            }

            Error::Internal(message) => DiagnosticMessageBuilder::error("Internal Error")
                .with_code("CM-2-99")
                .problem(message.clone())
                .add_note("This is a bug in citemark")
                .build(),
        }
    }
}
