//! Error types for loading citation styles.

use citemark_diagnostics::{DiagnosticMessage, DiagnosticMessageBuilder};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for citemark-style operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The backing style file could not be read.
    #[error("Cannot read style file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The style has no default layout, so nothing may be formatted with it.
    #[error("Style '{name}' is not valid: no default layout was found")]
    InvalidStyle { name: String },
}

impl Error {
    /// Convert this error to a DiagnosticMessage.
    ///
    /// Style errors use CM-1-1 and CM-1-2; parse warnings continue at CM-1-10.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            Error::Io { path, source } => DiagnosticMessageBuilder::error("Style File I/O Error")
                .with_code("CM-1-1")
                .problem(format!("Cannot read `{}`", path.display()))
                .add_detail(source.to_string())
                .build(),

            Error::InvalidStyle { name } => DiagnosticMessageBuilder::error("Invalid Style")
                .with_code("CM-1-2")
                .problem(format!("Style `{}` has no default layout", name))
                .add_info("A style is valid only when its LAYOUT section has a `default=` line")
                .add_hint("Add a line such as `default=\\author (\\year). \\title` under LAYOUT?")
                .build(),
        }
    }
}
