//! Structured diagnostics for citemark.
//!
//! Every error and warning produced while loading a citation style or
//! rendering citation markers can be turned into a [`DiagnosticMessage`]:
//! a titled message with a stable code (`CM-<subsystem>-<n>`), a problem
//! statement, bulleted details and hints.
//!
//! Messages render three ways:
//! - [`DiagnosticMessage::to_text`]: tidyverse-style text, or an ariadne
//!   snippet when the message has a location and a [`SourceContext`] is given
//! - [`DiagnosticMessage::to_json`]: machine-readable JSON
//! - `serde` serialization of the message itself
//!
//! # Example
//!
//! ```
//! use citemark_diagnostics::{DiagnosticMessageBuilder, FileId, SourceContext, SourceInfo};
//!
//! let text = "CITATION\nMaxAuthors=three\n";
//! let mut ctx = SourceContext::new();
//! let file = ctx.add_file("apa.jstyle".to_string(), Some(text.to_string()));
//!
//! let msg = DiagnosticMessageBuilder::warning("Invalid Property Value")
//!     .with_code("CM-1-12")
//!     .with_location(SourceInfo::from_offsets(file, text, 9, 25))
//!     .problem("`MaxAuthors` must be an integer")
//!     .build();
//!
//! assert!(msg.to_text(Some(&ctx)).contains("apa.jstyle"));
//! assert!(msg.to_text(None).starts_with("Warning [CM-1-12]"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;
pub mod source;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_docs_url, get_error_info, get_subsystem};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
pub use source::{FileId, Location, Range, SourceContext, SourceFile, SourceInfo};
