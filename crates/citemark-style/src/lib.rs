//! Citation style descriptions.
//!
//! A style file declares, in five line-oriented sections, how citation
//! markers and bibliography entries look:
//!
//! - `NAME`: the style's display name
//! - `LAYOUT`: `type=template` reference layouts, one of them `default`
//! - `PROPERTIES`: general options such as the bibliography title
//! - `CITATION`: marker options (brackets, separators, author caps)
//! - `JOURNALS`: journals the style is meant for
//!
//! # Example
//!
//! ```
//! use citemark_style::parse_style_with_log;
//!
//! let parsed = parse_style_with_log(
//!     "NAME\nDemo\n\nLAYOUT\ndefault=\\author (\\year)\n\nCITATION\nMaxAuthors=2\nMaxAuthor=1\n",
//! );
//! assert!(parsed.style.is_valid());
//! assert_eq!(parsed.style.citation.max_authors, 2);
//! assert_eq!(parsed.log.len(), 1);
//! ```

pub mod error;
pub mod layout;
pub mod parser;
pub mod style;
pub mod types;

pub use error::{Error, Result};
pub use layout::{FieldSource, LayoutRenderer, LayoutTemplate, LayoutToken, PlainRenderer};
pub use parser::{
    ParseLog, ParseWarning, ParseWarningKind, ParsedStyle, Section, parse_style,
    parse_style_with_log,
};
pub use style::Style;
pub use types::{
    CitationProperties, EntryType, FieldList, PropertyIssue, StandardEntryType, StyleProperties,
};
