//! Citation markers driven by a [`citemark_style::Style`].
//!
//! Two formatters cover the two citation families:
//!
//! - [`AuthorYearMarkerFormatter`] renders `(Smith, 2020a, b; Jones, 2019)`
//!   or `Smith (2020a, b)`, merging adjacent citations of the same work.
//! - [`NumericMarkerFormatter`] renders `[1-3; 7]`, compressing runs of
//!   consecutive numbers into ranges.
//!
//! Records are supplied by the caller through the [`Record`] and
//! [`RecordCollection`] traits; [`BibDatabase`] is a ready-made in-memory
//! collection.
//!
//! # Example
//!
//! ```
//! use citemark::{AuthorYearMarkerFormatter, BibDatabase, BibEntry, Citation, NonUniqueHandling};
//! use citemark_style::parse_style;
//!
//! let style = parse_style("LAYOUT\ndefault=\\title\n\nCITATION\nMaxAuthors=2\n");
//! let db: BibDatabase = [
//!     BibEntry::new("s1", "article").with_field("author", "Ann Smith").with_field("year", "2020"),
//!     BibEntry::new("s2", "article").with_field("author", "Ann Smith").with_field("year", "2020"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let citations = [
//!     Citation::lookup_in("s1", &db).with_unique_letter("a"),
//!     Citation::lookup_in("s2", &db).with_unique_letter("b"),
//! ];
//! let formatter = AuthorYearMarkerFormatter::new(&style).unwrap();
//! let marker = formatter
//!     .citation_marker(&citations, true, NonUniqueHandling::Throwing)
//!     .unwrap();
//! assert_eq!(marker, "(Smith, 2020a, b)");
//! ```

pub mod author_year;
pub mod bibliography;
pub mod entry;
pub mod error;
pub mod latex;
pub mod names;
pub mod numeric;
pub mod reference;

pub use author_year::AuthorYearMarkerFormatter;
pub use bibliography::{format_reference, format_reference_with};
pub use entry::{Citation, CitationEntry, LookupResult, NonUniqueHandling, NumberedCitation};
pub use error::{Error, Result};
pub use names::{Author, AuthorList};
pub use numeric::NumericMarkerFormatter;
pub use reference::{BibDatabase, BibEntry, Record, RecordCollection, RecordFields};
