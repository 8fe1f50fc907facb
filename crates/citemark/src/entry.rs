//! What the formatters need to know about each citation.

use crate::error::{Error, Result};
use crate::reference::{Record, RecordCollection};

/// A record together with the collection it was found in.
#[derive(Clone, Copy)]
pub struct LookupResult<'a> {
    pub record: &'a dyn Record,
    pub collection: &'a dyn RecordCollection,
}

impl std::fmt::Debug for LookupResult<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupResult")
            .field("record", &self.record.citation_key())
            .finish_non_exhaustive()
    }
}

/// One citation in an author-year citation group.
///
/// Implement this for a caller-side citation type, or use [`Citation`].
pub trait CitationEntry {
    fn citation_key(&self) -> &str;

    /// `None` when the key could not be resolved.
    fn lookup(&self) -> Option<LookupResult<'_>>;

    /// Disambiguation suffix such as `a`.
    fn unique_letter(&self) -> Option<&str>;

    /// Per-citation annotation such as a page range.
    fn page_info(&self) -> Option<&str>;

    fn is_first_appearance(&self) -> bool;
}

/// Trim page info; empty means none.
pub(crate) fn normalize_page_info(page_info: Option<&str>) -> Option<String> {
    page_info
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// The owned [`CitationEntry`] implementation.
#[derive(Debug, Clone)]
pub struct Citation<'a> {
    key: String,
    lookup: Option<LookupResult<'a>>,
    unique_letter: Option<String>,
    page_info: Option<String>,
    first_appearance: bool,
}

impl<'a> Citation<'a> {
    /// A citation of `record`, keyed by the record's citation key.
    pub fn resolved(record: &'a dyn Record, collection: &'a dyn RecordCollection) -> Self {
        Citation {
            key: record.citation_key().to_string(),
            lookup: Some(LookupResult { record, collection }),
            unique_letter: None,
            page_info: None,
            first_appearance: false,
        }
    }

    pub fn unresolved(key: impl Into<String>) -> Self {
        Citation {
            key: key.into(),
            lookup: None,
            unique_letter: None,
            page_info: None,
            first_appearance: false,
        }
    }

    /// Build a citation from separately looked-up halves.
    ///
    /// Both halves or neither must be present; anything else is
    /// [`Error::InconsistentLookup`].
    pub fn from_parts(
        key: impl Into<String>,
        record: Option<&'a dyn Record>,
        collection: Option<&'a dyn RecordCollection>,
    ) -> Result<Self> {
        let key = key.into();
        let lookup = match (record, collection) {
            (Some(record), Some(collection)) => Some(LookupResult { record, collection }),
            (None, None) => None,
            _ => return Err(Error::InconsistentLookup { key }),
        };
        Ok(Citation {
            key,
            lookup,
            unique_letter: None,
            page_info: None,
            first_appearance: false,
        })
    }

    /// Look `key` up in `collection`; unknown keys give an unresolved citation.
    pub fn lookup_in(key: &str, collection: &'a dyn RecordCollection) -> Self {
        match collection.record(key) {
            Some(record) => Citation {
                key: key.to_string(),
                lookup: Some(LookupResult { record, collection }),
                unique_letter: None,
                page_info: None,
                first_appearance: false,
            },
            None => Citation::unresolved(key),
        }
    }

    pub fn with_unique_letter(mut self, letter: impl Into<String>) -> Self {
        self.unique_letter = Some(letter.into());
        self
    }

    pub fn with_page_info(mut self, page_info: &str) -> Self {
        self.page_info = normalize_page_info(Some(page_info));
        self
    }

    pub fn first_appearance(mut self, first: bool) -> Self {
        self.first_appearance = first;
        self
    }
}

impl CitationEntry for Citation<'_> {
    fn citation_key(&self) -> &str {
        &self.key
    }

    fn lookup(&self) -> Option<LookupResult<'_>> {
        self.lookup
    }

    fn unique_letter(&self) -> Option<&str> {
        self.unique_letter.as_deref()
    }

    fn page_info(&self) -> Option<&str> {
        self.page_info.as_deref()
    }

    fn is_first_appearance(&self) -> bool {
        self.first_appearance
    }
}

/// What to do when two adjacent citations cannot be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonUniqueHandling {
    /// Render both, e.g. for previews before letters are assigned.
    #[default]
    Forgiving,
    /// Fail with [`Error::NonUniqueCitation`].
    Throwing,
}

/// A citation number and its annotation, for numeric markers.
///
/// Number `0` means the citation could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedCitation {
    pub number: u32,
    pub page_info: Option<String>,
    pub key: Option<String>,
}

impl NumberedCitation {
    pub fn new(number: u32) -> Self {
        NumberedCitation {
            number,
            page_info: None,
            key: None,
        }
    }

    /// An unresolved citation, rendered as `??key`.
    pub fn unresolved(key: impl Into<String>) -> Self {
        NumberedCitation {
            number: 0,
            page_info: None,
            key: Some(key.into()),
        }
    }

    pub fn with_page_info(mut self, page_info: &str) -> Self {
        self.page_info = normalize_page_info(Some(page_info));
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn is_unresolved(&self) -> bool {
        self.number == 0
    }
}
