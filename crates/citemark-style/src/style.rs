//! The loaded style model.

use crate::error::{Error, Result};
use crate::layout::LayoutTemplate;
use crate::parser::{ParsedStyle, parse_style_with_log};
use crate::types::{CitationProperties, EntryType, StyleProperties};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A citation style, as read from a style-description file.
///
/// Formatters treat a `Style` as immutable. The only mutation is
/// [`Style::ensure_up_to_date`], which needs `&mut self`; owners sharing one
/// style across threads wrap it in their own lock.
#[derive(Debug, Clone)]
pub struct Style {
    /// Last line of the `NAME` section, empty if there is none.
    pub name: String,

    /// `PROPERTIES` section.
    pub properties: StyleProperties,

    /// `CITATION` section.
    pub citation: CitationProperties,

    /// The first `default=` layout.
    pub default_layout: Option<LayoutTemplate>,

    /// Every other layout line, keyed by entry type.
    pub layouts: HashMap<EntryType, LayoutTemplate>,

    /// `JOURNALS` section. Informational only.
    pub journals: BTreeSet<String>,

    /// The text this style was parsed from.
    pub source_text: String,

    pub(crate) valid: bool,
    backing: Option<BackingFile>,
}

#[derive(Debug, Clone)]
struct BackingFile {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl Style {
    pub(crate) fn empty(source_text: &str) -> Style {
        Style {
            name: String::new(),
            properties: StyleProperties::default(),
            citation: CitationProperties::default(),
            default_layout: None,
            layouts: HashMap::new(),
            journals: BTreeSet::new(),
            source_text: source_text.to_string(),
            valid: false,
            backing: None,
        }
    }

    /// Load a style from disk and remember the file for
    /// [`ensure_up_to_date`](Style::ensure_up_to_date).
    pub fn load(path: impl AsRef<Path>) -> Result<ParsedStyle> {
        let path = path.as_ref();
        let (text, modified) = read_backing(path)?;
        let mut parsed = parse_style_with_log(&text);
        parsed.style.backing = Some(BackingFile {
            path: path.to_path_buf(),
            modified,
        });
        Ok(parsed)
    }

    /// Like [`Style::load`], dropping the parse log.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Style> {
        Style::load(path).map(|parsed| parsed.style)
    }

    /// The backing file, for styles loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.backing.as_ref().map(|b| b.path.as_path())
    }

    /// Whether parsing found a section marker and a default layout.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// `Err(InvalidStyle)` unless the style is valid.
    pub fn check_valid(&self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::InvalidStyle {
                name: self.name.clone(),
            })
        }
    }

    /// The layout for `entry_type`, falling back to the default layout.
    pub fn reference_layout(&self, entry_type: &EntryType) -> Option<&LayoutTemplate> {
        self.layouts
            .get(entry_type)
            .or(self.default_layout.as_ref())
    }

    pub fn is_number_entries(&self) -> bool {
        self.properties.is_number_entries
    }

    pub fn is_sort_by_position(&self) -> bool {
        self.properties.is_sort_by_position
    }

    /// Whether the style has a file that changed since it was read.
    pub fn is_stale(&self) -> bool {
        match &self.backing {
            None => false,
            Some(backing) => modified_time(&backing.path) != backing.modified,
        }
    }

    /// Re-read the backing file if it changed since it was last read.
    ///
    /// Returns `Ok(true)` when the style was reloaded. Styles parsed from a
    /// string have no backing file and are always up to date. I/O failures
    /// are returned as-is and leave the style untouched.
    pub fn ensure_up_to_date(&mut self) -> Result<bool> {
        if !self.is_stale() {
            return Ok(false);
        }
        let Some(backing) = self.backing.take() else {
            return Ok(false);
        };
        match read_backing(&backing.path) {
            Ok((text, modified)) => {
                let mut reloaded = parse_style_with_log(&text).style;
                reloaded.backing = Some(BackingFile {
                    path: backing.path,
                    modified,
                });
                tracing::debug!(
                    path = %reloaded.path().map(|p| p.display().to_string()).unwrap_or_default(),
                    valid = reloaded.valid,
                    "reloaded style"
                );
                *self = reloaded;
                Ok(true)
            }
            Err(err) => {
                self.backing = Some(backing);
                Err(err)
            }
        }
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.properties == other.properties
            && self.citation == other.citation
            && self.default_layout == other.default_layout
            && self.layouts == other.layouts
            && self.journals == other.journals
            && self.path() == other.path()
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn read_backing(path: &Path) -> Result<(String, Option<SystemTime>)> {
    let modified = modified_time(path);
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((text, modified))
}
