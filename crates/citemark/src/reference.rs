//! The read-only view of bibliographic records that formatting needs.
//!
//! Callers own their records. Anything implementing [`Record`] and
//! [`RecordCollection`] can be cited; [`BibEntry`] and [`BibDatabase`] are
//! a small in-memory implementation that deserializes from JSON:
//!
//! ```json
//! [
//!   { "key": "smith2020", "type": "article",
//!     "fields": { "author": "John Smith", "year": "2020" } }
//! ]
//! ```

use crate::latex::to_unicode;
use citemark_style::{EntryType, FieldSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One bibliographic record.
pub trait Record {
    fn citation_key(&self) -> &str;

    fn entry_type(&self) -> EntryType;

    /// The raw value of `name` (lower case), without crossref resolution.
    fn field(&self, name: &str) -> Option<&str>;
}

/// The collection a record was looked up in.
pub trait RecordCollection {
    fn record(&self, key: &str) -> Option<&dyn Record>;

    /// The value of `name` for `record`, falling back to the record's
    /// `crossref` parent. A missing `year` is derived from `date`.
    fn resolved_field(&self, record: &dyn Record, name: &str) -> Option<String> {
        if let Some(value) = own_field(record, name) {
            return Some(value);
        }
        let parent = record
            .field("crossref")
            .and_then(|key| self.record(key.trim()))?;
        own_field(parent, name)
    }
}

fn own_field(record: &dyn Record, name: &str) -> Option<String> {
    if let Some(value) = record.field(name) {
        return Some(value.to_string());
    }
    if name == "year" {
        return record.field("date").and_then(year_from_date);
    }
    None
}

/// `2016-05-01`, `2016/05` and `2016` all give `2016`.
fn year_from_date(date: &str) -> Option<String> {
    let year = date.trim().split(['-', '/']).next()?.trim();
    if year.is_empty() {
        None
    } else {
        Some(year.to_string())
    }
}

/// A record stored in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibEntry {
    #[serde(alias = "id")]
    pub key: String,

    #[serde(rename = "type", default = "default_entry_type")]
    pub entry_type: String,

    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

fn default_entry_type() -> String {
    "misc".to_string()
}

impl BibEntry {
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        BibEntry {
            key: key.into(),
            entry_type: entry_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter. Field names are stored lower case.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_lowercase(), value.into());
        self
    }
}

impl Record for BibEntry {
    fn citation_key(&self) -> &str {
        &self.key
    }

    fn entry_type(&self) -> EntryType {
        EntryType::parse(&self.entry_type)
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }
}

/// An in-memory record collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BibDatabase {
    entries: Vec<BibEntry>,
}

impl BibDatabase {
    pub fn new() -> Self {
        BibDatabase::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Add an entry, replacing any entry with the same key.
    pub fn insert(&mut self, entry: BibEntry) {
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, key: &str) -> Option<&BibEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BibEntry> {
        self.entries.iter()
    }
}

impl FromIterator<BibEntry> for BibDatabase {
    fn from_iter<I: IntoIterator<Item = BibEntry>>(iter: I) -> Self {
        let mut db = BibDatabase::new();
        for entry in iter {
            db.insert(entry);
        }
        db
    }
}

impl RecordCollection for BibDatabase {
    fn record(&self, key: &str) -> Option<&dyn Record> {
        self.get(key).map(|e| e as &dyn Record)
    }
}

/// A record's resolved fields decoded to Unicode, for layout rendering.
pub struct RecordFields<'a> {
    pub record: &'a dyn Record,
    pub collection: &'a dyn RecordCollection,
}

impl FieldSource for RecordFields<'_> {
    fn field(&self, name: &str) -> Option<String> {
        self.collection
            .resolved_field(self.record, name)
            .map(|value| to_unicode(&value))
    }
}
