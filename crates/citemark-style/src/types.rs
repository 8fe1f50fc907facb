//! Typed style configuration: entry types and the two property sections.
//!
//! Style files carry free-form `name=value` lines. Here those are mapped onto
//! closed structs with documented defaults; [`StyleProperties::apply`] and
//! [`CitationProperties::apply`] are the only way a raw line reaches them.

use serde::Serialize;
use std::fmt;

/// Entry types with a fixed spelling in BibTeX and biblatex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardEntryType {
    Article,
    Book,
    Booklet,
    Collection,
    Conference,
    Dataset,
    Electronic,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    Online,
    Patent,
    Periodical,
    PhdThesis,
    Proceedings,
    Report,
    Software,
    TechReport,
    Thesis,
    Unpublished,
}

impl StandardEntryType {
    pub const ALL: [StandardEntryType; 23] = [
        StandardEntryType::Article,
        StandardEntryType::Book,
        StandardEntryType::Booklet,
        StandardEntryType::Collection,
        StandardEntryType::Conference,
        StandardEntryType::Dataset,
        StandardEntryType::Electronic,
        StandardEntryType::InBook,
        StandardEntryType::InCollection,
        StandardEntryType::InProceedings,
        StandardEntryType::Manual,
        StandardEntryType::MastersThesis,
        StandardEntryType::Misc,
        StandardEntryType::Online,
        StandardEntryType::Patent,
        StandardEntryType::Periodical,
        StandardEntryType::PhdThesis,
        StandardEntryType::Proceedings,
        StandardEntryType::Report,
        StandardEntryType::Software,
        StandardEntryType::TechReport,
        StandardEntryType::Thesis,
        StandardEntryType::Unpublished,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StandardEntryType::Article => "article",
            StandardEntryType::Book => "book",
            StandardEntryType::Booklet => "booklet",
            StandardEntryType::Collection => "collection",
            StandardEntryType::Conference => "conference",
            StandardEntryType::Dataset => "dataset",
            StandardEntryType::Electronic => "electronic",
            StandardEntryType::InBook => "inbook",
            StandardEntryType::InCollection => "incollection",
            StandardEntryType::InProceedings => "inproceedings",
            StandardEntryType::Manual => "manual",
            StandardEntryType::MastersThesis => "mastersthesis",
            StandardEntryType::Misc => "misc",
            StandardEntryType::Online => "online",
            StandardEntryType::Patent => "patent",
            StandardEntryType::Periodical => "periodical",
            StandardEntryType::PhdThesis => "phdthesis",
            StandardEntryType::Proceedings => "proceedings",
            StandardEntryType::Report => "report",
            StandardEntryType::Software => "software",
            StandardEntryType::TechReport => "techreport",
            StandardEntryType::Thesis => "thesis",
            StandardEntryType::Unpublished => "unpublished",
        }
    }
}

/// The entry type a reference layout applies to.
///
/// Names outside the standard list are kept, lower-cased, so a style can
/// still address custom types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryType {
    Known(StandardEntryType),
    Unknown(String),
}

impl EntryType {
    /// Resolve a type name case-insensitively.
    ///
    /// ```
    /// use citemark_style::{EntryType, StandardEntryType};
    ///
    /// assert_eq!(EntryType::parse("Article"), EntryType::Known(StandardEntryType::Article));
    /// assert_eq!(EntryType::parse("Podcast"), EntryType::Unknown("podcast".into()));
    /// ```
    pub fn parse(name: &str) -> EntryType {
        let lower = name.trim().to_lowercase();
        StandardEntryType::ALL
            .iter()
            .find(|t| t.as_str() == lower)
            .map_or(EntryType::Unknown(lower), |t| EntryType::Known(*t))
    }

    pub fn name(&self) -> &str {
        match self {
            EntryType::Known(t) => t.as_str(),
            EntryType::Unknown(name) => name,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `/`-separated list of record fields tried in order, e.g. `author/editor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldList(Vec<String>);

impl FieldList {
    pub fn parse(spec: &str) -> FieldList {
        FieldList(
            spec.split('/')
                .map(|f| f.trim().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|f| f.eq_ignore_ascii_case(field))
    }
}

/// Why a `name=value` line could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyIssue {
    /// The name is not a property of this section. `suggestion` is set when
    /// the name matches a known property ignoring case.
    Unknown { suggestion: Option<&'static str> },
    /// The value does not coerce to the property's type.
    InvalidValue { expected: &'static str },
}

/// Properties from the `PROPERTIES` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StyleProperties {
    pub title: String,
    pub sort_algorithm: String,
    pub is_sort_by_position: bool,
    pub is_number_entries: bool,
    pub reference_paragraph_format: String,
    pub reference_header_paragraph_format: String,
}

impl Default for StyleProperties {
    fn default() -> Self {
        StyleProperties {
            title: "Bibliography".to_string(),
            sort_algorithm: "alphanumeric".to_string(),
            is_sort_by_position: false,
            is_number_entries: false,
            reference_paragraph_format: "Standard".to_string(),
            reference_header_paragraph_format: "Heading 1".to_string(),
        }
    }
}

/// PROPERTIES keys that older styles carry but that change nothing here.
pub(crate) const UNUSED_STYLE_PROPERTIES: &[&str] =
    &["SortAlgorithm", "BracketBefore", "BracketAfter"];

const STYLE_PROPERTY_NAMES: &[&str] = &[
    "Title",
    "SortAlgorithm",
    "BracketBefore",
    "BracketAfter",
    "IsSortByPosition",
    "IsNumberEntries",
    "ReferenceParagraphFormat",
    "ReferenceHeaderParagraphFormat",
];

impl StyleProperties {
    /// Set the property `name` from its (already unquoted) value text.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), PropertyIssue> {
        match name {
            "Title" => self.title = value.to_string(),
            "SortAlgorithm" => self.sort_algorithm = value.to_string(),
            // Bracket pairs live in CITATION.
            "BracketBefore" | "BracketAfter" => {}
            "IsSortByPosition" => self.is_sort_by_position = bool_value(value)?,
            "IsNumberEntries" => self.is_number_entries = bool_value(value)?,
            "ReferenceParagraphFormat" => self.reference_paragraph_format = value.to_string(),
            "ReferenceHeaderParagraphFormat" => {
                self.reference_header_paragraph_format = value.to_string()
            }
            _ => return Err(unknown(name, STYLE_PROPERTY_NAMES)),
        }
        Ok(())
    }
}

/// Properties from the `CITATION` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CitationProperties {
    pub author_field: FieldList,
    pub year_field: FieldList,
    /// Author cap for repeated citations; `-1` shows every author.
    pub max_authors: i32,
    /// Author cap for the first citation of a source; `-1` shows every author.
    pub max_authors_first: i32,
    /// Names shown before the et-al text: `1`, or `-1` for "up to the cap".
    pub max_authors_before_et_al: i32,
    pub author_separator: String,
    pub author_last_separator: String,
    pub author_last_separator_in_text: Option<String>,
    pub oxford_comma: String,
    pub et_al_string: String,
    pub italic_et_al: bool,
    pub year_separator: String,
    pub in_text_year_separator: String,
    pub bracket_before: String,
    pub bracket_after: String,
    pub bracket_before_in_list: Option<String>,
    pub bracket_after_in_list: Option<String>,
    pub citation_separator: String,
    pub page_info_separator: String,
    pub grouped_numbers_separator: String,
    pub uniquefier_separator: String,
    pub minimum_grouping_count: i32,
    pub format_citations: bool,
    pub citation_character_format: String,
    pub italic_citations: bool,
    pub bold_citations: bool,
    pub superscript_citations: bool,
    pub subscript_citations: bool,
    pub multi_cite_chronological: bool,
    #[serde(rename = "BibTeXKeyCitations")]
    pub bibtex_key_citations: bool,
    pub citation_group_markup_before: String,
    pub citation_group_markup_after: String,
    pub authors_part_markup_before: String,
    pub authors_part_markup_after: String,
    pub author_names_list_markup_before: String,
    pub author_names_list_markup_after: String,
    pub author_name_markup_before: String,
    pub author_name_markup_after: String,
}

impl Default for CitationProperties {
    fn default() -> Self {
        CitationProperties {
            author_field: FieldList::parse("author/editor"),
            year_field: FieldList::parse("year"),
            max_authors: 3,
            max_authors_first: -1,
            max_authors_before_et_al: 1,
            author_separator: ", ".to_string(),
            author_last_separator: " & ".to_string(),
            author_last_separator_in_text: None,
            oxford_comma: String::new(),
            et_al_string: " et al.".to_string(),
            italic_et_al: false,
            year_separator: ", ".to_string(),
            in_text_year_separator: " ".to_string(),
            bracket_before: "(".to_string(),
            bracket_after: ")".to_string(),
            bracket_before_in_list: None,
            bracket_after_in_list: None,
            citation_separator: "; ".to_string(),
            page_info_separator: "; ".to_string(),
            grouped_numbers_separator: "-".to_string(),
            uniquefier_separator: ", ".to_string(),
            minimum_grouping_count: 3,
            format_citations: false,
            citation_character_format: "Standard".to_string(),
            italic_citations: false,
            bold_citations: false,
            superscript_citations: false,
            subscript_citations: false,
            multi_cite_chronological: true,
            bibtex_key_citations: false,
            citation_group_markup_before: String::new(),
            citation_group_markup_after: String::new(),
            authors_part_markup_before: String::new(),
            authors_part_markup_after: String::new(),
            author_names_list_markup_before: String::new(),
            author_names_list_markup_after: String::new(),
            author_name_markup_before: String::new(),
            author_name_markup_after: String::new(),
        }
    }
}

const CITATION_PROPERTY_NAMES: &[&str] = &[
    "AuthorField",
    "YearField",
    "MaxAuthors",
    "MaxAuthorsFirst",
    "MaxAuthorsBeforeEtAl",
    "AuthorSeparator",
    "AuthorLastSeparator",
    "AuthorLastSeparatorInText",
    "OxfordComma",
    "EtAlString",
    "ItalicEtAl",
    "YearSeparator",
    "InTextYearSeparator",
    "BracketBefore",
    "BracketAfter",
    "BracketBeforeInList",
    "BracketAfterInList",
    "CitationSeparator",
    "PageInfoSeparator",
    "GroupedNumbersSeparator",
    "UniquefierSeparator",
    "MinimumGroupingCount",
    "FormatCitations",
    "CitationCharacterFormat",
    "ItalicCitations",
    "BoldCitations",
    "SuperscriptCitations",
    "SubscriptCitations",
    "MultiCiteChronological",
    "BibTeXKeyCitations",
    "CitationGroupMarkupBefore",
    "CitationGroupMarkupAfter",
    "AuthorsPartMarkupBefore",
    "AuthorsPartMarkupAfter",
    "AuthorNamesListMarkupBefore",
    "AuthorNamesListMarkupAfter",
    "AuthorNameMarkupBefore",
    "AuthorNameMarkupAfter",
];

impl CitationProperties {
    /// Set the property `name` from its (already unquoted) value text.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), PropertyIssue> {
        let text = || value.to_string();
        match name {
            "AuthorField" => self.author_field = FieldList::parse(value),
            "YearField" => self.year_field = FieldList::parse(value),
            "MaxAuthors" => self.max_authors = int_value(value)?,
            "MaxAuthorsFirst" => self.max_authors_first = int_value(value)?,
            "MaxAuthorsBeforeEtAl" => self.max_authors_before_et_al = int_value(value)?,
            "AuthorSeparator" => self.author_separator = text(),
            "AuthorLastSeparator" => self.author_last_separator = text(),
            "AuthorLastSeparatorInText" => self.author_last_separator_in_text = Some(text()),
            "OxfordComma" => self.oxford_comma = text(),
            "EtAlString" => self.et_al_string = text(),
            "ItalicEtAl" => self.italic_et_al = bool_value(value)?,
            "YearSeparator" => self.year_separator = text(),
            "InTextYearSeparator" => self.in_text_year_separator = text(),
            "BracketBefore" => self.bracket_before = text(),
            "BracketAfter" => self.bracket_after = text(),
            "BracketBeforeInList" => self.bracket_before_in_list = Some(text()),
            "BracketAfterInList" => self.bracket_after_in_list = Some(text()),
            "CitationSeparator" => self.citation_separator = text(),
            "PageInfoSeparator" => self.page_info_separator = text(),
            "GroupedNumbersSeparator" => self.grouped_numbers_separator = text(),
            "UniquefierSeparator" => self.uniquefier_separator = text(),
            "MinimumGroupingCount" => self.minimum_grouping_count = int_value(value)?,
            "FormatCitations" => self.format_citations = bool_value(value)?,
            "CitationCharacterFormat" => self.citation_character_format = text(),
            "ItalicCitations" => self.italic_citations = bool_value(value)?,
            "BoldCitations" => self.bold_citations = bool_value(value)?,
            "SuperscriptCitations" => self.superscript_citations = bool_value(value)?,
            "SubscriptCitations" => self.subscript_citations = bool_value(value)?,
            "MultiCiteChronological" => self.multi_cite_chronological = bool_value(value)?,
            "BibTeXKeyCitations" => self.bibtex_key_citations = bool_value(value)?,
            "CitationGroupMarkupBefore" => self.citation_group_markup_before = text(),
            "CitationGroupMarkupAfter" => self.citation_group_markup_after = text(),
            "AuthorsPartMarkupBefore" => self.authors_part_markup_before = text(),
            "AuthorsPartMarkupAfter" => self.authors_part_markup_after = text(),
            "AuthorNamesListMarkupBefore" => self.author_names_list_markup_before = text(),
            "AuthorNamesListMarkupAfter" => self.author_names_list_markup_after = text(),
            "AuthorNameMarkupBefore" => self.author_name_markup_before = text(),
            "AuthorNameMarkupAfter" => self.author_name_markup_after = text(),
            _ => return Err(unknown(name, CITATION_PROPERTY_NAMES)),
        }
        Ok(())
    }

    /// The last-author separator for in-text markers.
    pub fn author_last_separator_in_text(&self) -> &str {
        self.author_last_separator_in_text
            .as_deref()
            .unwrap_or(&self.author_last_separator)
    }

    /// Opening bracket for bibliography labels.
    pub fn bracket_before_in_list(&self) -> &str {
        self.bracket_before_in_list
            .as_deref()
            .unwrap_or(&self.bracket_before)
    }

    /// Closing bracket for bibliography labels.
    pub fn bracket_after_in_list(&self) -> &str {
        self.bracket_after_in_list
            .as_deref()
            .unwrap_or(&self.bracket_after)
    }

    /// The et-al text, wrapped in `<i>` when `ItalicEtAl` is set.
    pub fn et_al_text(&self) -> String {
        if self.italic_et_al {
            format!("<i>{}</i>", self.et_al_string)
        } else {
            self.et_al_string.clone()
        }
    }
}

/// Whether `value` is an optionally negative run of ASCII digits.
pub(crate) fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn int_value(value: &str) -> Result<i32, PropertyIssue> {
    let invalid = PropertyIssue::InvalidValue {
        expected: "integer",
    };
    let trimmed = value.trim();
    if !is_integer(trimmed) {
        return Err(invalid);
    }
    trimmed.parse().map_err(|_| invalid)
}

fn bool_value(value: &str) -> Result<bool, PropertyIssue> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(PropertyIssue::InvalidValue {
            expected: "boolean",
        })
    }
}

fn unknown(name: &str, known: &[&'static str]) -> PropertyIssue {
    PropertyIssue::Unknown {
        suggestion: known
            .iter()
            .find(|k| k.eq_ignore_ascii_case(name))
            .copied(),
    }
}
