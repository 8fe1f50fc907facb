//! Style-description parser.
//!
//! The format is line oriented:
//!
//! ```text
//! NAME
//! Example author-year style
//!
//! LAYOUT
//! default=\author (\year). \title
//! article=|\author (\year). |
//!         |<i>\journal</i>|
//!
//! PROPERTIES
//! Title="References"
//!
//! CITATION
//! MaxAuthors=2
//! BracketAfterInList="] "
//!
//! JOURNALS
//! Journal of Examples
//! ```
//!
//! Parsing is permissive: a line that cannot be used is skipped and a
//! [`ParseWarning`] is recorded, never an error.

use crate::layout::LayoutTemplate;
use crate::style::Style;
use crate::types::{EntryType, PropertyIssue, UNUSED_STYLE_PROPERTIES, is_integer};
use citemark_diagnostics::{
    DiagnosticMessage, DiagnosticMessageBuilder, FileId, SourceContext, SourceInfo,
};
use std::fmt;

const DEFAULT_LAYOUT_NAME: &str = "default";

/// The section a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    Name,
    Layout,
    Properties,
    Citation,
    Journals,
}

impl Section {
    fn from_marker(line: &str) -> Option<Section> {
        match line {
            "NAME" => Some(Section::Name),
            "LAYOUT" => Some(Section::Layout),
            "PROPERTIES" => Some(Section::Properties),
            "CITATION" => Some(Section::Citation),
            "JOURNALS" => Some(Section::Journals),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::None => "no section",
            Section::Name => "NAME",
            Section::Layout => "LAYOUT",
            Section::Properties => "PROPERTIES",
            Section::Citation => "CITATION",
            Section::Journals => "JOURNALS",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarningKind {
    /// No usable `=` in a property or layout line, or text before any section.
    MalformedLine { section: Section },
    UnknownProperty {
        section: Section,
        name: String,
        suggestion: Option<&'static str>,
    },
    InvalidPropertyValue {
        name: String,
        value: String,
        expected: &'static str,
    },
    /// Accepted and stored, but no formatter reads it.
    UnusedProperty { name: String },
    /// A second `default=` line. It is stored under the `default` entry type.
    DuplicateDefaultLayout,
    /// A multi-line layout part that opens with `|` and never closes.
    UnterminatedLayoutPart { entry_type: String },
}

/// A non-fatal problem found while parsing a style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub kind: ParseWarningKind,
    /// 1-based line number.
    pub line: usize,
    /// Location of the offending line, in file 0 of the log's context.
    pub location: SourceInfo,
}

impl ParseWarning {
    pub fn message(&self) -> String {
        match &self.kind {
            ParseWarningKind::MalformedLine {
                section: Section::None,
            } => "text outside of any section was ignored".to_string(),
            ParseWarningKind::MalformedLine { section } => {
                format!("{} line without a usable `=` was ignored", section)
            }
            ParseWarningKind::UnknownProperty { section, name, .. } => {
                format!("`{}` is not a {} property", name, section)
            }
            ParseWarningKind::InvalidPropertyValue {
                name,
                value,
                expected,
            } => format!("`{}` expects {}, found `{}`", name, expected, value),
            ParseWarningKind::UnusedProperty { name } => {
                format!("`{}` is accepted but has no effect", name)
            }
            ParseWarningKind::DuplicateDefaultLayout => {
                "a second `default` layout does not replace the first".to_string()
            }
            ParseWarningKind::UnterminatedLayoutPart { entry_type } => {
                format!("layout part for `{}` has no closing `|`", entry_type)
            }
        }
    }

    /// Convert this warning to a DiagnosticMessage (codes CM-1-10 to CM-1-15).
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let (title, code) = match &self.kind {
            ParseWarningKind::MalformedLine { .. } => ("Malformed Style Line", "CM-1-10"),
            ParseWarningKind::UnknownProperty { .. } => ("Unknown Property", "CM-1-11"),
            ParseWarningKind::InvalidPropertyValue { .. } => {
                ("Invalid Property Value", "CM-1-12")
            }
            ParseWarningKind::UnusedProperty { .. } => ("Unused Property", "CM-1-13"),
            ParseWarningKind::DuplicateDefaultLayout => ("Repeated Default Layout", "CM-1-14"),
            ParseWarningKind::UnterminatedLayoutPart { .. } => {
                ("Unterminated Layout Part", "CM-1-15")
            }
        };
        let mut builder = DiagnosticMessageBuilder::warning(title)
            .with_code(code)
            .with_location(self.location.clone())
            .problem(self.message());
        match &self.kind {
            ParseWarningKind::UnknownProperty {
                suggestion: Some(s),
                ..
            } => builder = builder.add_hint(format!("Did you mean `{}`?", s)),
            ParseWarningKind::InvalidPropertyValue { .. } => {
                builder = builder.add_note("The default value stays in force")
            }
            ParseWarningKind::DuplicateDefaultLayout => {
                builder = builder
                    .add_note("Only the first `default` line is used as the fallback layout")
            }
            _ => {}
        }
        builder.build()
    }
}

/// Warnings collected while parsing one style text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseLog {
    pub warnings: Vec<ParseWarning>,
}

impl ParseLog {
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseWarning> {
        self.warnings.iter()
    }

    pub fn diagnostics(&self) -> Vec<DiagnosticMessage> {
        self.warnings.iter().map(|w| w.to_diagnostic()).collect()
    }

    /// Render every warning with a source snippet, naming the file `path`.
    pub fn render(&self, path: &str, source: &str) -> String {
        let mut ctx = SourceContext::new();
        ctx.add_file(path.to_string(), Some(source.to_string()));
        self.warnings
            .iter()
            .map(|w| w.to_diagnostic().to_text(Some(&ctx)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A parsed style and the warnings found on the way.
#[derive(Debug, Clone)]
pub struct ParsedStyle {
    pub style: Style,
    pub log: ParseLog,
}

/// Parse a style, discarding warnings.
pub fn parse_style(text: &str) -> Style {
    parse_style_with_log(text).style
}

/// Parse a style and keep the warnings.
pub fn parse_style_with_log(text: &str) -> ParsedStyle {
    let mut parser = StyleParser::new(text);
    parser.run();
    let StyleParser { style, log, .. } = parser;
    tracing::debug!(
        name = %style.name,
        valid = style.valid,
        layouts = style.layouts.len() + usize::from(style.default_layout.is_some()),
        warnings = log.len(),
        "parsed style"
    );
    ParsedStyle { style, log }
}

#[derive(Clone, Copy)]
struct Line<'a> {
    text: &'a str,
    number: usize,
    start: usize,
}

struct PendingLayout<'a> {
    type_name: String,
    template: String,
    line: Line<'a>,
}

struct StyleParser<'a> {
    source: &'a str,
    style: Style,
    log: ParseLog,
    section: Section,
    default_seen: bool,
    pending: Option<PendingLayout<'a>>,
}

impl<'a> StyleParser<'a> {
    fn new(source: &'a str) -> Self {
        StyleParser {
            source,
            style: Style::empty(source),
            log: ParseLog::default(),
            section: Section::None,
            default_seen: false,
            pending: None,
        }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut start = 0;
        let mut lines = Vec::new();
        for (idx, raw) in self.source.split('\n').enumerate() {
            lines.push(Line {
                text: raw.strip_suffix('\r').unwrap_or(raw),
                number: idx + 1,
                start,
            });
            start += raw.len() + 1;
        }
        lines
    }

    fn run(&mut self) {
        for line in self.lines() {
            self.line(&line);
        }
        self.finish_pending();
        self.style.valid = self.section != Section::None && self.default_seen;
    }

    fn line(&mut self, line: &Line<'a>) {
        let text = line.text;
        if text.trim().is_empty() {
            self.finish_pending();
            return;
        }
        if text.starts_with('#') {
            return;
        }
        if self.pending.is_some() {
            if let Some(part) = text.trim().strip_prefix('|') {
                self.continue_pending(part, line);
                return;
            }
            self.finish_pending();
        }
        if let Some(section) = Section::from_marker(text) {
            self.section = section;
            return;
        }
        match self.section {
            Section::None => self.warn(ParseWarningKind::MalformedLine { section: Section::None }, line),
            Section::Name => self.style.name = text.trim().to_string(),
            Section::Layout => self.layout_line(line),
            Section::Properties | Section::Citation => self.property_line(line),
            Section::Journals => {
                self.style.journals.insert(text.trim().to_string());
            }
        }
    }

    fn warn(&mut self, kind: ParseWarningKind, line: &Line<'a>) {
        let location = SourceInfo::from_offsets(
            FileId(0),
            self.source,
            line.start,
            line.start + line.text.len(),
        );
        let warning = ParseWarning {
            kind,
            line: line.number,
            location,
        };
        tracing::warn!(line = warning.line, "{}", warning.message());
        self.log.warnings.push(warning);
    }

    fn layout_line(&mut self, line: &Line<'a>) {
        let text = line.text;
        let Some(eq) = text.find('=').filter(|&i| i > 0 && i < text.len() - 1) else {
            self.warn(ParseWarningKind::MalformedLine { section: Section::Layout }, line);
            return;
        };
        let type_name = text[..eq].trim();
        let template = &text[eq + 1..];
        if let Some(first) = template.trim_start().strip_prefix('|') {
            self.pending = Some(PendingLayout {
                type_name: type_name.to_string(),
                template: String::new(),
                line: *line,
            });
            self.continue_pending(first, line);
        } else {
            self.add_layout(type_name, template, line);
        }
    }

    /// `part` is the text after the opening `|`.
    fn continue_pending(&mut self, part: &str, line: &Line<'a>) {
        let closed = part.trim_end().strip_suffix('|');
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        match closed {
            Some(inner) => pending.template.push_str(inner),
            None => {
                pending.template.push_str(part);
                let entry_type = pending.type_name.clone();
                self.warn(ParseWarningKind::UnterminatedLayoutPart { entry_type }, line);
            }
        }
    }

    fn finish_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.add_layout(&pending.type_name, &pending.template, &pending.line);
    }

    fn add_layout(&mut self, type_name: &str, template: &str, line: &Line<'a>) {
        let layout = LayoutTemplate::parse(template);
        if type_name == DEFAULT_LAYOUT_NAME {
            if !self.default_seen {
                self.default_seen = true;
                self.style.default_layout = Some(layout);
                return;
            }
            self.warn(ParseWarningKind::DuplicateDefaultLayout, line);
        }
        self.style.layouts.insert(EntryType::parse(type_name), layout);
    }

    fn property_line(&mut self, line: &Line<'a>) {
        let text = line.text;
        let Some(eq) = text.find('=').filter(|&i| i > 0) else {
            self.warn(ParseWarningKind::MalformedLine { section: self.section }, line);
            return;
        };
        let name = text[..eq].trim();
        let value = unquote(&text[eq + 1..]);

        let result = if self.section == Section::Properties {
            self.style.properties.apply(name, value)
        } else {
            self.style.citation.apply(name, value)
        };
        match result {
            Ok(())
                if self.section == Section::Properties
                    && UNUSED_STYLE_PROPERTIES.contains(&name) =>
            {
                self.warn(
                    ParseWarningKind::UnusedProperty {
                        name: name.to_string(),
                    },
                    line,
                )
            }
            Ok(()) => {}
            Err(PropertyIssue::Unknown { suggestion }) => self.warn(
                ParseWarningKind::UnknownProperty {
                    section: self.section,
                    name: name.to_string(),
                    suggestion,
                },
                line,
            ),
            Err(PropertyIssue::InvalidValue { expected }) => self.warn(
                ParseWarningKind::InvalidPropertyValue {
                    name: name.to_string(),
                    value: value.to_string(),
                    expected,
                },
                line,
            ),
        }
    }
}

/// Strip one pair of surrounding double quotes.
///
/// Unquoted values are kept verbatim, so trailing spaces survive only when
/// quoted or when the value is a number or boolean.
fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.len() > 1 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else if is_integer(trimmed) {
        trimmed
    } else {
        value
    }
}
