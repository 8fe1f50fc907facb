//! Integration tests for citemark-style.
//!
//! Fixture styles are stored in test-data/ within this crate.

use citemark_style::{
    EntryType, LayoutToken, ParseWarningKind, StandardEntryType, Style, parse_style,
    parse_style_with_log,
};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Get the test-data directory path.
fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(test_data_dir().join(name)).expect("Failed to read fixture")
}

// ============================================================================
// Fixture styles
// ============================================================================

#[test]
fn test_parse_default_numerical_style() {
    let parsed = parse_style_with_log(&read_fixture("default_numerical.jstyle"));
    assert!(parsed.log.is_empty(), "{:?}", parsed.log);

    let style = parsed.style;
    assert!(style.is_valid());
    assert_eq!(style.name, "Example numerical style");
    assert_eq!(style.properties.title, "References");
    assert!(style.is_number_entries());
    assert!(!style.is_sort_by_position());
    assert_eq!(style.citation.bracket_before, "[");
    assert_eq!(style.citation.bracket_after_in_list(), "] ");
    assert_eq!(style.citation.uniquefier_separator, ",");
    assert_eq!(style.citation.minimum_grouping_count, 3);
    assert!(!style.citation.multi_cite_chronological);
    assert_eq!(style.journals.len(), 2);

    assert_eq!(style.layouts.len(), 3);
    for t in [
        StandardEntryType::Article,
        StandardEntryType::Book,
        StandardEntryType::InCollection,
    ] {
        assert!(style.layouts.contains_key(&EntryType::Known(t)), "{:?}", t);
    }
}

#[test]
fn test_parse_default_authoryear_style() {
    let parsed = parse_style_with_log(&read_fixture("default_authoryear.jstyle"));
    assert!(parsed.log.is_empty(), "{:?}", parsed.log);

    let style = parsed.style;
    assert!(style.is_valid());
    assert_eq!(style.citation.max_authors_first, 3);
    assert_eq!(style.citation.author_last_separator_in_text(), " and ");
    assert_eq!(style.citation.year_separator, " ");
    assert!(style.citation.italic_et_al);
    assert!(style.citation.author_field.contains("editor"));

    let article = style
        .reference_layout(&EntryType::Known(StandardEntryType::Article))
        .unwrap();
    assert!(article.source().ends_with("\\end{pages}."), "{}", article.source());
    assert!(article.field_names().contains(&"journal"));
    match &article.tokens()[0] {
        LayoutToken::Field { name, formatters } => {
            assert_eq!(name, "author");
            assert_eq!(formatters.len(), 3);
        }
        other => panic!("expected author field, got {:?}", other),
    }
}

#[test]
fn test_style_with_layout_section_first_is_valid() {
    let style = parse_style(&read_fixture("default_first.jstyle"));
    assert!(style.is_valid());
    assert_eq!(style.name, "Layout-first style");
    assert_eq!(
        style.default_layout.as_ref().map(|l| l.source()),
        Some("\\author: \\title (\\year)")
    );
}

#[test]
fn test_style_without_default_layout_is_invalid() {
    let style = parse_style(&read_fixture("invalid.jstyle"));
    assert!(!style.is_valid());
    assert_eq!(style.citation.max_authors, 2);
    assert!(style.check_valid().is_err());
}

#[test]
fn test_reparse_is_idempotent() {
    for name in [
        "default_numerical.jstyle",
        "default_authoryear.jstyle",
        "test.jstyle",
    ] {
        let first = parse_style(&read_fixture(name));
        let second = parse_style(&first.source_text);
        let third = parse_style(&second.source_text);
        assert_eq!(first, second, "{}", name);
        assert_eq!(second, third, "{}", name);
    }
}

#[test]
fn test_empty_text() {
    let parsed = parse_style_with_log("");
    assert!(!parsed.style.is_valid());
    assert!(parsed.log.is_empty());
    assert_eq!(parsed.style, parse_style("\n\n# nothing\n"));
}

// ============================================================================
// Repeated default layout
// ============================================================================

#[test]
fn test_second_default_layout_is_stored_under_default_type() {
    let parsed = parse_style_with_log("LAYOUT\ndefault=\\title\ndefault=\\author\n");
    let style = parsed.style;
    assert_eq!(
        style.default_layout.as_ref().map(|l| l.source()),
        Some("\\title")
    );
    let default_type = EntryType::Unknown("default".to_string());
    assert_eq!(
        style.layouts.get(&default_type).map(|l| l.source()),
        Some("\\author")
    );
    // Lookups by real entry types still see the first default.
    assert_eq!(
        style
            .reference_layout(&EntryType::Known(StandardEntryType::Misc))
            .map(|l| l.source()),
        Some("\\title")
    );
    assert_eq!(parsed.log.len(), 1);
    assert_eq!(parsed.log.warnings[0].kind, ParseWarningKind::DuplicateDefaultLayout);
    assert_eq!(parsed.log.warnings[0].line, 3);
}

// ============================================================================
// File-backed styles
// ============================================================================

#[test]
fn test_from_file_remembers_path() {
    let path = test_data_dir().join("test.jstyle");
    let style = Style::from_file(&path).unwrap();
    assert_eq!(style.path(), Some(path.as_path()));
    assert!(!style.is_stale());
    assert_eq!(style.citation.oxford_comma, ",");
    assert_eq!(style.citation.bracket_before, "");
}

#[test]
fn test_ensure_up_to_date_reloads_changed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("style.jstyle");
    fs::write(&path, "NAME\nFirst\n\nLAYOUT\ndefault=\\title\n").unwrap();

    let mut style = Style::from_file(&path).unwrap();
    assert_eq!(style.name, "First");
    assert!(!style.ensure_up_to_date().unwrap());

    fs::write(&path, "NAME\nSecond\n\nCITATION\nMaxAuthors=1\n").unwrap();
    let later = SystemTime::now() + Duration::from_secs(10);
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(later)
        .unwrap();

    assert!(style.is_stale());
    assert!(style.ensure_up_to_date().unwrap());
    assert_eq!(style.name, "Second");
    assert_eq!(style.citation.max_authors, 1);
    assert!(!style.is_valid());
    assert_eq!(style.path(), Some(path.as_path()));
    assert!(!style.ensure_up_to_date().unwrap());
}

#[test]
fn test_ensure_up_to_date_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("style.jstyle");
    fs::write(&path, "LAYOUT\ndefault=\\title\n").unwrap();
    let mut style = Style::from_file(&path).unwrap();

    fs::remove_file(&path).unwrap();
    assert!(style.is_stale());
    let err = style.ensure_up_to_date().unwrap_err();
    assert!(matches!(err, citemark_style::Error::Io { .. }));
    // The old content stays usable.
    assert!(style.is_valid());
    assert_eq!(style.path(), Some(path.as_path()));
}

#[test]
fn test_load_keeps_parse_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("style.jstyle");
    fs::write(&path, "LAYOUT\ndefault=\\title\n\nCITATION\nMaxAuthors=many\n").unwrap();
    let parsed = Style::load(&path).unwrap();
    assert!(parsed.style.is_valid());
    assert_eq!(parsed.log.len(), 1);
    let rendered = parsed
        .log
        .render(&path.display().to_string(), &parsed.style.source_text);
    assert!(rendered.contains("MaxAuthors"), "Got: {}", rendered);
}

// ============================================================================
// Configuration dump
// ============================================================================

#[test]
fn test_citation_properties_dump_as_json() {
    let style = parse_style(&read_fixture("test.jstyle"));
    let json = serde_json::to_string(&style.citation).unwrap();
    assert!(json.contains(r#""OxfordComma":",""#), "Got: {}", json);
    assert!(json.contains(r#""BracketBefore":"""#), "Got: {}", json);
}
