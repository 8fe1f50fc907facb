//! Tests for formatting error types and their diagnostics.

use citemark::{BibDatabase, BibEntry, Citation, Error, RecordCollection};
use citemark_diagnostics::get_error_info;

fn all_errors() -> Vec<Error> {
    vec![
        Error::Style(citemark_style::Error::InvalidStyle {
            name: "Broken".to_string(),
        }),
        Error::NonUniqueCitation {
            first_key: "smith2020a".to_string(),
            second_key: "smith2020b".to_string(),
            marker: "(Smith, 2020)".to_string(),
        },
        Error::InvalidAuthorCap {
            value: 2,
            context: "MaxAuthorsBeforeEtAl".to_string(),
        },
        Error::InconsistentLookup {
            key: "smith2020".to_string(),
        },
        Error::PageInfoLengthMismatch {
            expected: 3,
            found: 1,
        },
        Error::Internal("block out of order".to_string()),
    ]
}

// ============================================================================
// Display implementation tests
// ============================================================================

#[test]
fn test_non_unique_citation_display() {
    let err = &all_errors()[1];
    let display = err.to_string();
    assert!(display.contains("'smith2020a'"), "Got: {}", display);
    assert!(display.contains("'smith2020b'"), "Got: {}", display);
    assert!(display.contains("'(Smith, 2020)'"), "Got: {}", display);
}

#[test]
fn test_invalid_author_cap_display() {
    let display = all_errors()[2].to_string();
    assert!(
        display.contains("Unsupported author cap 2 for MaxAuthorsBeforeEtAl"),
        "Got: {}",
        display
    );
}

#[test]
fn test_style_error_is_transparent() {
    let display = all_errors()[0].to_string();
    assert!(
        display.contains("Style 'Broken' is not valid"),
        "Got: {}",
        display
    );
}

// ============================================================================
// to_diagnostic tests
// ============================================================================

#[test]
fn test_diagnostic_codes() {
    let codes: Vec<String> = all_errors()
        .iter()
        .map(|e| e.to_diagnostic().code.unwrap_or_default())
        .collect();
    assert_eq!(
        codes,
        ["CM-1-2", "CM-2-1", "CM-2-2", "CM-2-3", "CM-2-4", "CM-2-99"]
    );
}

#[test]
fn test_all_codes_are_in_catalog() {
    for err in all_errors() {
        let diag = err.to_diagnostic();
        let code = diag.code.as_deref().unwrap_or_default();
        assert!(
            get_error_info(code).is_some(),
            "Code {} missing from catalog",
            code
        );
    }
}

#[test]
fn test_non_unique_citation_text() {
    let text = all_errors()[1].to_diagnostic().to_text(None);
    insta::assert_snapshot!(text, @r"
    Error [CM-2-1]: Non-unique Citation
    Two citations render as `(Smith, 2020)`
    ✖ `smith2020a` and `smith2020b` have the same authors, year and disambiguation letter
    ? Assign distinct disambiguation letters before rendering?
    ");
}

#[test]
fn test_internal_error_has_note() {
    let text = all_errors()[5].to_diagnostic().to_text(None);
    assert!(text.contains("This is a bug in citemark"), "Got: {}", text);
}

// ============================================================================
// Construction errors
// ============================================================================

#[test]
fn test_inconsistent_lookup_from_parts() {
    let db: BibDatabase = [BibEntry::new("a", "book")].into_iter().collect();
    let record = db.record("a").unwrap();
    let err = Citation::from_parts("a", Some(record), None).unwrap_err();
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("CM-2-3"));
}
