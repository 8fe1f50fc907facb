//! Author-year marker tests against the fixture styles in test-data/.

use citemark::{
    AuthorList, AuthorYearMarkerFormatter, BibDatabase, Citation, Error, NonUniqueHandling,
    format_reference,
};
use citemark_style::{Style, parse_style};
use std::fs;
use std::path::PathBuf;

fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

fn load_style(name: &str) -> Style {
    Style::from_file(test_data_dir().join(name)).expect("Failed to load style")
}

fn load_db() -> BibDatabase {
    let json = fs::read_to_string(test_data_dir().join("references.json"))
        .expect("Failed to read references");
    BibDatabase::from_json(&json).expect("Failed to parse references")
}

fn cite<'a>(db: &'a BibDatabase, key: &str) -> Citation<'a> {
    Citation::lookup_in(key, db)
}

fn marker(style: &Style, citations: &[Citation<'_>], in_parenthesis: bool) -> String {
    AuthorYearMarkerFormatter::new(style)
        .unwrap()
        .citation_marker(citations, in_parenthesis, NonUniqueHandling::Forgiving)
        .unwrap()
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn test_distinct_entries_without_letters() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "beta2000a"),
        cite(&db, "beta2000b"),
        cite(&db, "epsilon2001"),
    ];
    insta::assert_snapshot!(
        marker(&style, &citations, true),
        @"[Beta, 2000; Beta, 2000; Epsilon, 2001]"
    );
}

#[test]
fn test_non_unique_citations_throw() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [cite(&db, "beta2000a"), cite(&db, "beta2000b")];
    let formatter = AuthorYearMarkerFormatter::new(&style).unwrap();
    let result = formatter.citation_marker(&citations, true, NonUniqueHandling::Throwing);
    match result {
        Err(Error::NonUniqueCitation {
            first_key,
            second_key,
            marker,
        }) => {
            assert_eq!(first_key, "beta2000a");
            assert_eq!(second_key, "beta2000b");
            assert_eq!(marker, "[Beta, 2000]");
        }
        other => panic!("expected NonUniqueCitation, got {:?}", other),
    }
}

#[test]
fn test_letters_merge_into_one_group() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "beta2000a").with_unique_letter("a"),
        cite(&db, "beta2000b").with_unique_letter("b"),
        cite(&db, "epsilon2001"),
    ];
    insta::assert_snapshot!(
        marker(&style, &citations, true),
        @"[Beta, 2000a,b; Epsilon, 2001]"
    );
    insta::assert_snapshot!(
        marker(&style, &citations, false),
        @"Beta [2000a,b]; Epsilon [2001]"
    );
}

#[test]
fn test_editor_is_used_when_author_is_missing() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "beta2000a").with_unique_letter("a"),
        cite(&db, "beta2000b").with_unique_letter("b"),
        cite(&db, "beta2000c").with_unique_letter("c"),
    ];
    insta::assert_snapshot!(marker(&style, &citations, true), @"[Beta, 2000a,b,c]");
}

#[test]
fn test_letters_pass_throwing_mode() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "beta2000a").with_unique_letter("a"),
        cite(&db, "beta2000b").with_unique_letter("b"),
    ];
    let formatter = AuthorYearMarkerFormatter::new(&style).unwrap();
    assert!(
        formatter
            .citation_marker(&citations, true, NonUniqueHandling::Throwing)
            .is_ok()
    );
}

#[test]
fn test_letter_presence_change_starts_group() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "beta2000a").with_unique_letter("a"),
        cite(&db, "beta2000a"),
    ];
    insta::assert_snapshot!(
        marker(&style, &citations, true),
        @"[Beta, 2000a; Beta, 2000]"
    );
}

// ============================================================================
// Author counts and first appearances
// ============================================================================

const FULL: &str = "Boström, Wäyrynen, Bodén, Beznosov & Kruchten";
const FULL_NOT: &str = "Boström, Wäyrynen, Bodén, Beznosov & NotKruchten";

#[test]
fn test_first_appearances_show_all_authors() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "bostrom2006a").with_unique_letter("a").first_appearance(true),
        cite(&db, "bostrom2006b").with_unique_letter("b").first_appearance(true),
        cite(&db, "bostrom2006c").with_unique_letter("c").first_appearance(true),
    ];
    assert_eq!(
        marker(&style, &citations, true),
        format!("[{}, 2006a,b; {}, 2006c]", FULL, FULL_NOT)
    );
    assert_eq!(
        marker(&style, &citations, false),
        format!("{} [2006a,b]; {} [2006c]", FULL, FULL_NOT)
    );
}

#[test]
fn test_later_appearance_after_full_group() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "bostrom2006a").with_unique_letter("a").first_appearance(true),
        cite(&db, "bostrom2006b").with_unique_letter("b").first_appearance(true),
        cite(&db, "bostrom2006c").with_unique_letter("c"),
    ];
    assert_eq!(
        marker(&style, &citations, true),
        format!("[{}, 2006a,b; Boström et al., 2006c]", FULL)
    );
}

#[test]
fn test_first_appearance_between_later_ones() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "bostrom2006a").with_unique_letter("a"),
        cite(&db, "bostrom2006b").with_unique_letter("b").first_appearance(true),
        cite(&db, "bostrom2006c").with_unique_letter("c"),
    ];
    assert_eq!(
        marker(&style, &citations, true),
        format!(
            "[Boström et al., 2006a; {}, 2006b; Boström et al., 2006c]",
            FULL
        )
    );
}

#[test]
fn test_hidden_author_difference_still_joins() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "bostrom2006a").with_unique_letter("a"),
        cite(&db, "bostrom2006b").with_unique_letter("b"),
        cite(&db, "bostrom2006c").with_unique_letter("c"),
    ];
    insta::assert_snapshot!(
        marker(&style, &citations, true),
        @"[Boström et al., 2006a,b,c]"
    );
}

// ============================================================================
// Page info
// ============================================================================

#[test]
fn test_page_info_keeps_citations_apart() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "bostrom2006a").with_unique_letter("a").with_page_info("p1"),
        cite(&db, "bostrom2006b").with_unique_letter("b").with_page_info("p1"),
        cite(&db, "bostrom2006c").with_unique_letter("c").with_page_info("p1"),
    ];
    insta::assert_snapshot!(
        marker(&style, &citations, true),
        @"[Boström et al., 2006a; p1; Boström et al., 2006b; p1; Boström et al., 2006c; p1]"
    );
}

#[test]
fn test_exact_repeats_are_dropped() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let repeated = || {
        cite(&db, "bostrom2006a")
            .with_unique_letter("a")
            .with_page_info("p1")
    };
    let citations = [repeated(), repeated(), repeated()];
    insta::assert_snapshot!(
        marker(&style, &citations, true),
        @"[Boström et al., 2006a; p1]"
    );
}

#[test]
fn test_same_entry_with_different_page_info() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "bostrom2006a").with_unique_letter("a").with_page_info("p1"),
        cite(&db, "bostrom2006a").with_unique_letter("a").with_page_info("p2"),
        cite(&db, "bostrom2006a").with_unique_letter("a").with_page_info(""),
        cite(&db, "bostrom2006a").with_unique_letter("a"),
    ];
    insta::assert_snapshot!(
        marker(&style, &citations, true),
        @"[Boström et al., 2006a; p1; Boström et al., 2006a; p2; Boström et al., 2006a]"
    );
}

#[test]
fn test_in_text_page_info_inside_bracket() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [cite(&db, "epsilon2001").with_page_info("p. 4")];
    insta::assert_snapshot!(marker(&style, &citations, false), @"Epsilon [2001; p. 4]");
}

// ============================================================================
// Unresolved and incomplete records
// ============================================================================

#[test]
fn test_unresolved_citation() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let citations = [
        cite(&db, "epsilon2001"),
        cite(&db, "missing")
            .with_unique_letter("x")
            .with_page_info("p1"),
    ];
    insta::assert_snapshot!(
        marker(&style, &citations, true),
        @"[Epsilon, 2001; Unresolved(missing)]"
    );
}

#[test]
fn test_incomplete_records() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let one = |key: &str| marker(&style, &[cite(&db, key)], true);
    insta::assert_snapshot!(one("team2016"), @"[JabRef Development Team, 2016]");
    insta::assert_snapshot!(one("oxford2016"), @"[von Beta, Epsilon & Tau, 2016]");
    insta::assert_snapshot!(one("anonymous2016"), @"[, 2016]");
    insta::assert_snapshot!(one("undated"), @"[von Beta, ]");
    insta::assert_snapshot!(one("empty"), @"[, ]");
}

#[test]
fn test_year_from_crossref_parent_date() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    insta::assert_snapshot!(
        marker(&style, &[cite(&db, "omega-talk")], true),
        @"[Omega, 2019]"
    );
}

// ============================================================================
// Author lists and normalized markers
// ============================================================================

#[test]
fn test_oxford_comma() {
    let style = load_style("test.jstyle");
    let db = load_db();
    insta::assert_snapshot!(
        marker(&style, &[cite(&db, "oxford2016")], true),
        @"von Beta, Epsilon, & Tau, 2016"
    );
}

#[test]
fn test_in_text_last_separator() {
    let style = load_style("default_authoryear.jstyle");
    let db = load_db();
    let authors = AuthorList::parse("A Alpha and B Beta and C Gamma");
    let formatter = AuthorYearMarkerFormatter::new(&style).unwrap();
    assert_eq!(
        formatter.format_author_list(&authors, 3, " and ").unwrap(),
        "Alpha, Beta and Gamma"
    );
    insta::assert_snapshot!(
        marker(&style, &[cite(&db, "oxford2016")], false),
        @"von Beta, Epsilon and Tau (2016)"
    );
    insta::assert_snapshot!(
        marker(&style, &[cite(&db, "bostrom2006a")], true),
        @"(Boström<i> et al.</i> 2006)"
    );
}

#[test]
fn test_normalized_marker() {
    let style = load_style("default_numerical.jstyle");
    let db = load_db();
    let formatter = AuthorYearMarkerFormatter::new(&style).unwrap();
    let citation = cite(&db, "bostrom2006a")
        .with_unique_letter("a")
        .with_page_info("p1")
        .first_appearance(true);
    insta::assert_snapshot!(
        formatter.normalized_marker(&citation, None).unwrap(),
        @"[Boström et al., 2006]"
    );
    assert_eq!(
        formatter.normalized_marker(&citation, Some(-1)).unwrap(),
        format!("[{}, 2006]", FULL)
    );
    insta::assert_snapshot!(
        formatter
            .normalized_marker(&cite(&db, "missing"), None)
            .unwrap(),
        @"[Unresolved(missing)]"
    );
}

#[test]
fn test_unsupported_names_before_et_al() {
    let style = parse_style("LAYOUT\ndefault=\\title\n\nCITATION\nMaxAuthorsBeforeEtAl=2\n");
    let db = load_db();
    let formatter = AuthorYearMarkerFormatter::new(&style).unwrap();
    let result = formatter.citation_marker(
        &[cite(&db, "epsilon2001")],
        true,
        NonUniqueHandling::Forgiving,
    );
    assert!(matches!(
        result,
        Err(Error::InvalidAuthorCap { value: 2, .. })
    ));
}

#[test]
fn test_names_before_et_al_up_to_cap() {
    let style = parse_style(
        "LAYOUT\ndefault=\\title\n\nCITATION\nMaxAuthorsBeforeEtAl=-1\nBracketBefore=[\nBracketAfter=]\n",
    );
    let db = load_db();
    insta::assert_snapshot!(
        marker(&style, &[cite(&db, "bostrom2006a")], true),
        @"[Boström, Wäyrynen, Bodén et al., 2006]"
    );
}

#[test]
fn test_invalid_style_is_refused() {
    let style = parse_style("CITATION\nMaxAuthors=2\n");
    assert!(matches!(
        AuthorYearMarkerFormatter::new(&style),
        Err(Error::Style(citemark_style::Error::InvalidStyle { .. }))
    ));
}

// ============================================================================
// Bibliography entries
// ============================================================================

#[test]
fn test_reference_layouts() {
    let style = load_style("default_authoryear.jstyle");
    let db = load_db();
    let article = db.get("epsilon2001").unwrap();
    insta::assert_snapshot!(
        format_reference(&style, article, &db).unwrap(),
        @"Alpha Epsilon (2001). <i>On Epsilon</i>, Journal of Letters 7 : 1--9."
    );
    let misc = db.get("anonymous2016").unwrap();
    assert_eq!(
        format_reference(&style, misc, &db).unwrap(),
        " (2016). <i></i>,  ."
    );
}
