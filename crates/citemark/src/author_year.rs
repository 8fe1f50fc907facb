//! Author-year citation markers: `(Smith, 2020a, b; Jones, 2019)` and
//! `Smith (2020a, b); Jones (2019)`.

use crate::entry::{CitationEntry, LookupResult, NonUniqueHandling, normalize_page_info};
use crate::error::{Error, Result};
use crate::latex::to_unicode;
use crate::names::AuthorList;
use citemark_style::{FieldList, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    InParenthesis,
    InText,
    /// Parenthesized, without letters or page info, always using `MaxAuthors`.
    Normalized,
}

/// A citation with its author list and year already looked up.
struct Prepared<'e> {
    key: &'e str,
    resolved: Option<Resolved>,
    unique_letter: Option<&'e str>,
    page_info: Option<String>,
    first_appearance: bool,
}

struct Resolved {
    authors: AuthorList,
    year: String,
}

pub struct AuthorYearMarkerFormatter<'s> {
    style: &'s Style,
}

impl<'s> AuthorYearMarkerFormatter<'s> {
    /// Fails with `InvalidStyle` unless the style has a default layout.
    pub fn new(style: &'s Style) -> Result<Self> {
        style.check_valid()?;
        Ok(AuthorYearMarkerFormatter { style })
    }

    /// The marker used to decide whether two citations can share a group:
    /// parenthesized, no letter, no page info, `MaxAuthors` names (or
    /// `max_authors_override`).
    pub fn normalized_marker<E: CitationEntry + ?Sized>(
        &self,
        entry: &E,
        max_authors_override: Option<i32>,
    ) -> Result<String> {
        let prepared = self.prepare(entry);
        self.normalized(&prepared, max_authors_override)
    }

    /// Render one citation group.
    ///
    /// Adjacent citations whose normalized markers agree are merged, so
    /// `Smith 2020a` followed by `Smith 2020b` gives `Smith, 2020a, b`. An
    /// exact repeat (same key, letter and page info) is dropped.
    pub fn citation_marker<E: CitationEntry>(
        &self,
        entries: &[E],
        in_parenthesis: bool,
        handling: NonUniqueHandling,
    ) -> Result<String> {
        let prepared: Vec<Prepared<'_>> = entries.iter().map(|e| self.prepare(e)).collect();
        let normalized = prepared
            .iter()
            .map(|p| self.normalized(p, None))
            .collect::<Result<Vec<_>>>()?;
        let to_emit: Vec<i32> = prepared.iter().map(|p| self.authors_to_emit(p)).collect();
        let mut revised = to_emit.clone();

        let mut kept: Vec<&Prepared<'_>> = Vec::with_capacity(prepared.len());
        let mut starts_new_group: Vec<bool> = Vec::with_capacity(prepared.len());
        if let Some(first) = prepared.first() {
            kept.push(first);
            starts_new_group.push(true);
        }

        for i in 1..prepared.len() {
            let (prev, cur) = (&prepared[i - 1], &prepared[i]);
            let (starts_group, same_as_prev) = if cur.resolved.is_none() {
                (true, false)
            } else {
                let authors_inhibit_join = if prev.resolved.is_none() {
                    true
                } else if (!prev.first_appearance
                    && !cur.first_appearance
                    && revised[i - 1] == to_emit[i - 1])
                    || self.style.citation.max_authors == self.style.citation.max_authors_first
                {
                    false
                } else {
                    let shown = revised[i - 1];
                    if shown < to_emit[i] {
                        true
                    } else {
                        self.normalized(prev, Some(shown))? != self.normalized(cur, Some(shown))?
                    }
                };

                let keys_differ = prev.key != cur.key;
                let markers_differ = normalized[i - 1] != normalized[i];
                let page_infos_differ = prev.page_info != cur.page_info;
                let both_page_infos_empty = prev.page_info.is_none() && cur.page_info.is_none();
                let letters_differ = prev.unique_letter != cur.unique_letter;
                let letter_presence_changed =
                    prev.unique_letter.is_some() != cur.unique_letter.is_some();
                let not_unique = keys_differ && !markers_differ && !letters_differ;

                if not_unique && handling == NonUniqueHandling::Throwing {
                    return Err(Error::NonUniqueCitation {
                        first_key: prev.key.to_string(),
                        second_key: cur.key.to_string(),
                        marker: normalized[i].clone(),
                    });
                }

                let page_info_inhibits_join =
                    !both_page_infos_empty && (keys_differ || page_infos_differ);

                let starts_group = markers_differ
                    || authors_inhibit_join
                    || page_info_inhibits_join
                    || letter_presence_changed
                    || not_unique;
                if !starts_group {
                    revised[i] = revised[i - 1];
                }
                let same_as_prev =
                    !starts_group && !letters_differ && !keys_differ && !page_infos_differ;
                (starts_group, same_as_prev)
            };

            tracing::trace!(
                key = cur.key,
                starts_group,
                dropped = same_as_prev,
                "author-year grouping"
            );

            if !same_as_prev {
                kept.push(cur);
                starts_new_group.push(starts_group);
            }
        }

        let purpose = if in_parenthesis {
            Purpose::InParenthesis
        } else {
            Purpose::InText
        };
        self.render(purpose, &kept, &starts_new_group, None)
    }

    /// Join surnames for a marker.
    ///
    /// With `max_authors` of `-1`, or at least as many as there are authors,
    /// every name is shown: `A, B[OxfordComma]<and_string>C`. Otherwise
    /// `MaxAuthorsBeforeEtAl` names are shown followed by the et-al text.
    pub fn format_author_list(
        &self,
        authors: &AuthorList,
        max_authors: i32,
        and_string: &str,
    ) -> Result<String> {
        let c = &self.style.citation;
        let n = authors.len();

        if max_authors < -1 || (max_authors == 0 && n != 0) {
            return Err(Error::InvalidAuthorCap {
                value: max_authors,
                context: "the number of authors shown".to_string(),
            });
        }
        let emit_all = max_authors == -1 || n <= max_authors as usize;
        let before_et_al = match c.max_authors_before_et_al {
            1 => 1,
            -1 => max_authors.max(1) as usize,
            other => {
                return Err(Error::InvalidAuthorCap {
                    value: other,
                    context: "MaxAuthorsBeforeEtAl".to_string(),
                });
            }
        };
        let n_to_emit = if emit_all { n } else { before_et_al.min(n) };

        let name = |i: usize| {
            let surname = authors
                .get(i)
                .map(|a| a.last_name_with_von())
                .unwrap_or_default();
            format!(
                "{}{}{}",
                c.author_name_markup_before, surname, c.author_name_markup_after
            )
        };

        let mut out = String::new();
        if n_to_emit >= 1 {
            out.push_str(&c.authors_part_markup_before);
            out.push_str(&c.author_names_list_markup_before);
            out.push_str(&name(0));
        }
        if n >= 2 {
            if emit_all {
                for j in 1..n - 1 {
                    out.push_str(&c.author_separator);
                    out.push_str(&name(j));
                }
                if n >= 3 {
                    out.push_str(&c.oxford_comma);
                }
                out.push_str(and_string);
                out.push_str(&name(n - 1));
            } else {
                for j in 1..n_to_emit {
                    out.push_str(&c.author_separator);
                    out.push_str(&name(j));
                }
            }
        }
        if n_to_emit >= 1 {
            out.push_str(&c.author_names_list_markup_after);
        }
        if n >= 2 && !emit_all {
            out.push_str(&c.et_al_text());
        }
        out.push_str(&c.authors_part_markup_after);
        Ok(out)
    }

    fn prepare<'e, E: CitationEntry + ?Sized>(&self, entry: &'e E) -> Prepared<'e> {
        let c = &self.style.citation;
        let resolved = entry.lookup().map(|lookup| Resolved {
            authors: AuthorList::parse(&first_field(&lookup, &c.author_field).unwrap_or_default()),
            year: first_field(&lookup, &c.year_field)
                .map(|y| to_unicode(&y))
                .unwrap_or_default(),
        });
        Prepared {
            key: entry.citation_key(),
            resolved,
            unique_letter: entry.unique_letter(),
            page_info: normalize_page_info(entry.page_info()),
            first_appearance: entry.is_first_appearance(),
        }
    }

    /// How many names this citation shows on its own; 0 when unresolved.
    fn authors_to_emit(&self, entry: &Prepared<'_>) -> i32 {
        let Some(resolved) = &entry.resolved else {
            return 0;
        };
        let c = &self.style.citation;
        let max = if entry.first_appearance {
            c.max_authors_first
        } else {
            c.max_authors
        };
        let n = i32::try_from(resolved.authors.len()).unwrap_or(i32::MAX);
        if max == -1 { n } else { n.min(max) }
    }

    fn normalized(&self, entry: &Prepared<'_>, max_authors_override: Option<i32>) -> Result<String> {
        self.render(Purpose::Normalized, &[entry], &[true], max_authors_override)
    }

    fn render(
        &self,
        purpose: Purpose,
        entries: &[&Prepared<'_>],
        starts_new_group: &[bool],
        max_authors_override: Option<i32>,
    ) -> Result<String> {
        let c = &self.style.citation;
        let in_parenthesis = purpose != Purpose::InText;
        let (year_separator, and_string) = if in_parenthesis {
            (c.year_separator.as_str(), c.author_last_separator.as_str())
        } else {
            (
                c.in_text_year_separator.as_str(),
                c.author_last_separator_in_text(),
            )
        };
        let decorate = purpose != Purpose::Normalized;

        let mut out = String::new();
        out.push_str(&c.citation_group_markup_before);
        if in_parenthesis {
            out.push_str(&c.bracket_before);
        }

        for (j, entry) in entries.iter().enumerate() {
            let ends_group = starts_new_group.get(j + 1).is_none_or(|&s| s);

            if !starts_new_group[j] {
                if let Some(letter) = entry.unique_letter {
                    out.push_str(&c.uniquefier_separator);
                    out.push_str(letter);
                }
                if !in_parenthesis && ends_group {
                    out.push_str(&c.bracket_after);
                }
                continue;
            }

            if j > 0 {
                out.push_str(&c.citation_separator);
            }

            let Some(resolved) = &entry.resolved else {
                out.push_str(&format!("Unresolved({})", entry.key));
                continue;
            };

            let max_authors = match max_authors_override {
                Some(max) => max,
                None if purpose == Purpose::Normalized => c.max_authors,
                None => self.authors_to_emit(entry),
            };
            out.push_str(&self.format_author_list(&resolved.authors, max_authors, and_string)?);
            out.push_str(year_separator);
            if !in_parenthesis {
                out.push_str(&c.bracket_before);
            }
            out.push_str(&resolved.year);
            if decorate {
                if let Some(letter) = entry.unique_letter {
                    out.push_str(letter);
                }
                if let Some(page_info) = &entry.page_info {
                    out.push_str(&c.page_info_separator);
                    out.push_str(page_info);
                }
            }
            if !in_parenthesis && ends_group {
                out.push_str(&c.bracket_after);
            }
        }

        if in_parenthesis {
            out.push_str(&c.bracket_after);
        }
        out.push_str(&c.citation_group_markup_after);
        Ok(out)
    }
}

/// The first field in `fields` whose resolved value is not blank.
fn first_field(lookup: &LookupResult<'_>, fields: &FieldList) -> Option<String> {
    fields.iter().find_map(|name| {
        lookup
            .collection
            .resolved_field(lookup.record, name)
            .filter(|v| !v.trim().is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use citemark_style::parse_style;

    fn style(citation: &str) -> Style {
        parse_style(&format!("LAYOUT\ndefault=\\title\n\nCITATION\n{}", citation))
    }

    #[test]
    fn test_rejects_invalid_style() {
        let invalid = parse_style("CITATION\nMaxAuthors=2\n");
        assert!(matches!(
            AuthorYearMarkerFormatter::new(&invalid),
            Err(Error::Style(citemark_style::Error::InvalidStyle { .. }))
        ));
    }

    #[test]
    fn test_format_author_list_all_names() {
        let style = style("OxfordComma=\",\"\n");
        let f = AuthorYearMarkerFormatter::new(&style).unwrap();
        let authors = AuthorList::parse("A Alpha and B Beta and C Gamma and D Delta");
        insta::assert_snapshot!(
            f.format_author_list(&authors, -1, " and ").unwrap(),
            @"Alpha, Beta, Gamma, and Delta"
        );
        let two = AuthorList::parse("A Alpha and B Beta");
        assert_eq!(f.format_author_list(&two, 2, " & ").unwrap(), "Alpha & Beta");
    }

    #[test]
    fn test_format_author_list_et_al() {
        let style = style("");
        let f = AuthorYearMarkerFormatter::new(&style).unwrap();
        let authors = AuthorList::parse("A Alpha and B Beta and C Gamma and D Delta");
        assert_eq!(
            f.format_author_list(&authors, 3, " & ").unwrap(),
            "Alpha et al."
        );

        let wide = self::style("MaxAuthorsBeforeEtAl=-1\n");
        let f = AuthorYearMarkerFormatter::new(&wide).unwrap();
        assert_eq!(
            f.format_author_list(&authors, 3, " & ").unwrap(),
            "Alpha, Beta, Gamma et al."
        );
    }

    #[test]
    fn test_format_author_list_caps() {
        let style = style("");
        let f = AuthorYearMarkerFormatter::new(&style).unwrap();
        let authors = AuthorList::parse("A Alpha");
        assert!(matches!(
            f.format_author_list(&authors, 0, " & "),
            Err(Error::InvalidAuthorCap { value: 0, .. })
        ));
        assert!(matches!(
            f.format_author_list(&authors, -2, " & "),
            Err(Error::InvalidAuthorCap { value: -2, .. })
        ));
        assert_eq!(
            f.format_author_list(&AuthorList::default(), 0, " & ").unwrap(),
            ""
        );

        let bad = self::style("MaxAuthorsBeforeEtAl=2\n");
        let f = AuthorYearMarkerFormatter::new(&bad).unwrap();
        assert!(matches!(
            f.format_author_list(&authors, 3, " & "),
            Err(Error::InvalidAuthorCap { value: 2, .. })
        ));
    }

    #[test]
    fn test_format_author_list_markup() {
        let style = style(
            "ItalicEtAl=true\nAuthorsPartMarkupBefore=<a>\nAuthorsPartMarkupAfter=</a>\nAuthorNamesListMarkupBefore=<l>\nAuthorNamesListMarkupAfter=</l>\nAuthorNameMarkupBefore=<n>\nAuthorNameMarkupAfter=</n>\n",
        );
        let f = AuthorYearMarkerFormatter::new(&style).unwrap();
        let authors = AuthorList::parse("A Alpha and B Beta and C Gamma and D Delta");
        insta::assert_snapshot!(
            f.format_author_list(&authors, 1, " & ").unwrap(),
            @"<a><l><n>Alpha</n></l><i> et al.</i></a>"
        );
        insta::assert_snapshot!(
            f.format_author_list(&AuthorList::default(), -1, " & ").unwrap(),
            @"<a></a>"
        );
    }
}
