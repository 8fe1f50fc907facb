//! Numeric citation markers: `[1-3; 7]` in the text, `[1]` in the
//! bibliography.

use crate::entry::{NumberedCitation, normalize_page_info};
use crate::error::{Error, Result};
use citemark_style::Style;

/// Text shown for a citation that could not be resolved.
const UNDEFINED_MARKER: &str = "??";

pub struct NumericMarkerFormatter<'s> {
    style: &'s Style,
}

impl<'s> NumericMarkerFormatter<'s> {
    /// Fails with `InvalidStyle` unless the style has a default layout.
    pub fn new(style: &'s Style) -> Result<Self> {
        style.check_valid()?;
        Ok(NumericMarkerFormatter { style })
    }

    /// Marker for a list of citation numbers, `0` meaning unresolved.
    ///
    /// `page_infos`, when given, must have one entry per number. Runs of at
    /// least `min_run` consecutive numbers without page info collapse into a
    /// range; a `min_run` of zero or less disables ranges.
    pub fn in_text_marker(
        &self,
        numbers: &[u32],
        min_run: i32,
        page_infos: Option<&[Option<&str>]>,
    ) -> Result<String> {
        if let Some(found) = page_infos.map(<[_]>::len)
            && found != numbers.len()
        {
            return Err(Error::PageInfoLengthMismatch {
                expected: numbers.len(),
                found,
            });
        }

        let citations: Vec<NumberedCitation> = numbers
            .iter()
            .enumerate()
            .map(|(i, &number)| NumberedCitation {
                number,
                page_info: normalize_page_info(page_infos.and_then(|p| p[i])),
                key: None,
            })
            .collect();
        self.in_text_marker_for(&citations, min_run)
    }

    /// Like [`in_text_marker`](Self::in_text_marker), for citations that may
    /// carry their key. Unresolved citations with a key render as `??key`.
    pub fn in_text_marker_for(
        &self,
        citations: &[NumberedCitation],
        min_run: i32,
    ) -> Result<String> {
        let c = &self.style.citation;

        let normalized: Vec<NumberedCitation> = citations
            .iter()
            .map(|citation| NumberedCitation {
                page_info: normalize_page_info(citation.page_info.as_deref()),
                ..citation.clone()
            })
            .collect();
        let mut sorted: Vec<&NumberedCitation> = normalized.iter().collect();
        sorted.sort_by(|a, b| (a.number, &a.page_info).cmp(&(b.number, &b.page_info)));

        let mut blocks: Vec<String> = Vec::new();
        let mut current: Vec<&NumberedCitation> = Vec::new();
        for citation in sorted {
            if let Some(prev) = current.last() {
                if !citation.is_unresolved()
                    && citation.number == prev.number
                    && citation.page_info == prev.page_info
                {
                    continue;
                }
                let extends = min_run > 0
                    && !prev.is_unresolved()
                    && !citation.is_unresolved()
                    && prev.number.checked_add(1) == Some(citation.number)
                    && prev.page_info.is_none()
                    && citation.page_info.is_none();
                if !extends {
                    blocks.push(self.render_block(&current, min_run)?);
                    current.clear();
                }
            }
            current.push(citation);
        }
        if !current.is_empty() {
            blocks.push(self.render_block(&current, min_run)?);
        }

        Ok(format!(
            "{}{}{}",
            c.bracket_before,
            blocks.join(&c.citation_separator),
            c.bracket_after
        ))
    }

    /// [`in_text_marker_for`](Self::in_text_marker_for) with the style's
    /// `MinimumGroupingCount`.
    pub fn citation_marker(&self, citations: &[NumberedCitation]) -> Result<String> {
        self.in_text_marker_for(citations, self.style.citation.minimum_grouping_count)
    }

    /// Label for bibliography entry `number`, e.g. `[4]`.
    pub fn bibliography_marker(&self, number: u32) -> String {
        self.bibliography_marker_for(&NumberedCitation::new(number))
    }

    /// Label for a bibliography entry; unresolved entries get `??key`.
    pub fn bibliography_marker_for(&self, citation: &NumberedCitation) -> String {
        let c = &self.style.citation;
        format!(
            "{}{}{}",
            c.bracket_before_in_list(),
            number_text(citation),
            c.bracket_after_in_list()
        )
    }

    fn render_block(&self, block: &[&NumberedCitation], min_run: i32) -> Result<String> {
        let c = &self.style.citation;
        tracing::trace!(size = block.len(), min_run, "numeric block closed");

        let [first, .., last] = block else {
            let Some(single) = block.first() else {
                return Err(Error::Internal("empty numeric block".to_string()));
            };
            let mut out = number_text(single);
            if let Some(page_info) = &single.page_info {
                out.push_str(&c.page_info_separator);
                out.push_str(page_info);
            }
            return Ok(out);
        };

        for pair in block.windows(2) {
            if pair[0].is_unresolved() || pair[1].is_unresolved() {
                return Err(Error::Internal(
                    "unresolved citation inside a numeric range".to_string(),
                ));
            }
            if pair[0].page_info.is_some() || pair[1].page_info.is_some() {
                return Err(Error::Internal(
                    "citation with page info inside a numeric range".to_string(),
                ));
            }
            if pair[0].number.checked_add(1) != Some(pair[1].number) {
                return Err(Error::Internal(format!(
                    "numbers {} and {} are not consecutive",
                    pair[0].number, pair[1].number
                )));
            }
        }

        let run = i32::try_from(block.len()).unwrap_or(i32::MAX);
        if run >= min_run {
            Ok(format!(
                "{}{}{}",
                first.number, c.grouped_numbers_separator, last.number
            ))
        } else {
            Ok(block
                .iter()
                .map(|n| n.number.to_string())
                .collect::<Vec<_>>()
                .join(&c.citation_separator))
        }
    }
}

fn number_text(citation: &NumberedCitation) -> String {
    if citation.is_unresolved() {
        format!(
            "{}{}",
            UNDEFINED_MARKER,
            citation.key.as_deref().unwrap_or_default()
        )
    } else {
        citation.number.to_string()
    }
}
