// src/extractors/document.rs
//
// A filing as an ordered sequence of cleaned lines, plus marker-based
// section location over those lines.

use crate::utils::error::ExtractError;

// Punctuation retained by line cleaning; everything else non-alphanumeric
// and non-whitespace is stripped.
const KEPT_PUNCTUATION: [char; 5] = [',', '.', ':', ';', '-'];

/// Strips characters outside the retained set and trims the result.
fn clean_line(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || KEPT_PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// An immutable, line-oriented view of a downloaded filing.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Builds a Document from raw filing text. Lines are cleaned once at
    /// construction and never mutated afterwards.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(clean_line).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Locates the boundaries of a section according to the given rule.
    pub fn locate(&self, rule: &SectionRule) -> Result<SectionBoundary, ExtractError> {
        if self.lines.is_empty() {
            return Err(ExtractError::EmptyDocument);
        }

        let start = self
            .nth_marker_line(&rule.start_phrases, rule.start_occurrence)
            .ok_or_else(|| {
                ExtractError::SectionNotFound(format!(
                    "{}: fewer than {} lines matching start markers {:?}",
                    rule.name, rule.start_occurrence, rule.start_phrases
                ))
            })?;

        let end = match rule.end_occurrence {
            Occurrence::Nth(n) => self.nth_marker_line(&rule.end_phrases, n),
            Occurrence::Last => self.last_marker_line(&rule.end_phrases),
        }
        .ok_or_else(|| {
            ExtractError::SectionNotFound(format!(
                "{}: no line matching end markers {:?} at required occurrence",
                rule.name, rule.end_phrases
            ))
        })?;

        if start >= end {
            return Err(ExtractError::SectionNotFound(format!(
                "{}: start marker (line {}) does not precede end marker (line {})",
                rule.name, start, end
            )));
        }

        Ok(SectionBoundary { start, end })
    }

    /// Concatenates the lines strictly between the two markers, joined by
    /// single spaces. The marker lines themselves are never included.
    pub fn section_text(&self, boundary: &SectionBoundary) -> String {
        self.lines[boundary.start + 1..boundary.end].join(" ")
    }

    fn nth_marker_line(&self, phrases: &[String], occurrence: usize) -> Option<usize> {
        self.marker_lines(phrases).nth(occurrence.checked_sub(1)?)
    }

    fn last_marker_line(&self, phrases: &[String]) -> Option<usize> {
        self.marker_lines(phrases).last()
    }

    fn marker_lines<'a>(&'a self, phrases: &'a [String]) -> impl Iterator<Item = usize> + 'a {
        self.lines.iter().enumerate().filter_map(move |(i, line)| {
            let lowered = line.to_lowercase();
            phrases.iter().all(|p| lowered.contains(p.as_str())).then_some(i)
        })
    }
}

/// Line-index bounds of a located section, exclusive of the marker lines.
/// Invariant: `start < end` and both index valid lines of the Document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBoundary {
    pub start: usize,
    pub end: usize,
}

/// Which occurrence of a matching line terminates the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Nth(usize),
    Last,
}

/// Marker specification for one section. A line matches a marker set when
/// every phrase appears in it as a case-insensitive substring.
///
/// The default occurrence counts (3rd line for the business markers, 4th
/// for the financial ones) are heuristics tuned against sample 10-K
/// filings, not a structural property of the format; callers can and
/// should adjust them when a filing's front matter differs.
#[derive(Debug, Clone)]
pub struct SectionRule {
    pub name: &'static str,
    pub start_phrases: Vec<String>,
    pub start_occurrence: usize,
    pub end_phrases: Vec<String>,
    pub end_occurrence: Occurrence,
}

impl SectionRule {
    /// Item 1 "Business" through Item 1A "Risk Factors".
    pub fn business(start_occurrence: usize) -> Self {
        Self {
            name: "business section",
            start_phrases: vec!["item 1".into(), "business".into()],
            start_occurrence,
            end_phrases: vec!["item 1a".into()],
            end_occurrence: Occurrence::Nth(start_occurrence),
        }
    }

    /// Item 7 "Management's Discussion and Analysis" through the last
    /// Item 9 "Disagreements" mention.
    pub fn financial(start_occurrence: usize) -> Self {
        Self {
            name: "financial section",
            start_phrases: vec!["item 7".into(), "discussion and analysis".into()],
            start_occurrence,
            end_phrases: vec!["item 9".into(), "disagreements".into()],
            end_occurrence: Occurrence::Last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_from_lines(lines: &[&str]) -> Document {
        Document::from_text(&lines.join("\n"))
    }

    #[test]
    fn cleaning_strips_markup_characters_and_trims() {
        let doc = doc_from_lines(&["  ITEM 1. <b>BUSINESS</b> &#160;  "]);
        assert_eq!(doc.lines()[0], "ITEM 1. bBUSINESSb 160;");
    }

    #[test]
    fn cleaning_keeps_punctuation_set() {
        let doc = doc_from_lines(&["revenue: $1,000.5 - up; (net)"]);
        assert_eq!(doc.lines()[0], "revenue: 1,000.5 - up; net");
    }

    #[test]
    fn locates_third_occurrence_and_extracts_between_markers() {
        // Marker pairs appear three times: cover page, ToC, then the real
        // section. Only the third pair brackets the content we want.
        let mut lines = Vec::new();
        for _ in 0..2 {
            lines.push("ITEM 1. BUSINESS");
            lines.push("ITEM 1A. RISK FACTORS");
        }
        lines.push("ITEM 1. BUSINESS");
        lines.push("We design and sell widgets.");
        lines.push("Our widgets are popular.");
        lines.push("ITEM 1A. RISK FACTORS");
        let doc = doc_from_lines(&lines);

        let boundary = doc.locate(&SectionRule::business(3)).unwrap();
        assert!(boundary.start < boundary.end);
        assert_eq!(boundary.start, 4);
        assert_eq!(boundary.end, 7);
        assert_eq!(
            doc.section_text(&boundary),
            "We design and sell widgets. Our widgets are popular."
        );
    }

    #[test]
    fn section_text_excludes_marker_lines() {
        let mut lines = vec!["ITEM 1. BUSINESS", "ITEM 1A."];
        lines.extend_from_slice(&["ITEM 1. BUSINESS", "ITEM 1A."]);
        lines.extend_from_slice(&["ITEM 1. BUSINESS", "content", "ITEM 1A."]);
        let doc = doc_from_lines(&lines);

        let boundary = doc.locate(&SectionRule::business(3)).unwrap();
        let text = doc.section_text(&boundary);
        assert_eq!(text, "content");
        assert!(!text.to_lowercase().contains("item 1"));
    }

    #[test]
    fn missing_occurrence_is_section_not_found() {
        let doc = doc_from_lines(&["ITEM 1. BUSINESS", "text", "ITEM 1A. RISK FACTORS"]);
        let err = doc.locate(&SectionRule::business(3)).unwrap_err();
        assert!(matches!(err, ExtractError::SectionNotFound(_)));
    }

    #[test]
    fn inverted_markers_are_rejected() {
        // End marker's only hits precede the start marker's third hit.
        let doc = doc_from_lines(&[
            "ITEM 1A. RISK FACTORS",
            "ITEM 1. BUSINESS",
            "ITEM 1. BUSINESS",
            "ITEM 1. BUSINESS",
        ]);
        let rule = SectionRule {
            end_occurrence: Occurrence::Nth(1),
            ..SectionRule::business(3)
        };
        let err = doc.locate(&rule).unwrap_err();
        assert!(matches!(err, ExtractError::SectionNotFound(_)));
    }

    #[test]
    fn financial_rule_uses_last_end_marker() {
        let mut lines = Vec::new();
        for _ in 0..3 {
            lines.push("Item 7. Managements Discussion and Analysis");
        }
        lines.push("Item 7. Managements Discussion and Analysis");
        lines.push("Liquidity improved year over year.");
        lines.push("Item 9. Changes in and Disagreements with Accountants");
        lines.push("filler");
        lines.push("Item 9. Changes in and Disagreements with Accountants");
        let doc = doc_from_lines(&lines);

        let boundary = doc.locate(&SectionRule::financial(4)).unwrap();
        assert_eq!(boundary.start, 3);
        assert_eq!(boundary.end, 7);
        assert_eq!(
            doc.section_text(&boundary),
            "Liquidity improved year over year. Item 9. Changes in and Disagreements with Accountants filler"
        );
    }

    #[test]
    fn empty_document_is_distinct_error() {
        let doc = Document::from_text("");
        let err = doc.locate(&SectionRule::business(3)).unwrap_err();
        assert!(matches!(err, ExtractError::EmptyDocument));
    }
}
