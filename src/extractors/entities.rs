// src/extractors/entities.rs
//
// Industry classification by keyword voting, and product/organization
// mention extraction over the tagged entity spans.

use crate::nlp::{self, EntityTagger};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::utils::AppError;

/// Ordered industry -> keyword-list taxonomy. Declaration order is
/// significant: it breaks ties in the ranking, so the taxonomy is a
/// vector rather than a map.
#[derive(Debug, Clone, Deserialize)]
pub struct IndustryTaxonomy(Vec<(String, Vec<String>)>);

/// One ranked industry with its diagnostic keyword count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryMatch {
    pub name: String,
    pub count: usize,
}

pub static DEFAULT_TAXONOMY: Lazy<IndustryTaxonomy> = Lazy::new(|| {
    let entries = [
        // "IT" stays uppercase so it never collides with the pronoun
        // under lowercase token matching
        ("technology", vec!["technology", "telecommunications", "IT", "electronics", "software", "hardware"]),
        ("finance", vec!["finance", "banking", "investment", "financial", "insurance", "wealth management"]),
        ("advertisement", vec!["advertisement", "marketing", "advertising", "media", "promotion"]),
        ("construction", vec!["construction", "building", "architecture", "engineering", "infrastructure"]),
        ("insurance", vec!["insurance", "coverage", "policy", "underwriting", "risk management"]),
        ("retail", vec!["retail", "shopping", "store", "commerce", "merchandise", "consumer"]),
        ("education", vec!["education", "school", "learning", "teaching", "academy"]),
        ("transport", vec!["transport", "transportation", "logistics", "shipping", "delivery"]),
        ("manufacturing", vec!["manufacturing", "production", "factory", "industry", "assembly"]),
        ("defence and security", vec!["defence", "security", "military", "army", "defense", "safety"]),
        ("healthcare", vec!["healthcare", "health", "medical", "hospital", "medicine"]),
        ("energy", vec!["energy", "power", "electricity", "fuel", "renewable", "oil", "gas"]),
        ("entertainment", vec!["entertainment", "media", "film", "music", "arts", "culture"]),
        ("engineering", vec!["engineering", "technology", "design", "innovation", "development"]),
    ];
    IndustryTaxonomy(
        entries
            .into_iter()
            .map(|(name, kws)| {
                (name.to_string(), kws.into_iter().map(String::from).collect())
            })
            .collect(),
    )
});

impl IndustryTaxonomy {
    /// Loads a taxonomy from a JSON file: an array of
    /// `[industry, [keyword, ...]]` pairs, preserving array order.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("invalid industry taxonomy: {}", e)))
    }

    /// Counts keyword occurrences per industry over the lowercased text.
    /// Single-word keywords match whole tokens; multi-word keywords match
    /// as phrases. Every occurrence counts, not just the first.
    pub fn rank(&self, text: &str) -> Vec<IndustryMatch> {
        let lowered = text.to_lowercase();
        let tokens = nlp::words(&lowered);

        let mut ranking: Vec<IndustryMatch> = self
            .0
            .iter()
            .map(|(name, keywords)| {
                let count: usize = keywords
                    .iter()
                    .map(|kw| {
                        if kw.contains(' ') {
                            lowered.matches(kw.as_str()).count()
                        } else {
                            tokens.iter().filter(|&&t| t == kw.as_str()).count()
                        }
                    })
                    .sum();
                IndustryMatch {
                    name: name.clone(),
                    count,
                }
            })
            .collect();

        // Stable sort keeps declaration order for equal counts
        ranking.sort_by(|a, b| b.count.cmp(&a.count));
        ranking
    }

    /// The top-3 industries by keyword count.
    pub fn top_industries(&self, text: &str) -> Vec<IndustryMatch> {
        let mut ranking = self.rank(text);
        ranking.truncate(3);
        ranking
    }
}

// Spans containing any of these are boilerplate, not products.
const GENERAL_TERMS: [&str; 8] = [
    "Company", "Companys", "Business", "Securities", "Exchange", "SEC", "Workplace", "Reports",
];

/// Collects candidate product/organization mentions: organization-type
/// spans of at most 3 tokens, deduplicated, with general filing
/// boilerplate filtered out. Set semantics; no ordering guarantee.
pub fn product_entities<T: EntityTagger>(tagger: &T, text: &str) -> Vec<String> {
    let unique: HashSet<String> = tagger
        .organization_spans(text)
        .into_iter()
        .filter(|span| span.split_whitespace().count() <= 3)
        .collect();

    unique
        .into_iter()
        .filter(|span| {
            !span
                .split_whitespace()
                .any(|token| GENERAL_TERMS.contains(&token))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_keyword_text_ranks_its_industry_first() {
        let top = DEFAULT_TAXONOMY.top_industries("we provide healthcare");
        assert_eq!(top[0].name, "healthcare");
        assert_eq!(top[0].count, 1);
    }

    #[test]
    fn technology_scenario_counts_multiple_keywords() {
        let top = DEFAULT_TAXONOMY
            .top_industries("The technology sector relies on software and hardware innovation");
        assert_eq!(top[0].name, "technology");
        assert!(top[0].count >= 2);
    }

    #[test]
    fn ties_follow_declaration_order() {
        let taxonomy = IndustryTaxonomy(vec![
            ("first".into(), vec!["apple".into()]),
            ("second".into(), vec!["orange".into()]),
        ]);
        let top = taxonomy.top_industries("apple orange");
        assert_eq!(top[0].name, "first");
        assert_eq!(top[1].name, "second");
    }

    #[test]
    fn occurrences_accumulate_per_keyword() {
        let taxonomy = IndustryTaxonomy(vec![("energy".into(), vec!["oil".into()])]);
        let top = taxonomy.top_industries("oil and oil and more oil");
        assert_eq!(top[0].count, 3);
    }

    #[test]
    fn multiword_keywords_match_as_phrases() {
        let taxonomy =
            IndustryTaxonomy(vec![("finance".into(), vec!["wealth management".into()])]);
        let top = taxonomy.top_industries("our wealth management arm grew");
        assert_eq!(top[0].count, 1);
    }

    struct FixedTagger(Vec<&'static str>);

    impl EntityTagger for FixedTagger {
        fn organization_spans(&self, _text: &str) -> Vec<String> {
            self.0.iter().map(|s| s.to_string()).collect()
        }
    }

    #[test]
    fn product_entities_filter_general_terms_and_long_spans() {
        let tagger = FixedTagger(vec![
            "Model S",
            "Model S",
            "The Company",
            "Securities Act",
            "A Very Long Product Name",
        ]);
        let mut out = product_entities(&tagger, "");
        out.sort();
        assert_eq!(out, vec!["Model S"]);
    }
}
