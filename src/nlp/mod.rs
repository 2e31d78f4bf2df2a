// src/nlp/mod.rs
//
// Thin wrappers around the external language-processing capabilities the
// pipeline delegates to: word/sentence tokenization, stemming, stopword
// lookup, and organization-span tagging.

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

static ENGLISH_STOPWORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    stop_words::get(stop_words::LANGUAGE::English)
        .into_iter()
        .collect()
});

static ENGLISH_STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Splits text into word tokens. Case is preserved as found in the input.
pub fn words(text: &str) -> Vec<&str> {
    text.unicode_words().collect()
}

/// Splits text into sentence strings.
pub fn sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Reduces a word to its approximate root form.
///
/// Note that stemming runs on the token as tokenized, so two tokens
/// differing only in case can stem to different keys unless the caller
/// lowercases first.
pub fn stem(word: &str) -> String {
    ENGLISH_STEMMER.stem(word).into_owned()
}

pub fn is_stopword(word: &str) -> bool {
    ENGLISH_STOPWORDS.contains(word)
}

/// Tags contiguous spans of text that look like organization/product
/// mentions. Seam for the external named-entity model; the shipped
/// implementation is rule-based.
pub trait EntityTagger {
    fn organization_spans(&self, text: &str) -> Vec<String>;
}

/// Rule-based tagger: a run of consecutive capitalized word tokens is
/// treated as one organization-type span. A lone capitalized token at the
/// start of a sentence is skipped, since that is ordinary casing rather
/// than a name.
pub struct HeuristicTagger;

fn is_capitalized(token: &str) -> bool {
    token
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(false)
}

impl EntityTagger for HeuristicTagger {
    fn organization_spans(&self, text: &str) -> Vec<String> {
        let mut spans = Vec::new();

        for sentence in text.unicode_sentences() {
            let tokens: Vec<&str> = sentence.unicode_words().collect();
            let mut current: Vec<&str> = Vec::new();

            for (i, &token) in tokens.iter().enumerate() {
                let sentence_initial_alone = i == 0
                    && tokens
                        .get(1)
                        .map(|next| !is_capitalized(next))
                        .unwrap_or(true);

                if is_capitalized(token) && !sentence_initial_alone {
                    current.push(token);
                } else if !current.is_empty() {
                    spans.push(current.join(" "));
                    current.clear();
                }
            }
            if !current.is_empty() {
                spans.push(current.join(" "));
            }
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_splits_on_punctuation() {
        assert_eq!(words("Tesla, Inc. designs vehicles"), vec!["Tesla", "Inc", "designs", "vehicles"]);
    }

    #[test]
    fn sentences_are_trimmed_and_nonempty() {
        let s = sentences("First sentence. Second sentence!  ");
        assert_eq!(s.len(), 2);
        assert_eq!(s[0], "First sentence.");
    }

    #[test]
    fn stemming_reduces_to_root() {
        assert_eq!(stem("manufacturing"), stem("manufactured"));
    }

    #[test]
    fn stopwords_recognized() {
        assert!(is_stopword("the"));
        assert!(!is_stopword("vehicle"));
    }

    #[test]
    fn tagger_groups_capitalized_runs() {
        let spans = HeuristicTagger.organization_spans("We partner with Panasonic Energy on battery cells");
        assert!(spans.contains(&"Panasonic Energy".to_string()));
    }
}
