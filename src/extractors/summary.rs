// src/extractors/summary.rs
//
// Extractive summarization: a stemmed word-frequency table over the
// section text, per-sentence scores from it, and mean-threshold sentence
// selection.

use crate::nlp;
use std::collections::HashMap;

/// Stemmed, stopword-filtered token -> occurrence count for one body of
/// text. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn build(text: &str) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for word in nlp::words(text) {
            // Stemming runs on the token as tokenized; see nlp::stem.
            let stemmed = nlp::stem(word);
            if nlp::is_stopword(&stemmed) {
                continue;
            }
            *counts.entry(stemmed).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Scores each sentence: the sum of the counts of every table key
    /// appearing as a substring of the lowercased sentence, normalized by
    /// the number of distinct matching keys. A sentence matching no key
    /// scores 0.0. Scores are positional, indexed like `sentences`.
    pub fn score_sentences(&self, sentences: &[String]) -> Vec<f64> {
        sentences
            .iter()
            .map(|sentence| {
                let lowered = sentence.to_lowercase();
                let mut total = 0usize;
                let mut matched = 0usize;
                for (key, count) in &self.counts {
                    if lowered.contains(key.as_str()) {
                        total += count;
                        matched += 1;
                    }
                }
                if matched == 0 {
                    0.0
                } else {
                    total as f64 / matched as f64
                }
            })
            .collect()
    }
}

/// Selects, in original order, every sentence whose score reaches the
/// threshold: the mean of the strictly-positive scores times
/// `proportion`. Sentences are joined by single spaces; the result is
/// empty when nothing qualifies (including when no sentence scored
/// positive at all).
pub fn summarize(sentences: &[String], scores: &[f64], proportion: f64) -> String {
    debug_assert_eq!(sentences.len(), scores.len());

    let positive: Vec<f64> = scores.iter().copied().filter(|&s| s > 0.0).collect();
    if positive.is_empty() {
        return String::new();
    }
    let mean = positive.iter().sum::<f64>() / positive.len() as f64;
    let threshold = mean * proportion;

    let selected: Vec<&str> = sentences
        .iter()
        .zip(scores)
        .filter(|(_, &score)| score > 0.0 && score >= threshold)
        .map(|(sentence, _)| sentence.as_str())
        .collect();

    selected.join(" ")
}

/// Full pipeline for one section: sentence-tokenize, build the frequency
/// table, score, and select.
pub fn summarize_section(text: &str, proportion: f64) -> String {
    let sentences = nlp::sentences(text);
    let table = FrequencyTable::build(text);
    let scores = table.score_sentences(&sentences);
    summarize(&sentences, &scores, proportion)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn frequency_table_is_deterministic() {
        let text = "Widgets are sold worldwide. Widgets are manufactured locally.";
        assert_eq!(FrequencyTable::build(text), FrequencyTable::build(text));
    }

    #[test]
    fn frequency_table_drops_stopwords_and_counts_stems() {
        let table = FrequencyTable::build("the widget and the widgets");
        assert_eq!(table.count(&crate::nlp::stem("widget")), 2);
        assert_eq!(table.count("the"), 0);
    }

    #[test]
    fn unmatched_sentence_scores_zero_without_panicking() {
        let table = FrequencyTable::build("quarterly automotive revenue");
        let scores = table.score_sentences(&sentences(&["zzz qqq", "automotive revenue grew"]));
        assert_eq!(scores[0], 0.0);
        assert!(scores[1] > 0.0);
    }

    #[test]
    fn summarize_preserves_input_order() {
        let s = sentences(&["alpha words here", "beta words here", "gamma words here"]);
        let scores = vec![3.0, 1.0, 3.0];
        let summary = summarize(&s, &scores, 1.0);
        let alpha = summary.find("alpha").unwrap();
        let gamma = summary.find("gamma").unwrap();
        assert!(alpha < gamma);
    }

    #[test]
    fn summarize_is_idempotent() {
        let s = sentences(&["one strong sentence", "weak", "another strong sentence"]);
        let scores = vec![5.0, 0.5, 4.0];
        let first = summarize(&s, &scores, 0.8);
        let second = summarize(&s, &scores, 0.8);
        assert_eq!(first, second);
    }

    #[test]
    fn raising_proportion_never_selects_more() {
        let s = sentences(&["a one", "b two", "c three", "d four"]);
        let scores = vec![1.0, 2.0, 3.0, 4.0];
        let count = |p: f64| {
            let out = summarize(&s, &scores, p);
            if out.is_empty() { 0 } else { out.split(' ').count() }
        };
        let mut previous = usize::MAX;
        for p in [0.5, 0.8, 1.0, 1.5, 2.0] {
            let n = count(p);
            assert!(n <= previous, "proportion {} selected more sentences", p);
            previous = n;
        }
    }

    #[test]
    fn all_zero_scores_give_empty_summary() {
        let s = sentences(&["anything", "at all"]);
        let scores = vec![0.0, 0.0];
        assert_eq!(summarize(&s, &scores, 0.8), "");
    }
}
