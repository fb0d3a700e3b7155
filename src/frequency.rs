//! Word-frequency ranking.

use std::collections::HashMap;

use serde::Serialize;

use crate::stopwords::StopwordSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

/// Splits on whitespace and lowercases. Punctuation stays attached to its
/// token, so `fast.` and `fast` count separately.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

/// Returns at most `limit` words that are not stopwords, most frequent
/// first. Equal counts are ordered by the word itself so the output is
/// reproducible.
pub fn rank_words(text: &str, stopwords: &StopwordSet, limit: usize) -> Vec<WordFrequency> {
    if limit == 0 {
        return Vec::new();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokenize(text).filter(|t| !stopwords.contains(t)) {
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut ranked: Vec<WordFrequency> = counts
        .into_iter()
        .map(|(word, count)| WordFrequency { word, count })
        .collect();
    ranked.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    ranked.truncate(limit);
    ranked
}
