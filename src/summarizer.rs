//! Extractive summarization.
//!
//! Sentences are scored by the average document-wide frequency of their
//! words. The best ones are kept and returned in reading order.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::frequency::tokenize;

/// Picks up to `count` sentences from `text`, in the order they appear.
///
/// Documents with fewer sentences than requested return all of them; a
/// document without sentences returns an empty vector.
pub fn summarize(text: &str, count: usize) -> Result<Vec<String>> {
    if count < 1 {
        return Err(AppError::SummarizerInput(count));
    }

    let sentences = split_sentences(text);
    if sentences.len() <= count {
        return Ok(sentences.into_iter().map(str::to_string).collect());
    }

    let tokenized: Vec<Vec<String>> = sentences.iter().map(|s| tokenize(s).collect()).collect();

    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for token in tokenized.iter().flatten() {
        *frequencies.entry(token.as_str()).or_insert(0) += 1;
    }

    let scores: Vec<f64> = tokenized
        .iter()
        .map(|tokens| {
            let total: usize = tokens.iter().map(|t| frequencies[t.as_str()]).sum();
            total as f64 / tokens.len().max(1) as f64
        })
        .collect();

    let mut ranked: Vec<usize> = (0..sentences.len()).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    ranked.truncate(count);
    ranked.sort_unstable();

    Ok(ranked.into_iter().map(|i| sentences[i].to_string()).collect())
}

/// Splits on runs of `.`, `!` and `?` that are followed by whitespace or
/// the end of the text. Terminators stay with their sentence; a trailing
/// fragment without one is still a sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        while let Some(&(_, next)) = chars.peek() {
            if !is_terminator(next) {
                break;
            }
            chars.next();
        }
        let end = chars.peek().map_or(text.len(), |&(i, _)| i);
        let at_boundary = chars.peek().is_none_or(|&(_, next)| next.is_whitespace());
        if at_boundary {
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATS: &str = "The cat sat. The cat ran fast. Dogs bark loudly.";

    #[test]
    fn sentences_split_on_terminal_punctuation() {
        assert_eq!(
            split_sentences(CATS),
            vec!["The cat sat.", "The cat ran fast.", "Dogs bark loudly."]
        );
    }

    #[test]
    fn terminator_runs_and_trailing_fragments() {
        assert_eq!(
            split_sentences("  Really?! Yes...  no way  "),
            vec!["Really?!", "Yes...", "no way"]
        );
    }

    #[test]
    fn inner_dots_do_not_split() {
        assert_eq!(
            split_sentences("Pi is 3.14 roughly. See example.com now."),
            vec!["Pi is 3.14 roughly.", "See example.com now."]
        );
    }

    #[test]
    fn blank_text_has_no_sentences() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" \n\t ").is_empty());
    }

    #[test]
    fn selected_sentences_keep_document_order() {
        let summary = summarize(CATS, 2).unwrap();
        assert_eq!(summary, vec!["The cat sat.", "The cat ran fast."]);
    }

    #[test]
    fn best_sentence_late_in_text_stays_in_place() {
        let text = "Intro line here. Rust rust rust. Filler words abound. Rust is rust.";
        let summary = summarize(text, 2).unwrap();
        assert_eq!(summary, vec!["Rust rust rust.", "Rust is rust."]);
    }

    #[test]
    fn short_documents_return_every_sentence() {
        let summary = summarize(CATS, 5).unwrap();
        assert_eq!(summary, split_sentences(CATS));
    }

    #[test]
    fn empty_text_summarizes_to_nothing() {
        assert!(summarize("", 3).unwrap().is_empty());
    }

    #[test]
    fn zero_sentences_is_rejected() {
        assert!(matches!(summarize(CATS, 0), Err(AppError::SummarizerInput(0))));
    }

    #[test]
    fn summary_is_repeatable() {
        let text = "One two. Two three. Three four. Four five. Five one.";
        assert_eq!(summarize(text, 2).unwrap(), summarize(text, 2).unwrap());
    }
}
