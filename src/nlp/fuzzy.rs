use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Best candidate for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    /// Position of the candidate in the candidate list
    pub index: usize,
    /// Similarity score (0-100)
    pub score: u8,
}

/// Fuzzy string matching of a query against a candidate set
pub trait FuzzyMatcher {
    /// Similarity of two strings (0-100)
    fn score(&self, query: &str, candidate: &str) -> u8;

    /// Highest-scoring candidate; ties go to the earliest candidate
    fn best_match(&self, query: &str, candidates: &[&str]) -> Option<FuzzyMatch> {
        let mut best: Option<FuzzyMatch> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = self.score(query, candidate);
            if best.is_none_or(|b| score > b.score) {
                best = Some(FuzzyMatch { index, score });
            }
            if score == 100 {
                break;
            }
        }
        best
    }
}

/// Weighted combination of whole-string, token-sort and token-set ratios
///
/// Both strings are lowercased and reduced to alphanumeric tokens first.
/// When one string is at least 1.5x longer than the other, best-window
/// (partial) ratios are used instead and scaled down, so "Chair" still
/// scores well against "The Chair" but below an exact match.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

impl FuzzyMatcher for WeightedRatio {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        let a = preprocess(query);
        let b = preprocess(candidate);
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
        let len_ratio = len_a.max(len_b) / len_a.min(len_b);

        let best = if len_ratio < 1.5 {
            ratio(&a, &b)
                .max(token_sort_ratio(&a, &b, ratio) * 0.95)
                .max(token_set_ratio(&a, &b, ratio) * 0.95)
        } else {
            let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
            ratio(&a, &b)
                .max(partial_ratio(&a, &b) * partial_scale)
                .max(token_sort_ratio(&a, &b, partial_ratio) * 0.95 * partial_scale)
                .max(token_set_ratio(&a, &b, partial_ratio) * 0.95 * partial_scale)
        };

        best.round().clamp(0.0, 100.0) as u8
    }
}

/// Lowercase, replace non-alphanumerics with spaces, collapse whitespace
fn preprocess(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Best ratio of the shorter string against every equal-length window of the longer
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = short.chars().count();
    if short_len == 0 {
        return 0.0;
    }

    let long_chars: Vec<char> = long.chars().collect();
    let mut best: f64 = 0.0;
    for window in long_chars.windows(short_len) {
        let candidate: String = window.iter().collect();
        best = best.max(ratio(short, &candidate));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    scorer(&sorted_tokens(a), &sorted_tokens(b))
}

fn token_set_ratio(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let intersection = set_a.intersection(&set_b).copied().collect::<Vec<_>>().join(" ");
    let only_a = set_a.difference(&set_b).copied().collect::<Vec<_>>().join(" ");
    let only_b = set_b.difference(&set_a).copied().collect::<Vec<_>>().join(" ");

    let combined_a = format!("{} {}", intersection, only_a).trim().to_string();
    let combined_b = format!("{} {}", intersection, only_b).trim().to_string();

    scorer(&intersection, &combined_a)
        .max(scorer(&intersection, &combined_b))
        .max(scorer(&combined_a, &combined_b))
}
