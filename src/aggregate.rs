// src/aggregate.rs
//! Aggregation over classified reviews: per-label counts, monthly counts,
//! and common-word filtered token frequencies.
//!
//! Tokens are lowercased everywhere (set building, filtering, counting).

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::review::{ClassifiedReview, SentimentLabel};

/// Most frequent terms kept for the word cloud.
pub const DEFAULT_MAX_TERMS: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    fn bump(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month: String,
    pub sentiment: SentimentLabel,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermWeight {
    pub term: String,
    pub count: usize,
    /// `count / max count`, in `(0, 1]`.
    pub weight: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenCloud {
    /// Tokens present in all three buckets, sorted.
    pub common_words: Vec<String>,
    pub terms: Vec<TermWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub counts: SentimentCounts,
    pub monthly: Vec<MonthlyCount>,
    pub tokens: TokenCloud,
}

pub fn sentiment_counts(reviews: &[ClassifiedReview]) -> SentimentCounts {
    let mut c = SentimentCounts::default();
    for r in reviews {
        c.bump(r.sentiment);
    }
    c
}

/// Count reviews per (month, label). Unparseable dates are skipped.
/// Sorted by month, then Positive, Neutral, Negative; zero buckets omitted.
pub fn monthly_counts(reviews: &[ClassifiedReview]) -> Vec<MonthlyCount> {
    let mut buckets: BTreeMap<(String, SentimentLabel), usize> = BTreeMap::new();
    for r in reviews {
        if let Some(month) = r.review.month() {
            *buckets.entry((month, r.sentiment)).or_default() += 1;
        }
    }
    buckets
        .into_iter()
        .map(|((month, sentiment), count)| MonthlyCount {
            month,
            sentiment,
            count,
        })
        .collect()
}

/// Lowercase a whitespace-delimited token and strip surrounding punctuation.
pub fn normalize_token(raw: &str) -> Option<String> {
    let t = raw.trim_matches(|c: char| !c.is_alphanumeric());
    if t.is_empty() {
        None
    } else {
        Some(t.to_lowercase())
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(normalize_token)
}

/// Tokens that appear in every bucket's text. Empty if any bucket is empty.
pub fn common_words(reviews: &[ClassifiedReview]) -> HashSet<String> {
    let mut sets: HashMap<SentimentLabel, HashSet<String>> = HashMap::new();
    for r in reviews {
        sets.entry(r.sentiment)
            .or_default()
            .extend(tokens(&r.review.text));
    }

    let mut it = SentimentLabel::DISPLAY_ORDER.iter().map(|l| sets.remove(l));
    let Some(Some(mut common)) = it.next() else {
        return HashSet::new();
    };
    for set in it {
        match set {
            Some(s) => common.retain(|t| s.contains(t)),
            None => return HashSet::new(),
        }
    }
    common
}

/// Frequency of non-common tokens across all reviews, most frequent first.
pub fn token_frequencies(reviews: &[ClassifiedReview], max_terms: usize) -> TokenCloud {
    let common = common_words(reviews);

    let mut freq: HashMap<String, usize> = HashMap::new();
    for r in reviews {
        for t in tokens(&r.review.text) {
            if !common.contains(&t) {
                *freq.entry(t).or_default() += 1;
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(max_terms);

    let max = ranked.first().map(|(_, c)| *c).unwrap_or(1).max(1) as f32;
    let terms = ranked
        .into_iter()
        .map(|(term, count)| TermWeight {
            term,
            count,
            weight: count as f32 / max,
        })
        .collect();

    let mut common_words: Vec<String> = common.into_iter().collect();
    common_words.sort();

    TokenCloud {
        common_words,
        terms,
    }
}

pub fn summarize(reviews: &[ClassifiedReview]) -> ReviewSummary {
    ReviewSummary {
        total: reviews.len(),
        counts: sentiment_counts(reviews),
        monthly: monthly_counts(reviews),
        tokens: token_frequencies(reviews, DEFAULT_MAX_TERMS),
    }
}
