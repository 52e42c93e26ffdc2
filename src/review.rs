// src/review.rs
//! Core data model shared by the collector, the oracle and the aggregator.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Placeholder stored in [`Review::date`] when the source carries no timestamp.
pub const DATE_MISSING: &str = "N/A";
/// Placeholder author for reviews without a `created_by.name`.
pub const ANONYMOUS: &str = "Anonymous";

/// One customer review as delivered by a review source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: i64,
    /// Never empty; empty-content records are dropped during collection.
    pub text: String,
    /// Raw timestamp text from the source, or [`DATE_MISSING`].
    pub date: String,
}

impl Review {
    /// Calendar month of the review as `YYYY-MM`, if the date parses.
    pub fn month(&self) -> Option<String> {
        parse_review_date(&self.date).map(|dt| dt.format("%Y-%m").to_string())
    }
}

/// Fixed sentiment labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Order used by the classifier's probability vector.
    pub const ORACLE_ORDER: [SentimentLabel; 3] = [
        SentimentLabel::Negative,
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
    ];

    /// Order used for display (charts, summaries).
    pub const DISPLAY_ORDER: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability triple aligned to [`SentimentLabel::ORACLE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub negative: f32,
    pub positive: f32,
    pub neutral: f32,
}

impl Probabilities {
    /// Build from raw non-negative scores in oracle order, renormalizing to sum 1.
    /// All-zero input yields a uniform distribution.
    pub fn from_scores(scores: [f32; 3]) -> Self {
        let clean = scores.map(|s| if s.is_finite() && s > 0.0 { s } else { 0.0 });
        let sum: f32 = clean.iter().sum();
        let [n, p, u] = if sum > 0.0 {
            clean.map(|s| s / sum)
        } else {
            [1.0 / 3.0; 3]
        };
        Self {
            negative: n,
            positive: p,
            neutral: u,
        }
    }

    /// Softmax over logits in oracle order.
    pub fn softmax(logits: [f32; 3]) -> Self {
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Self::from_scores(logits.map(|l| (l - max).exp()))
    }

    pub fn as_array(&self) -> [f32; 3] {
        [self.negative, self.positive, self.neutral]
    }

    pub fn get(&self, label: SentimentLabel) -> f32 {
        match label {
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    /// Highest-probability label; ties go to the earlier label in oracle order.
    pub fn argmax(&self) -> SentimentLabel {
        let mut best = SentimentLabel::ORACLE_ORDER[0];
        for label in SentimentLabel::ORACLE_ORDER.iter().copied().skip(1) {
            if self.get(label) > self.get(best) {
                best = label;
            }
        }
        best
    }
}

/// Oracle output for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: SentimentLabel,
    pub probabilities: Probabilities,
}

impl Classification {
    pub fn from_probabilities(probabilities: Probabilities) -> Self {
        Self {
            label: probabilities.argmax(),
            probabilities,
        }
    }
}

/// A review together with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedReview {
    #[serde(flatten)]
    pub review: Review,
    pub sentiment: SentimentLabel,
    pub probabilities: Probabilities,
}

impl ClassifiedReview {
    pub fn new(review: Review, c: Classification) -> Self {
        Self {
            review,
            sentiment: c.label,
            probabilities: c.probabilities,
        }
    }
}

/// Parse the timestamp formats the review API is known to return.
/// Returns `None` for [`DATE_MISSING`] and anything unrecognized.
pub fn parse_review_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() || s == DATE_MISSING {
        return None;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
