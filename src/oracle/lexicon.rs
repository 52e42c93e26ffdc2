// src/oracle/lexicon.rs
//! Offline lexicon classifier. Deterministic, used for development and tests.

use std::collections::HashMap;

use anyhow::Result;
use once_cell::sync::Lazy;

use super::SentimentOracle;
use crate::review::{Classification, Probabilities};

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).unwrap_or_else(|e| {
        tracing::error!(target: "oracle", error = %e, "embedded lexicon is invalid");
        HashMap::new()
    })
});

/// Baseline logit for the Neutral class; texts without lexicon hits land here.
const NEUTRAL_BIAS: f32 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct LexiconOracle;

impl LexiconOracle {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (positive mass, negative mass).
    /// A negator within the previous 1..=3 tokens flips a word's polarity.
    pub fn polarity(&self, text: &str) -> (u32, u32) {
        let tokens: Vec<String> = tokenize(text).collect();
        let (mut pos, mut neg) = (0u32, 0u32);

        for i in 0..tokens.len() {
            let base = self.word_score(&tokens[i]);
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(&tokens[i - k]));
            let adj = if negated { -base } else { base };
            if adj > 0 {
                pos += adj.unsigned_abs();
            } else {
                neg += adj.unsigned_abs();
            }
        }

        (pos, neg)
    }

    pub fn classify_sync(&self, text: &str) -> Classification {
        let (pos, neg) = self.polarity(text);
        let probs = Probabilities::softmax([neg as f32, pos as f32, NEUTRAL_BIAS]);
        Classification::from_probabilities(probs)
    }
}

#[async_trait::async_trait]
impl SentimentOracle for LexiconOracle {
    async fn classify(&self, text: &str) -> Result<Classification> {
        Ok(self.classify_sync(text))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Alphanumeric (Unicode) tokens, lowercased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "không" | "chẳng" | "chả" | "chưa" | "đừng" | "not" | "no" | "never" | "without"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::SentimentLabel;

    #[test]
    fn positive_words_win() {
        let c = LexiconOracle::new().classify_sync("Sản phẩm rất tốt, giao hàng nhanh");
        assert_eq!(c.label, SentimentLabel::Positive);
    }

    #[test]
    fn negator_flips_polarity() {
        let o = LexiconOracle::new();
        let (pos, neg) = o.polarity("hàng không tốt");
        assert_eq!(pos, 0);
        assert!(neg > 0);
        assert_eq!(o.classify_sync("hàng không tốt").label, SentimentLabel::Negative);
    }

    #[test]
    fn no_hits_is_neutral() {
        let c = LexiconOracle::new().classify_sync("đã nhận hàng hôm qua");
        assert_eq!(c.label, SentimentLabel::Neutral);
        let sum: f32 = c.probabilities.as_array().iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }
}
