// src/oracle/mod.rs
//! Sentiment oracle: provider abstraction over the external classifier.
//!
//! The oracle is built once from config and handed explicitly to whoever needs
//! it (API state, CLI). There is no process-wide model state.

pub mod hosted;
pub mod lexicon;

use std::sync::Arc;

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};

use crate::config::{OracleConfig, OracleProvider};
use crate::review::{Classification, ClassifiedReview, Review};

/// Inputs are cut to this many whitespace tokens before classification.
pub const MAX_TOKENS: usize = 512;

#[async_trait::async_trait]
pub trait SentimentOracle: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification>;
    /// Provider name for diagnostics/responses.
    fn name(&self) -> &'static str;
}

pub type DynOracle = Arc<dyn SentimentOracle>;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "oracle_classifications_total",
            "Texts classified by the sentiment oracle."
        );
        describe_counter!("oracle_errors_total", "Sentiment oracle failures.");
        describe_histogram!("oracle_classify_ms", "Oracle latency in milliseconds.");
    });
}

/// Build the configured oracle.
pub fn from_config(cfg: &OracleConfig) -> Result<DynOracle> {
    match cfg.provider {
        OracleProvider::Hosted => Ok(Arc::new(hosted::HostedOracle::new(cfg)?)),
        OracleProvider::Lexicon => Ok(Arc::new(lexicon::LexiconOracle::new())),
    }
}

/// Keep at most `max` whitespace-delimited tokens, joined by single spaces.
/// Text at or under the limit is returned unchanged.
pub fn truncate_tokens(text: &str, max: usize) -> std::borrow::Cow<'_, str> {
    if text.split_whitespace().nth(max).is_none() {
        return std::borrow::Cow::Borrowed(text);
    }
    let kept: Vec<&str> = text.split_whitespace().take(max).collect();
    std::borrow::Cow::Owned(kept.join(" "))
}

/// Classify one text with timing, metrics and anonymized logging.
pub async fn classify_text(oracle: &dyn SentimentOracle, text: &str) -> Result<Classification> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();
    let input = truncate_tokens(text, MAX_TOKENS);
    let res = oracle.classify(&input).await;
    histogram!("oracle_classify_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    match &res {
        Ok(c) => {
            counter!("oracle_classifications_total").increment(1);
            tracing::debug!(
                target: "oracle",
                oracle = oracle.name(),
                id = %anon_hash(text),
                label = %c.label,
                "classified"
            );
        }
        Err(e) => {
            counter!("oracle_errors_total").increment(1);
            tracing::warn!(
                target: "oracle",
                oracle = oracle.name(),
                id = %anon_hash(text),
                error = ?e,
                "classification failed"
            );
        }
    }
    res
}

/// Classify reviews one at a time, in order. The first failure aborts.
pub async fn classify_reviews(
    oracle: &dyn SentimentOracle,
    reviews: Vec<Review>,
) -> Result<Vec<ClassifiedReview>> {
    let mut out = Vec::with_capacity(reviews.len());
    for review in reviews {
        let c = classify_text(oracle, &review.text).await?;
        out.push(ClassifiedReview::new(review, c));
    }
    Ok(out)
}

/// Short SHA-256 prefix used in logs instead of raw review text.
pub(crate) fn anon_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
