// src/collector/mod.rs
pub mod providers;
pub mod types;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::collector::types::{CollectionEnd, PageFetch, ReviewCollection, ReviewSource};

pub const DEFAULT_MAX_REVIEWS: usize = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "reviews_pages_fetched_total",
            "Review pages returned successfully by a source."
        );
        describe_counter!(
            "reviews_fetch_errors_total",
            "Review page fetches that failed."
        );
        describe_counter!(
            "reviews_collected_total",
            "Reviews kept after dropping empty content."
        );
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub max_reviews: usize,
    pub page_size: u32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_reviews: DEFAULT_MAX_REVIEWS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Page through `source` until `max_reviews` is reached, a page comes back
/// empty, or a fetch fails. Never errors: failures surface as
/// [`CollectionEnd::FetchFailed`] with whatever was gathered before.
pub async fn collect_reviews(
    source: &dyn ReviewSource,
    product_id: &str,
    cfg: &CollectorConfig,
) -> ReviewCollection {
    ensure_metrics_described();

    let max = cfg.max_reviews;
    let limit = cfg.page_size.max(1);
    let mut reviews = Vec::with_capacity(max.min(1_000));
    let mut page: u32 = 1;

    let end = loop {
        if reviews.len() >= max {
            break CollectionEnd::LimitReached;
        }

        match source.fetch_page(product_id, page, limit).await {
            PageFetch::Success(records) if records.is_empty() => {
                break CollectionEnd::Exhausted { pages: page - 1 };
            }
            PageFetch::Success(records) => {
                counter!("reviews_pages_fetched_total").increment(1);
                let before = reviews.len();
                for raw in records {
                    if let Some(r) = raw.into_review() {
                        reviews.push(r);
                    }
                    if reviews.len() >= max {
                        break;
                    }
                }
                tracing::debug!(
                    target: "collector",
                    source = source.name(),
                    product_id,
                    page,
                    kept = reviews.len() - before,
                    "page collected"
                );
                page += 1;
            }
            PageFetch::Exhausted => {
                break CollectionEnd::Exhausted { pages: page - 1 };
            }
            PageFetch::TransientError { status, reason } => {
                counter!("reviews_fetch_errors_total").increment(1);
                tracing::warn!(
                    target: "collector",
                    source = source.name(),
                    product_id,
                    page,
                    ?status,
                    %reason,
                    "review page fetch failed; returning partial collection"
                );
                break CollectionEnd::FetchFailed {
                    page,
                    status,
                    reason,
                };
            }
        }
    };

    reviews.truncate(max);
    counter!("reviews_collected_total").increment(reviews.len() as u64);
    tracing::info!(
        target: "collector",
        source = source.name(),
        product_id,
        collected = reviews.len(),
        end = ?end,
        "review collection finished"
    );

    ReviewCollection { reviews, end }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::providers::fixture::FixtureSource;
    use crate::collector::types::RawReview;

    fn page(n: usize, tag: &str) -> Vec<RawReview> {
        (0..n)
            .map(|i| RawReview::new("u", 5, &format!("{tag}-{i}"), "2024-01-01"))
            .collect()
    }

    #[tokio::test]
    async fn zero_max_skips_fetching() {
        let src = FixtureSource::new(vec![PageFetch::TransientError {
            status: Some(500),
            reason: "should not be called".into(),
        }]);
        let cfg = CollectorConfig {
            max_reviews: 0,
            page_size: 20,
        };
        let out = collect_reviews(&src, "1", &cfg).await;
        assert!(out.is_empty());
        assert_eq!(out.end, CollectionEnd::LimitReached);
        assert_eq!(src.calls(), 0);
    }

    #[tokio::test]
    async fn stops_mid_page_at_limit() {
        let src = FixtureSource::new(vec![
            PageFetch::Success(page(4, "a")),
            PageFetch::Success(page(4, "b")),
        ]);
        let cfg = CollectorConfig {
            max_reviews: 6,
            page_size: 4,
        };
        let out = collect_reviews(&src, "1", &cfg).await;
        assert_eq!(out.len(), 6);
        assert_eq!(out.reviews[5].text, "b-1");
        assert_eq!(out.end, CollectionEnd::LimitReached);
        assert_eq!(src.calls(), 2);
    }

    #[tokio::test]
    async fn explicit_exhausted_counts_read_pages() {
        let src = FixtureSource::new(vec![
            PageFetch::Success(page(2, "a")),
            PageFetch::Exhausted,
        ]);
        let out = collect_reviews(&src, "1", &CollectorConfig::default()).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out.end, CollectionEnd::Exhausted { pages: 1 });
    }
}
