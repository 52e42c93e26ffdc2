// src/collector/types.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::review::{Review, ANONYMOUS, DATE_MISSING};

/// One review record as it appears in the remote `data` array.
///
/// Every field is optional; the mapping in [`RawReview::into_review`] fills
/// the defaults the UI expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub timeline: Option<Timeline>,
    #[serde(default)]
    pub created_by: Option<CreatedBy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub review_created_date: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatedBy {
    #[serde(default)]
    pub name: Option<String>,
}

impl RawReview {
    /// Shorthand used by fixtures and tests.
    pub fn new(author: &str, rating: i64, content: &str, date: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            rating: Some(Value::from(rating)),
            timeline: Some(Timeline {
                review_created_date: Some(Value::from(date)),
            }),
            created_by: Some(CreatedBy {
                name: Some(author.to_string()),
            }),
        }
    }

    /// Map to a [`Review`]. Returns `None` when the content is empty.
    pub fn into_review(self) -> Option<Review> {
        let text = self.content.unwrap_or_default();
        if text.is_empty() {
            return None;
        }

        let rating = match self.rating {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        };

        let date = match self.timeline.and_then(|t| t.review_created_date) {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => DATE_MISSING.to_string(),
        };

        let author = self
            .created_by
            .and_then(|c| c.name)
            .unwrap_or_else(|| ANONYMOUS.to_string());

        Some(Review {
            author,
            rating,
            text,
            date,
        })
    }
}

/// Successful page body: `{ "data": [...] }`. A missing or null `data` is an
/// empty page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPage {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

impl ReviewPage {
    /// Decode each record on its own; records that don't fit the shape are
    /// skipped, the rest of the page is kept.
    pub fn into_records(self) -> Vec<RawReview> {
        let data = self.data.unwrap_or_default();
        let total = data.len();
        let records: Vec<RawReview> = data
            .into_iter()
            .filter_map(|v| match serde_json::from_value(v) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::debug!(target: "collector", error = %e, "skipping malformed review record");
                    None
                }
            })
            .collect();
        if records.len() < total {
            tracing::warn!(
                target: "collector",
                skipped = total - records.len(),
                "malformed review records skipped"
            );
        }
        records
    }
}

/// Outcome of fetching one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageFetch {
    Success(Vec<RawReview>),
    /// The source knows there is nothing past this page.
    Exhausted,
    /// Non-success status, transport failure or undecodable body.
    TransientError {
        status: Option<u16>,
        reason: String,
    },
}

/// Why collection stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectionEnd {
    /// The configured maximum was reached.
    LimitReached,
    /// A page came back empty; `pages` is the number of non-empty pages read.
    Exhausted { pages: u32 },
    /// A page failed; reviews gathered before it are kept.
    FetchFailed {
        page: u32,
        status: Option<u16>,
        reason: String,
    },
}

impl CollectionEnd {
    pub fn is_failure(&self) -> bool {
        matches!(self, CollectionEnd::FetchFailed { .. })
    }
}

/// Bounded, ordered reviews for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCollection {
    pub reviews: Vec<Review>,
    pub end: CollectionEnd,
}

impl ReviewCollection {
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

#[async_trait::async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetch one 1-based page of reviews for `product_id`.
    async fn fetch_page(&self, product_id: &str, page: u32, limit: u32) -> PageFetch;
    fn name(&self) -> &'static str;
}
