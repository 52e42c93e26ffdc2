// src/collector/providers/fixture.rs
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::collector::types::{PageFetch, ReviewPage, ReviewSource};

/// In-memory review source: page `n` returns the `n`-th scripted result,
/// pages past the script are empty.
pub struct FixtureSource {
    pages: Vec<PageFetch>,
    calls: AtomicUsize,
}

impl FixtureSource {
    pub fn new(pages: Vec<PageFetch>) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
        }
    }

    /// Build from JSON page bodies shaped like the remote API (`{"data": [...]}`).
    pub fn from_json_pages(bodies: &[&str]) -> Result<Self> {
        let mut pages = Vec::with_capacity(bodies.len());
        for (i, body) in bodies.iter().enumerate() {
            let parsed: ReviewPage = serde_json::from_str(body)
                .with_context(|| format!("parsing fixture page {}", i + 1))?;
            pages.push(PageFetch::Success(parsed.into_records()));
        }
        Ok(Self::new(pages))
    }

    /// Number of `fetch_page` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewSource for FixtureSource {
    async fn fetch_page(&self, _product_id: &str, page: u32, _limit: u32) -> PageFetch {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let idx = (page as usize).saturating_sub(1);
        self.pages
            .get(idx)
            .cloned()
            .unwrap_or(PageFetch::Success(Vec::new()))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
