// src/collector/providers/tiki.rs
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::collector::types::{PageFetch, ReviewPage, ReviewSource};

pub const DEFAULT_TIKI_REVIEWS_URL: &str = "https://tiki.vn/api/v2/reviews";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Review source backed by Tiki's public JSON reviews endpoint.
pub struct TikiReviewSource {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl TikiReviewSource {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .timeout(timeout)
            .build()
            .context("building tiki http client")?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            user_agent: user_agent.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ReviewSource for TikiReviewSource {
    async fn fetch_page(&self, product_id: &str, page: u32, limit: u32) -> PageFetch {
        let limit_s = limit.to_string();
        let page_s = page.to_string();
        let resp = match self
            .http
            .get(&self.base_url)
            .query(&[
                ("product_id", product_id),
                ("limit", limit_s.as_str()),
                ("page", page_s.as_str()),
            ])
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return PageFetch::TransientError {
                    status: None,
                    reason: format!("request failed: {e}"),
                }
            }
        };

        let status = resp.status();
        if !status.is_success() {
            return PageFetch::TransientError {
                status: Some(status.as_u16()),
                reason: format!("non-success status {status}"),
            };
        }

        match resp.json::<ReviewPage>().await {
            Ok(body) => PageFetch::Success(body.into_records()),
            // The status was fine; only the body was unusable.
            Err(e) => PageFetch::TransientError {
                status: None,
                reason: format!("decoding review page: {e}"),
            },
        }
    }

    fn name(&self) -> &'static str {
        "tiki"
    }
}
