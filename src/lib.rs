// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod aggregate;
pub mod api;
pub mod charts;
pub mod collector;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod oracle;
pub mod product;
pub mod review;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::collector::{collect_reviews, CollectorConfig};
pub use crate::oracle::{DynOracle, SentimentOracle};
pub use crate::product::extract_product_id;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tower_http::services::ServeDir;
use tracing::info;

use crate::collector::providers::tiki::TikiReviewSource;
use crate::config::AppConfig;

/// Directory holding the dashboard page.
pub const STATIC_DIR: &str = "static";

/// Build the full app from config loaded off disk + environment.
pub async fn app() -> Result<Router> {
    let cfg = AppConfig::load()?;
    build_app(&cfg)
}

/// Build the oracle, the review source and the router from an explicit config.
pub fn build_app(cfg: &AppConfig) -> Result<Router> {
    let oracle = oracle::from_config(&cfg.oracle)?;
    let source = TikiReviewSource::new(
        &cfg.reviews.base_url,
        &cfg.reviews.user_agent,
        Duration::from_secs(cfg.reviews.timeout_secs),
    )?;
    info!(
        oracle = oracle.name(),
        reviews_url = source.base_url(),
        max_reviews = cfg.reviews.max_reviews,
        page_size = cfg.reviews.page_size,
        "app config loaded"
    );

    let state = AppState {
        oracle,
        source: Arc::new(source),
        collector: cfg.reviews.collector(),
    };
    with_extras(router(state))
}

/// Attach `/metrics` and the static dashboard to an API router.
pub fn with_extras(api: Router) -> Result<Router> {
    let metrics = crate::metrics::Metrics::init()?;
    Ok(api
        .merge(metrics.router())
        .fallback_service(ServeDir::new(STATIC_DIR)))
}
