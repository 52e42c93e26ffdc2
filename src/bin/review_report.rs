//! Fetch, classify and summarize a product's reviews from the command line.
//!
//! Usage: `review_report <tiki-product-url> [--max N] [--offline]`
//! Prints a JSON report to stdout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use review_sentiment_analyzer::collector::providers::tiki::TikiReviewSource;
use review_sentiment_analyzer::config::AppConfig;
use review_sentiment_analyzer::oracle::{self, lexicon::LexiconOracle, DynOracle};
use review_sentiment_analyzer::{aggregate, charts, collect_reviews, extract_product_id};

#[derive(Debug, Parser)]
#[command(name = "review_report", version, about = "Sentiment report for a Tiki product's reviews")]
struct Args {
    /// Tiki product URL, e.g. https://tiki.vn/some-product-p12345.html
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of reviews to collect (defaults to the configured value)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max: Option<u32>,

    /// Use the built-in lexicon classifier instead of the configured oracle
    #[arg(long, default_value_t = false)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    review_sentiment_analyzer::logging::init_tracing();

    let args = Args::parse();
    let cfg = AppConfig::load()?;

    let product_id = extract_product_id(&args.url)
        .context("could not extract product id from the provided URL")?;

    let oracle: DynOracle = if args.offline {
        Arc::new(LexiconOracle::new())
    } else {
        oracle::from_config(&cfg.oracle)?
    };
    let source = TikiReviewSource::new(
        &cfg.reviews.base_url,
        &cfg.reviews.user_agent,
        Duration::from_secs(cfg.reviews.timeout_secs),
    )?;

    let mut collector = cfg.reviews.collector();
    if let Some(n) = args.max {
        collector.max_reviews = n as usize;
    }

    let collection = collect_reviews(&source, &product_id, &collector).await;
    let end = collection.end;
    let classified = oracle::classify_reviews(oracle.as_ref(), collection.reviews).await?;
    let summary = aggregate::summarize(&classified);
    let chart_set = charts::build(&summary);

    let report = json!({
        "product_id": product_id,
        "oracle": oracle.name(),
        "fetched": classified.len(),
        "end": end,
        "summary": summary,
        "charts": chart_set,
        "reviews": classified,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_url_and_flags() {
        let args = Args::try_parse_from([
            "review_report",
            "https://tiki.vn/x-p1.html",
            "--max",
            "50",
            "--offline",
        ])
        .expect("parse");
        assert_eq!(args.url, "https://tiki.vn/x-p1.html");
        assert_eq!(args.max, Some(50));
        assert!(args.offline);
    }

    #[test]
    fn rejects_missing_url_and_bad_max() {
        assert!(Args::try_parse_from(["review_report"]).is_err());
        assert!(Args::try_parse_from(["review_report", "u", "--max", "zero"]).is_err());
        assert!(Args::try_parse_from(["review_report", "u", "--max", "0"]).is_err());
    }
}
