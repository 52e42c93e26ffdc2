// tests/collector_paging.rs
//
// Paging and termination behavior of the review collector against scripted sources.

use review_sentiment_analyzer::collector::providers::fixture::FixtureSource;
use review_sentiment_analyzer::collector::types::{CollectionEnd, PageFetch, RawReview};
use review_sentiment_analyzer::collector::{collect_reviews, CollectorConfig};
use review_sentiment_analyzer::review::{ANONYMOUS, DATE_MISSING};

fn page(n: usize, tag: &str) -> PageFetch {
    PageFetch::Success(
        (0..n)
            .map(|i| RawReview::new("buyer", 5, &format!("{tag}-{i}"), "2024-05-01 10:00:00"))
            .collect(),
    )
}

fn cfg(max_reviews: usize, page_size: u32) -> CollectorConfig {
    CollectorConfig {
        max_reviews,
        page_size,
    }
}

#[tokio::test]
async fn overshooting_source_is_truncated_to_max_in_page_order() {
    let src = FixtureSource::new((1..=6).map(|p| page(20, &format!("p{p}"))).collect());

    let out = collect_reviews(&src, "123", &cfg(100, 20)).await;

    assert_eq!(out.len(), 100);
    assert_eq!(out.end, CollectionEnd::LimitReached);
    assert_eq!(out.reviews.first().map(|r| r.text.as_str()), Some("p1-0"));
    assert_eq!(out.reviews.last().map(|r| r.text.as_str()), Some("p5-19"));
    assert_eq!(src.calls(), 5, "page 6 must not be requested");
}

#[tokio::test]
async fn limit_inside_a_page_keeps_the_front() {
    let src = FixtureSource::new(vec![page(20, "p1"), page(20, "p2")]);

    let out = collect_reviews(&src, "123", &cfg(25, 20)).await;

    assert_eq!(out.len(), 25);
    assert_eq!(out.reviews[24].text, "p2-4");
}

#[tokio::test]
async fn empty_second_page_returns_first_page_only() {
    let src = FixtureSource::new(vec![page(7, "p1"), PageFetch::Success(Vec::new())]);

    let out = collect_reviews(&src, "123", &cfg(100, 20)).await;

    assert_eq!(out.len(), 7);
    assert_eq!(out.end, CollectionEnd::Exhausted { pages: 1 });
    assert_eq!(src.calls(), 2);
}

#[tokio::test]
async fn failure_on_first_page_yields_empty_collection() {
    let src = FixtureSource::new(vec![PageFetch::TransientError {
        status: Some(503),
        reason: "unavailable".into(),
    }]);

    let out = collect_reviews(&src, "123", &cfg(100, 20)).await;

    assert!(out.is_empty());
    match out.end {
        CollectionEnd::FetchFailed { page, status, .. } => {
            assert_eq!(page, 1);
            assert_eq!(status, Some(503));
        }
        other => panic!("expected FetchFailed, got {other:?}"),
    }
    assert_eq!(src.calls(), 1, "no retries");
}

#[tokio::test]
async fn failure_mid_way_keeps_partial_results() {
    let src = FixtureSource::new(vec![
        page(20, "p1"),
        page(20, "p2"),
        PageFetch::TransientError {
            status: None,
            reason: "connection reset".into(),
        },
    ]);

    let out = collect_reviews(&src, "123", &cfg(100, 20)).await;

    assert_eq!(out.len(), 40);
    assert!(out.end.is_failure());
}

#[tokio::test]
async fn empty_content_records_are_dropped() {
    let body = include_str!("fixtures/tiki_page1.json");
    let src = FixtureSource::from_json_pages(&[body]).expect("fixture parses");

    let out = collect_reviews(&src, "123", &cfg(100, 20)).await;

    assert_eq!(out.len(), 3, "5 records, 2 with empty content");
    assert!(out.reviews.iter().all(|r| !r.text.is_empty()));

    // defaults for missing author/date
    let third = &out.reviews[1];
    assert_eq!(third.author, ANONYMOUS);
    assert_eq!(third.rating, 1);
    let fourth = &out.reviews[2];
    assert_eq!(fourth.date, DATE_MISSING);
    assert_eq!(fourth.author, ANONYMOUS);
}
