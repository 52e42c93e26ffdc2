use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::aggregate::{self, ReviewSummary};
use crate::charts::{self, ChartSet};
use crate::collector::types::{CollectionEnd, ReviewSource};
use crate::collector::{collect_reviews, CollectorConfig};
use crate::oracle::{self, DynOracle};
use crate::product::extract_product_id;
use crate::review::{ClassifiedReview, Probabilities, SentimentLabel};

/// Upper bound for a per-request `max_reviews` override.
pub const MAX_REVIEWS_CAP: usize = 1_000;

#[derive(Clone)]
pub struct AppState {
    pub oracle: DynOracle,
    pub source: Arc<dyn ReviewSource>,
    pub collector: CollectorConfig,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .route("/reviews/analyze", post(analyze_reviews))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// ---------- errors ----------

#[derive(Debug)]
pub enum ApiError {
    BadRequest(JsonRejection),
    EmptyText,
    EmptyUrl,
    BadProductUrl,
    Oracle(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(rejection) => {
                (rejection.status(), "bad_request", rejection.body_text())
            }
            ApiError::EmptyText => (
                StatusCode::BAD_REQUEST,
                "empty_text",
                "Please enter some text to analyze.".to_string(),
            ),
            ApiError::EmptyUrl => (
                StatusCode::BAD_REQUEST,
                "empty_url",
                "Please enter a valid Tiki product URL.".to_string(),
            ),
            ApiError::BadProductUrl => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "bad_product_url",
                "Could not extract Product ID from the provided URL. Please check the URL format."
                    .to_string(),
            ),
            ApiError::Oracle(e) => {
                tracing::warn!(target: "api", error = ?e, "oracle failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "oracle_unavailable",
                    format!("Sentiment classifier failed: {e}"),
                )
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection)
    }
}

// ---------- /analyze ----------

#[derive(Deserialize)]
struct AnalyzeReq {
    text: String,
}

#[derive(Serialize)]
struct ScoreLine {
    label: SentimentLabel,
    probability: f32,
    percent: String,
}

#[derive(Serialize)]
struct AnalyzeResp {
    label: SentimentLabel,
    probabilities: Probabilities,
    /// Confidence breakdown in the classifier's label order.
    scores: Vec<ScoreLine>,
    oracle: &'static str,
}

fn score_lines(p: &Probabilities) -> Vec<ScoreLine> {
    SentimentLabel::ORACLE_ORDER
        .iter()
        .map(|&label| {
            let probability = p.get(label);
            ScoreLine {
                label,
                probability,
                percent: format!("{:.2}%", probability * 100.0),
            }
        })
        .collect()
}

async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeReq>, JsonRejection>,
) -> Result<Json<AnalyzeResp>, ApiError> {
    let Json(body) = body?;
    if body.text.trim().is_empty() {
        return Err(ApiError::EmptyText);
    }
    let c = oracle::classify_text(state.oracle.as_ref(), &body.text)
        .await
        .map_err(ApiError::Oracle)?;
    Ok(Json(AnalyzeResp {
        label: c.label,
        probabilities: c.probabilities,
        scores: score_lines(&c.probabilities),
        oracle: state.oracle.name(),
    }))
}

// ---------- /reviews/analyze ----------

#[derive(Deserialize)]
struct ReviewsReq {
    url: String,
    #[serde(default)]
    max_reviews: Option<usize>,
}

#[derive(Serialize)]
struct ReviewsResp {
    product_id: String,
    fetched: usize,
    end: CollectionEnd,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    reviews: Vec<ClassifiedReview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ReviewSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    charts: Option<ChartSet>,
}

async fn analyze_reviews(
    State(state): State<AppState>,
    body: Result<Json<ReviewsReq>, JsonRejection>,
) -> Result<Json<ReviewsResp>, ApiError> {
    let Json(body) = body?;
    let url = body.url.trim();
    if url.is_empty() {
        return Err(ApiError::EmptyUrl);
    }
    let product_id = extract_product_id(url).ok_or(ApiError::BadProductUrl)?;

    let mut cfg = state.collector;
    if let Some(n) = body.max_reviews {
        cfg.max_reviews = n.min(MAX_REVIEWS_CAP);
    }

    let collection = collect_reviews(state.source.as_ref(), &product_id, &cfg).await;
    let fetched = collection.len();
    let end = collection.end;

    if collection.reviews.is_empty() {
        let message = if end.is_failure() {
            "Could not fetch reviews for this product."
        } else {
            "No reviews found for this product."
        };
        return Ok(Json(ReviewsResp {
            product_id,
            fetched,
            end,
            message: Some(message.to_string()),
            reviews: Vec::new(),
            summary: None,
            charts: None,
        }));
    }

    let classified = oracle::classify_reviews(state.oracle.as_ref(), collection.reviews)
        .await
        .map_err(ApiError::Oracle)?;
    let summary = aggregate::summarize(&classified);
    let chart_set = charts::build(&summary);

    let message = match &end {
        CollectionEnd::FetchFailed { page, .. } => Some(format!(
            "Fetched {fetched} reviews; fetching stopped early at page {page}."
        )),
        _ => None,
    };

    Ok(Json(ReviewsResp {
        product_id,
        fetched,
        end,
        message,
        reviews: classified,
        summary: Some(summary),
        charts: Some(chart_set),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_lines_follow_oracle_order_with_percent() {
        let p = Probabilities::from_scores([0.25, 0.5, 0.25]);
        let lines = score_lines(&p);
        let labels: Vec<SentimentLabel> = lines.iter().map(|l| l.label).collect();
        assert_eq!(labels, SentimentLabel::ORACLE_ORDER.to_vec());
        assert_eq!(lines[1].percent, "50.00%");
    }
}
