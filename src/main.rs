//! Review Sentiment Service — Binary Entrypoint
//! Boots the Axum HTTP server with the configured oracle and review source.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    review_sentiment_analyzer::logging::init_tracing();

    let router = review_sentiment_analyzer::app().await?;

    Ok(router.into())
}
