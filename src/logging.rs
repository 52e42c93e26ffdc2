// src/logging.rs
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "review_sentiment_analyzer=info,collector=info,oracle=info,api=info,warn";

/// Install a `tracing` subscriber.
///
/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to JSON lines.
/// No-op when a global subscriber is already set (e.g. by the Shuttle runtime).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };

    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
