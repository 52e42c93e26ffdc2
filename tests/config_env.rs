// tests/config_env.rs
//
// AppConfig::load() file discovery + environment overrides.
// Serialized because the tests mutate process environment variables.

use std::io::Write;

use serial_test::serial;

use review_sentiment_analyzer::config::{AppConfig, OracleProvider};

const VARS: &[&str] = &[
    "REVIEWS_CONFIG_PATH",
    "REVIEWS_MAX",
    "REVIEWS_PAGE_SIZE",
    "REVIEWS_BASE_URL",
    "ORACLE_PROVIDER",
    "HF_API_TOKEN",
    "HTTP_TIMEOUT_SECS",
];

fn clear_env() {
    for v in VARS {
        std::env::remove_var(v);
    }
}

fn temp_config(contents: &str, name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("review_cfg_{}_{name}.toml", std::process::id()));
    let mut f = std::fs::File::create(&path).expect("create temp config");
    f.write_all(contents.as_bytes()).expect("write temp config");
    path
}

#[test]
#[serial]
fn loads_file_from_env_path() {
    clear_env();
    let path = temp_config(
        r#"
        [reviews]
        max_reviews = 30
        page_size = 10

        [oracle]
        provider = "hosted"
        api_token = "ENV"
        "#,
        "file",
    );
    std::env::set_var("REVIEWS_CONFIG_PATH", &path);
    std::env::set_var("HF_API_TOKEN", "tok");

    let cfg = AppConfig::load().expect("load");
    assert_eq!(cfg.reviews.max_reviews, 30);
    assert_eq!(cfg.reviews.page_size, 10);
    assert_eq!(cfg.oracle.provider, OracleProvider::Hosted);
    assert_eq!(cfg.oracle.api_token.as_deref(), Some("tok"));

    clear_env();
    let _ = std::fs::remove_file(path);
}

#[test]
#[serial]
fn env_overrides_win_over_file() {
    clear_env();
    let path = temp_config("[reviews]\nmax_reviews = 30\n", "override");
    std::env::set_var("REVIEWS_CONFIG_PATH", &path);
    std::env::set_var("REVIEWS_MAX", "5");
    std::env::set_var("REVIEWS_BASE_URL", "http://localhost:1/reviews");
    std::env::set_var("ORACLE_PROVIDER", "lexicon");
    std::env::set_var("HTTP_TIMEOUT_SECS", "0");

    let cfg = AppConfig::load().expect("load");
    assert_eq!(cfg.reviews.max_reviews, 5);
    assert_eq!(cfg.reviews.base_url, "http://localhost:1/reviews");
    assert_eq!(cfg.oracle.provider, OracleProvider::Lexicon);
    // sanitized to at least one second
    assert_eq!(cfg.reviews.timeout_secs, 1);
    assert_eq!(cfg.oracle.timeout_secs, 1);

    clear_env();
    let _ = std::fs::remove_file(path);
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    clear_env();
    std::env::set_var("REVIEWS_CONFIG_PATH", "/definitely/not/here.toml");

    assert!(AppConfig::load().is_err());

    clear_env();
}
