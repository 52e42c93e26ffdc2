// src/config/app.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

use crate::collector::providers::tiki::{DEFAULT_TIKI_REVIEWS_URL, DEFAULT_USER_AGENT};
use crate::collector::{CollectorConfig, DEFAULT_MAX_REVIEWS, DEFAULT_PAGE_SIZE};

pub const DEFAULT_APP_CONFIG_PATH: &str = "config/app.toml";
pub const ENV_APP_CONFIG_PATH: &str = "REVIEWS_CONFIG_PATH";

pub const DEFAULT_ORACLE_ENDPOINT: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_ORACLE_MODEL: &str = "5CD-AI/Vietnamese-Sentiment-visobert";

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OracleProvider {
    /// Remote text-classification endpoint.
    Hosted,
    /// Embedded word lexicon, offline.
    Lexicon,
}

impl OracleProvider {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hosted" | "huggingface" | "hf" => Some(Self::Hosted),
            "lexicon" | "local" | "offline" => Some(Self::Lexicon),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub provider: OracleProvider,
    pub endpoint: String,
    pub model: String,
    /// Bearer token; `"ENV"` means read `HF_API_TOKEN`.
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: OracleProvider::Lexicon,
            endpoint: DEFAULT_ORACLE_ENDPOINT.to_string(),
            model: DEFAULT_ORACLE_MODEL.to_string(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewsConfig {
    pub base_url: String,
    pub user_agent: String,
    pub max_reviews: usize,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TIKI_REVIEWS_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_reviews: DEFAULT_MAX_REVIEWS,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ReviewsConfig {
    pub fn collector(&self) -> CollectorConfig {
        CollectorConfig {
            max_reviews: self.max_reviews,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reviews: ReviewsConfig,
    pub oracle: OracleConfig,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(s).context("parsing app config toml")?;
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading app config from {}", path.display()))?;
        Self::from_toml_str(&data)
    }

    /// Load using env var + fallbacks:
    /// 1) $REVIEWS_CONFIG_PATH
    /// 2) config/app.toml
    /// 3) built-in defaults
    ///
    /// Environment overrides are applied last, then values are sanitized.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(ENV_APP_CONFIG_PATH) {
            Ok(p) => Self::load_from_file(p)?,
            Err(_) if Path::new(DEFAULT_APP_CONFIG_PATH).exists() => {
                Self::load_from_file(DEFAULT_APP_CONFIG_PATH)?
            }
            Err(_) => {
                tracing::info!("no app config file found, using defaults");
                Self::default()
            }
        };
        cfg.apply_overrides(|k| env::var(k).ok());
        cfg.sanitize();
        Ok(cfg)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |k: &str| get(k).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(v) = get("REVIEWS_BASE_URL") {
            self.reviews.base_url = v;
        }
        if let Some(v) = get("REVIEWS_USER_AGENT") {
            self.reviews.user_agent = v;
        }
        if let Some(v) = parsed("REVIEWS_MAX") {
            self.reviews.max_reviews = v as usize;
        }
        if let Some(v) = parsed("REVIEWS_PAGE_SIZE") {
            self.reviews.page_size = u32::try_from(v).unwrap_or(u32::MAX);
        }
        if let Some(v) = parsed("HTTP_TIMEOUT_SECS") {
            self.reviews.timeout_secs = v;
            self.oracle.timeout_secs = v;
        }
        if let Some(p) = get("ORACLE_PROVIDER").as_deref().and_then(OracleProvider::parse) {
            self.oracle.provider = p;
        }
        if let Some(v) = get("ORACLE_ENDPOINT") {
            self.oracle.endpoint = v;
        }
        if let Some(v) = get("ORACLE_MODEL") {
            self.oracle.model = v;
        }

        // "ENV" placeholder or an explicit env token
        let wants_env = self
            .oracle
            .api_token
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("env"));
        match get("HF_API_TOKEN") {
            Some(t) => self.oracle.api_token = Some(t),
            None if wants_env => self.oracle.api_token = None,
            None => {}
        }
    }

    pub fn sanitize(&mut self) {
        if self.reviews.page_size == 0 {
            self.reviews.page_size = DEFAULT_PAGE_SIZE;
        }
        self.reviews.timeout_secs = self.reviews.timeout_secs.max(1);
        self.oracle.timeout_secs = self.oracle.timeout_secs.max(1);
        if self.reviews.user_agent.trim().is_empty() {
            self.reviews.user_agent = DEFAULT_USER_AGENT.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = AppConfig::from_toml_str("").expect("parse");
        assert_eq!(cfg.reviews.max_reviews, 100);
        assert_eq!(cfg.reviews.page_size, 20);
        assert_eq!(cfg.reviews.base_url, DEFAULT_TIKI_REVIEWS_URL);
        assert_eq!(cfg.oracle.provider, OracleProvider::Lexicon);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [reviews]
            max_reviews = 40

            [oracle]
            provider = "hosted"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.reviews.max_reviews, 40);
        assert_eq!(cfg.reviews.page_size, 20);
        assert_eq!(cfg.oracle.provider, OracleProvider::Hosted);
        assert_eq!(cfg.oracle.model, DEFAULT_ORACLE_MODEL);
    }

    #[test]
    fn overrides_and_sanitize() {
        let env: HashMap<&str, &str> = [
            ("REVIEWS_MAX", "7"),
            ("REVIEWS_PAGE_SIZE", "0"),
            ("ORACLE_PROVIDER", "HF"),
            ("HF_API_TOKEN", "secret"),
        ]
        .into_iter()
        .collect();
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        cfg.sanitize();
        assert_eq!(cfg.reviews.max_reviews, 7);
        assert_eq!(cfg.reviews.page_size, 20);
        assert_eq!(cfg.oracle.provider, OracleProvider::Hosted);
        assert_eq!(cfg.oracle.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn env_placeholder_without_token_clears() {
        let mut cfg = AppConfig::default();
        cfg.oracle.api_token = Some("ENV".into());
        cfg.apply_overrides(|_| None);
        assert_eq!(cfg.oracle.api_token, None);
    }
}
