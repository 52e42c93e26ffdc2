// src/oracle/hosted.rs
//! Hosted inference oracle (Hugging Face style text-classification endpoint).

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::SentimentOracle;
use crate::config::OracleConfig;
use crate::review::{Classification, Probabilities, SentimentLabel};

pub struct HostedOracle {
    http: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct Req<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// The endpoint returns either one list per input or a flat list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Resp {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl Resp {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            Resp::Nested(v) => v.into_iter().next().unwrap_or_default(),
            Resp::Flat(v) => v,
        }
    }
}

impl HostedOracle {
    pub fn new(cfg: &OracleConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("review-sentiment-analyzer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .context("building hosted oracle http client")?;
        let url = format!(
            "{}/{}",
            cfg.endpoint.trim_end_matches('/'),
            cfg.model.trim_start_matches('/')
        );
        let api_token = cfg.api_token.clone().filter(|t| !t.trim().is_empty());
        Ok(Self {
            http,
            url,
            api_token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl SentimentOracle for HostedOracle {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let mut req = self.http.post(&self.url).json(&Req { inputs: text });
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.context("hosted oracle request")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "hosted oracle returned {status}: {}",
                body.chars().take(200).collect::<String>()
            );
        }

        let body: Resp = resp.json().await.context("decoding hosted oracle response")?;
        classification_from_scores(&body.into_scores())
    }

    fn name(&self) -> &'static str {
        "hosted"
    }
}

/// Map provider labels onto the fixed label set.
///
/// Accepts `NEG`/`POS`/`NEU` style names (any case, any suffix) and the
/// generic `LABEL_0..2` names, which follow the model's
/// `[Negative, Positive, Neutral]` ordering.
pub fn map_label(raw: &str) -> Option<SentimentLabel> {
    let l = raw.trim().to_ascii_lowercase();
    match l.as_str() {
        "label_0" => return Some(SentimentLabel::Negative),
        "label_1" => return Some(SentimentLabel::Positive),
        "label_2" => return Some(SentimentLabel::Neutral),
        _ => {}
    }
    if l.starts_with("neg") {
        Some(SentimentLabel::Negative)
    } else if l.starts_with("pos") {
        Some(SentimentLabel::Positive)
    } else if l.starts_with("neu") {
        Some(SentimentLabel::Neutral)
    } else {
        None
    }
}

/// Fold label/score pairs into a normalized classification.
pub fn classification_from_scores(scores: &[LabelScore]) -> Result<Classification> {
    if scores.is_empty() {
        return Err(anyhow!("hosted oracle returned no scores"));
    }
    let mut acc = [0f32; 3];
    for s in scores {
        let label = map_label(&s.label)
            .ok_or_else(|| anyhow!("unknown label from hosted oracle: {}", s.label))?;
        let idx = SentimentLabel::ORACLE_ORDER
            .iter()
            .position(|l| *l == label)
            .unwrap_or_default();
        acc[idx] += s.score;
    }
    Ok(Classification::from_probabilities(Probabilities::from_scores(acc)))
}
