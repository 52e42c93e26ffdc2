// src/charts.rs
//! Chart specifications for the review dashboard. The page draws them;
//! this module only decides what goes on each axis.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::aggregate::{ReviewSummary, TermWeight};
use crate::review::SentimentLabel;

pub fn label_color(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "green",
        SentimentLabel::Neutral => "yellow",
        SentimentLabel::Negative => "red",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: SentimentLabel,
    pub count: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub label: SentimentLabel,
    pub color: String,
    /// Aligned with [`LineChart::x`].
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Sorted `YYYY-MM` months.
    pub x: Vec<String>,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloud {
    pub title: String,
    pub terms: Vec<TermWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    pub distribution: BarChart,
    pub timeline: LineChart,
    pub word_cloud: WordCloud,
}

pub fn build(summary: &ReviewSummary) -> ChartSet {
    ChartSet {
        distribution: distribution_chart(summary),
        timeline: timeline_chart(summary),
        word_cloud: WordCloud {
            title: "Word Cloud (After Removing Common Words)".to_string(),
            terms: summary.tokens.terms.clone(),
        },
    }
}

fn distribution_chart(summary: &ReviewSummary) -> BarChart {
    let bars = SentimentLabel::DISPLAY_ORDER
        .iter()
        .map(|&label| Bar {
            label,
            count: summary.counts.get(label),
            color: label_color(label).to_string(),
        })
        .collect();
    BarChart {
        title: "Sentiment Distribution of Reviews".to_string(),
        x_title: "Sentiment".to_string(),
        y_title: "Number of Reviews".to_string(),
        bars,
    }
}

fn timeline_chart(summary: &ReviewSummary) -> LineChart {
    let months: Vec<String> = summary
        .monthly
        .iter()
        .map(|m| m.month.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index: HashMap<&str, usize> = months
        .iter()
        .enumerate()
        .map(|(i, m)| (m.as_str(), i))
        .collect();

    let series = SentimentLabel::DISPLAY_ORDER
        .iter()
        .map(|&label| {
            let mut counts = vec![0usize; months.len()];
            for m in summary.monthly.iter().filter(|m| m.sentiment == label) {
                if let Some(&i) = index.get(m.month.as_str()) {
                    counts[i] = m.count;
                }
            }
            LineSeries {
                label,
                color: label_color(label).to_string(),
                counts,
            }
        })
        .collect();

    LineChart {
        title: "Sentiment Over Time (Monthly Breakdown)".to_string(),
        x_title: "Month".to_string(),
        y_title: "Number of Reviews".to_string(),
        x: months,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{MonthlyCount, SentimentCounts, TokenCloud};

    #[test]
    fn timeline_zero_fills_missing_months() {
        let summary = ReviewSummary {
            total: 3,
            counts: SentimentCounts {
                positive: 2,
                neutral: 0,
                negative: 1,
            },
            monthly: vec![
                MonthlyCount {
                    month: "2024-01".into(),
                    sentiment: SentimentLabel::Positive,
                    count: 2,
                },
                MonthlyCount {
                    month: "2024-03".into(),
                    sentiment: SentimentLabel::Negative,
                    count: 1,
                },
            ],
            tokens: TokenCloud::default(),
        };
        let charts = build(&summary);
        assert_eq!(charts.timeline.x, vec!["2024-01", "2024-03"]);
        let pos = &charts.timeline.series[0];
        assert_eq!(pos.label, SentimentLabel::Positive);
        assert_eq!(pos.counts, vec![2, 0]);
        let neg = &charts.timeline.series[2];
        assert_eq!(neg.counts, vec![0, 1]);

        let bars: Vec<usize> = charts.distribution.bars.iter().map(|b| b.count).collect();
        assert_eq!(bars, vec![2, 0, 1]);
        assert_eq!(charts.distribution.bars[2].color, "red");
    }
}
