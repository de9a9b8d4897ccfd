//! Sentiment labels and aggregate percentages for the dashboard summary.

use crate::model::news_item::NewsItem;
use serde::{Deserialize, Serialize};

/// Sentiment label assigned by the remote scoring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Raw per-label counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTotals {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl SentimentTotals {
    /// Counts labelled items; unlabelled items are skipped.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a NewsItem>) -> Self {
        let mut totals = Self::default();
        for item in items {
            match item.sentiment {
                Some(Sentiment::Positive) => totals.positive += 1,
                Some(Sentiment::Negative) => totals.negative += 1,
                Some(Sentiment::Neutral) => totals.neutral += 1,
                None => {}
            }
        }
        totals
    }

    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }

    /// Percentages rounded to one decimal place. All zero when empty.
    pub fn breakdown(&self) -> SentimentBreakdown {
        let total = self.total();
        SentimentBreakdown {
            total,
            positive_pct: percentage(self.positive, total),
            negative_pct: percentage(self.negative, total),
            neutral_pct: percentage(self.neutral, total),
        }
    }
}

/// Share of each label in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentBreakdown {
    pub total: u64,
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}
