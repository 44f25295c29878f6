//! Sentiment labels, per-item analysis records, and batch summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-way sentiment classification derived from a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Display order used by summaries and charts.
    pub const ALL: [SentimentLabel; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of analysing one input item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Text as supplied by the caller.
    pub text: String,
    /// Output of the normalizer.
    pub cleaned_text: String,
    /// Polarity in `[-1, 1]`, rounded to 2 decimals.
    pub score: f64,
    pub label: SentimentLabel,
}

/// Label counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentSummary {
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = SentimentLabel>,
    {
        let mut summary = Self::default();
        for label in labels {
            summary.total += 1;
            match label {
                SentimentLabel::Positive => summary.positive += 1,
                SentimentLabel::Negative => summary.negative += 1,
                SentimentLabel::Neutral => summary.neutral += 1,
            }
        }
        summary
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    /// Share of `label` in percent, rounded to 2 decimals.
    ///
    /// `None` for an empty batch.
    pub fn percentage(&self, label: SentimentLabel) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(round_to_hundredths(
            self.count(label) as f64 / self.total as f64 * 100.0,
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Round to 2 decimal places.
///
/// Rounds the exact binary value, so `0.295` (stored as `0.29499...`) gives
/// `0.29`. Exact ties go to the even digit: `0.125` gives `0.12`.
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}
