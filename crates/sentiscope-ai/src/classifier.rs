//! Threshold-based sentiment classification.
//!
//! Scores normalized text with an injected [`Polarity`] model, rounds the
//! score to 2 decimals, and maps it onto three labels with inclusive
//! thresholds:
//!
//! - `score >= positive` → Positive
//! - `score <= negative` → Negative
//! - otherwise → Neutral

use serde::Serialize;
use sentiscope_core::{ConfigError, SentimentLabel, round_to_hundredths};
use tracing::debug;

use crate::polarity::{Polarity, ScoringError};

pub const DEFAULT_POSITIVE_THRESHOLD: f64 = 0.3;
pub const DEFAULT_NEGATIVE_THRESHOLD: f64 = -0.3;

/// Label boundaries. Both are inclusive of their own label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    positive: f64,
    negative: f64,
}

impl Default for Thresholds {
    /// `positive = 0.3`, `negative = -0.3`.
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE_THRESHOLD,
            negative: DEFAULT_NEGATIVE_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Both values must lie in `[-1, 1]` with `negative < positive`.
    pub fn new(positive: f64, negative: f64) -> Result<Self, ConfigError> {
        if !(-1.0..=1.0).contains(&positive) || !(-1.0..=1.0).contains(&negative) {
            return Err(ConfigError::Thresholds(format!(
                "thresholds must lie in [-1, 1], got positive={positive} negative={negative}"
            )));
        }
        if negative >= positive {
            return Err(ConfigError::Thresholds(format!(
                "negative threshold {negative} must be below positive threshold {positive}"
            )));
        }
        Ok(Self { positive, negative })
    }

    pub fn positive(&self) -> f64 {
        self.positive
    }

    pub fn negative(&self) -> f64 {
        self.negative
    }

    /// Map a score onto a label. Total over every `f64`; NaN is Neutral.
    pub fn classify(&self, score: f64) -> SentimentLabel {
        if score >= self.positive {
            SentimentLabel::Positive
        } else if score <= self.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Classify with the default thresholds.
pub fn classify(score: f64) -> SentimentLabel {
    Thresholds::default().classify(score)
}

/// Classifier output for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sentiment {
    pub score: f64,
    pub label: SentimentLabel,
    /// Present when the model estimates subjectivity.
    pub subjectivity: Option<f64>,
}

/// Sentiment classifier over an injected polarity model.
pub struct Classifier {
    model: Box<dyn Polarity>,
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(model: impl Polarity + 'static) -> Self {
        Self::from_boxed(Box::new(model))
    }

    pub fn from_boxed(model: Box<dyn Polarity>) -> Self {
        Self {
            model,
            thresholds: Thresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Polarity of normalized text, clamped to `[-1, 1]` and rounded to 2 decimals.
    pub fn score(&self, text: &str) -> Result<f64, ScoringError> {
        let raw = self.model.polarity(text)?;
        if !raw.is_finite() {
            return Err(ScoringError::NonFinite(raw));
        }
        Ok(round_to_hundredths(raw.clamp(-1.0, 1.0)))
    }

    pub fn classify(&self, score: f64) -> SentimentLabel {
        self.thresholds.classify(score)
    }

    /// Score and label normalized text.
    pub fn analyze(&self, text: &str) -> Result<Sentiment, ScoringError> {
        let score = self.score(text)?;
        let label = self.classify(score);
        let subjectivity = self
            .model
            .subjectivity(text)
            .filter(|s| s.is_finite())
            .map(|s| round_to_hundredths(s.clamp(0.0, 1.0)));

        debug!(score, %label, "classified");
        Ok(Sentiment {
            score,
            label,
            subjectivity,
        })
    }
}
