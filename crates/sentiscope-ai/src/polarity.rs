//! The polarity capability injected into the classifier.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("scoring unavailable: {0}")]
    Unavailable(String),

    #[error("polarity model returned a non-finite score ({0})")]
    NonFinite(f64),
}

/// A sentiment model mapping text to a polarity in `[-1, 1]`.
///
/// Implementations receive already-normalized text and must be callable from
/// several worker threads at once.
pub trait Polarity: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64, ScoringError>;

    /// Subjectivity in `[0, 1]`, for models that estimate it.
    fn subjectivity(&self, _text: &str) -> Option<f64> {
        None
    }

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}
