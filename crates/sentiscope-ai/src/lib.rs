//! Sentiment scoring layer: polarity models, threshold classification, and batch analysis.

pub mod classifier;
pub mod lexicon;
#[cfg(feature = "onnx")]
mod model;
pub mod pipeline;
mod polarity;

pub use classifier::{Classifier, Sentiment, Thresholds, classify};
pub use lexicon::{LexiconPolarity, WordSentiment};
#[cfg(feature = "onnx")]
pub use model::OnnxPolarity;
pub use pipeline::{BatchAnalysis, BatchItem, SentimentPipeline};
pub use polarity::{Polarity, ScoringError};
