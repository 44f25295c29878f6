//! Core types for Sentiscope: text normalization, sentiment labels, and Arrow schemas.

mod error;
pub mod normalize;
pub mod record;
pub mod schema;

pub use error::ConfigError;
pub use normalize::{DEFAULT_STOPWORDS, Normalizer, NormalizerConfig, normalize};
pub use record::{AnalysisRecord, SentimentLabel, SentimentSummary, round_to_hundredths};
pub use schema::{AnalysisRow, analysis_batch, analysis_schema};
