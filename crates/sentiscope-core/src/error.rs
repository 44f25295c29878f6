use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable configuration: stopword lists, lexicons, thresholds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid lexicon {}: {source}", path.display())]
    Lexicon {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid thresholds: {0}")]
    Thresholds(String),
}
