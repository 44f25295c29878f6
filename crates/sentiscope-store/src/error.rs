use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("csv file not found: {0}")]
    FileNotFound(std::path::PathBuf),

    #[error("column '{column}' not found (available: {})", available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
