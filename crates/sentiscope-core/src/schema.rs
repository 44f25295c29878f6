//! Arrow schema for exported analysis results.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::{AnalysisRecord, SentimentLabel};

pub const TEXT_COLUMN: &str = "text";
pub const CLEANED_TEXT_COLUMN: &str = "cleaned_text";
pub const SCORE_COLUMN: &str = "score";
pub const LABEL_COLUMN: &str = "label";

/// Schema for analysed items, one row per input in input order.
///
/// `score` and `label` are null for items whose scoring failed.
pub fn analysis_schema() -> Schema {
    Schema::new(vec![
        Field::new(TEXT_COLUMN, DataType::Utf8, false),
        Field::new(CLEANED_TEXT_COLUMN, DataType::Utf8, false),
        Field::new(SCORE_COLUMN, DataType::Float64, true),
        Field::new(LABEL_COLUMN, DataType::Utf8, true),
    ])
}

/// Borrowed view of one output row.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRow<'a> {
    pub text: &'a str,
    pub cleaned_text: &'a str,
    pub score: Option<f64>,
    pub label: Option<SentimentLabel>,
}

impl AnalysisRecord {
    pub fn as_row(&self) -> AnalysisRow<'_> {
        AnalysisRow {
            text: &self.text,
            cleaned_text: &self.cleaned_text,
            score: Some(self.score),
            label: Some(self.label),
        }
    }
}

/// Build a [`RecordBatch`] in [`analysis_schema`] layout.
pub fn analysis_batch<'a, I>(rows: I) -> Result<RecordBatch, ArrowError>
where
    I: IntoIterator<Item = AnalysisRow<'a>>,
{
    let mut text = StringBuilder::new();
    let mut cleaned = StringBuilder::new();
    let mut score = Float64Builder::new();
    let mut label = StringBuilder::new();

    for row in rows {
        text.append_value(row.text);
        cleaned.append_value(row.cleaned_text);
        score.append_option(row.score);
        label.append_option(row.label.map(|l| l.as_str()));
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(text.finish()),
        Arc::new(cleaned.finish()),
        Arc::new(score.finish()),
        Arc::new(label.finish()),
    ];
    RecordBatch::try_new(Arc::new(analysis_schema()), columns)
}
