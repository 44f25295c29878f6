//! Raw text → normalized text → (score, label), for single items and batches.

use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use rayon::prelude::*;
use sentiscope_core::{AnalysisRecord, AnalysisRow, Normalizer, SentimentSummary, analysis_batch};
use tracing::{debug, info, warn};

use crate::classifier::{Classifier, Sentiment};
use crate::polarity::ScoringError;

/// Normalizer and classifier wired together.
pub struct SentimentPipeline {
    normalizer: Normalizer,
    classifier: Classifier,
}

/// One analysed input. `outcome` is the scoring error when the model failed.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub text: String,
    pub cleaned_text: String,
    pub outcome: Result<Sentiment, ScoringError>,
}

impl BatchItem {
    pub fn record(&self) -> Option<AnalysisRecord> {
        let sentiment = self.outcome.as_ref().ok()?;
        Some(AnalysisRecord {
            text: self.text.clone(),
            cleaned_text: self.cleaned_text.clone(),
            score: sentiment.score,
            label: sentiment.label,
        })
    }

    pub fn as_row(&self) -> AnalysisRow<'_> {
        let sentiment = self.outcome.as_ref().ok();
        AnalysisRow {
            text: &self.text,
            cleaned_text: &self.cleaned_text,
            score: sentiment.map(|s| s.score),
            label: sentiment.map(|s| s.label),
        }
    }
}

/// Batch results in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchAnalysis {
    pub items: Vec<BatchItem>,
}

impl BatchAnalysis {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Successfully scored items, in input order.
    pub fn records(&self) -> impl Iterator<Item = AnalysisRecord> + '_ {
        self.items.iter().filter_map(BatchItem::record)
    }

    /// `(input index, error)` for every item that could not be scored.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &ScoringError)> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| item.outcome.as_ref().err().map(|e| (i, e)))
    }

    /// Label counts over the scored items.
    pub fn summary(&self) -> SentimentSummary {
        SentimentSummary::from_labels(
            self.items
                .iter()
                .filter_map(|item| item.outcome.as_ref().ok().map(|s| s.label)),
        )
    }

    /// Arrow batch in `analysis_schema` layout; failed items have null score and label.
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        analysis_batch(self.items.iter().map(BatchItem::as_row))
    }
}

impl SentimentPipeline {
    pub fn new(normalizer: Normalizer, classifier: Classifier) -> Self {
        Self {
            normalizer,
            classifier,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    /// Normalize, score and label one text.
    pub fn analyze_text(&self, raw: &str) -> Result<AnalysisRecord, ScoringError> {
        let cleaned_text = self.normalizer.normalize(raw);
        let sentiment = self.classifier.analyze(&cleaned_text)?;
        Ok(AnalysisRecord {
            text: raw.to_string(),
            cleaned_text,
            score: sentiment.score,
            label: sentiment.label,
        })
    }

    /// Analyse every text independently on the rayon pool.
    ///
    /// Output has one item per input, in input order. A scoring failure is
    /// recorded on its own item and does not affect the others.
    pub fn analyze_batch<S>(&self, texts: &[S]) -> BatchAnalysis
    where
        S: AsRef<str> + Sync,
    {
        info!(
            items = texts.len(),
            model = self.classifier.model_name(),
            "analysing batch"
        );

        let items: Vec<BatchItem> = texts
            .par_iter()
            .map(|raw| self.analyze_item(raw.as_ref()))
            .collect();
        let analysis = BatchAnalysis { items };

        let failed = analysis.failures().count();
        if failed > 0 {
            warn!(failed, total = analysis.len(), "some items could not be scored");
        }
        analysis
    }

    fn analyze_item(&self, raw: &str) -> BatchItem {
        let cleaned_text = self.normalizer.normalize(raw);
        let outcome = self.classifier.analyze(&cleaned_text);
        match &outcome {
            Ok(sentiment) => {
                debug!(cleaned = %cleaned_text, score = sentiment.score, "scored item")
            }
            Err(e) => warn!(error = %e, cleaned = %cleaned_text, "scoring failed"),
        }
        BatchItem {
            text: raw.to_string(),
            cleaned_text,
            outcome,
        }
    }
}
