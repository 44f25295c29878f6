//! Terminal rendering for analysis results.
//!
//! Label counts and percentages are drawn as horizontal bars; result rows
//! are rendered with Arrow's pretty printer.

use std::fmt::Write as _;

use arrow::record_batch::RecordBatch;
use sentiscope_ai::Sentiment;
use sentiscope_core::{SentimentLabel, SentimentSummary};

const BAR_WIDTH: usize = 40;
const MAX_TABLE_ROWS: usize = 50;
const MAX_CELL_CHARS: usize = 60;

// ── Public API ──

/// Print the result of analysing a single text.
pub fn print_sentiment(cleaned: &str, sentiment: &Sentiment) {
    print!("{}", format_sentiment(cleaned, sentiment));
}

/// Print label counts as a bar chart scaled to the largest count.
pub fn print_label_counts(summary: &SentimentSummary) {
    print!("{}", format_label_counts(summary));
}

/// Print label percentages, each with a bar scaled to 100%.
pub fn print_percentages(summary: &SentimentSummary) {
    print!("{}", format_percentages(summary));
}

/// Print result rows as a table, truncated to the first rows.
pub fn print_table(batch: &RecordBatch) -> anyhow::Result<()> {
    let shown = batch.num_rows().min(MAX_TABLE_ROWS);
    let preview = truncate_cells(&batch.slice(0, shown))?;
    println!("{}", arrow::util::pretty::pretty_format_batches(&[preview])?);
    if batch.num_rows() > shown {
        println!("... and {} more rows", batch.num_rows() - shown);
    }
    Ok(())
}

// ── Formatting ──

fn format_sentiment(cleaned: &str, sentiment: &Sentiment) -> String {
    let mut out = String::new();
    let cleaned = if cleaned.is_empty() { "(empty)" } else { cleaned };
    let _ = writeln!(out, "  {:<14} {}", "Cleaned text", cleaned);
    let _ = writeln!(out, "  {:<14} {:.2}", "Polarity", sentiment.score);
    if let Some(subjectivity) = sentiment.subjectivity {
        let _ = writeln!(out, "  {:<14} {:.2}", "Subjectivity", subjectivity);
    }
    let _ = writeln!(out, "  {:<14} {}", "Sentiment", sentiment.label);
    out
}

fn format_label_counts(summary: &SentimentSummary) -> String {
    let max = SentimentLabel::ALL
        .iter()
        .map(|&l| summary.count(l))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for label in SentimentLabel::ALL {
        let count = summary.count(label);
        let _ = writeln!(
            out,
            "  {:<9} {:>6}  {}",
            label.as_str(),
            count,
            bar(count as f64, max as f64)
        );
    }
    out
}

fn format_percentages(summary: &SentimentSummary) -> String {
    let mut out = String::new();
    for label in SentimentLabel::ALL {
        let Some(pct) = summary.percentage(label) else {
            continue;
        };
        let _ = writeln!(
            out,
            "  {:<9} {:>6.2}%  {}",
            label.as_str(),
            pct,
            bar(pct, 100.0)
        );
    }
    out
}

fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Shorten long text cells so the table stays readable.
fn truncate_cells(batch: &RecordBatch) -> anyhow::Result<RecordBatch> {
    use arrow::array::{Array, ArrayRef, StringArray};
    use std::sync::Arc;

    let columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| match col.as_any().downcast_ref::<StringArray>() {
            Some(arr) => Arc::new(
                arr.iter()
                    .map(|v| v.map(shorten))
                    .collect::<StringArray>(),
            ) as ArrayRef,
            None => col.clone(),
        })
        .collect();
    Ok(RecordBatch::try_new(batch.schema(), columns)?)
}

fn shorten(s: &str) -> String {
    if s.chars().count() > MAX_CELL_CHARS {
        let head: String = s.chars().take(MAX_CELL_CHARS - 3).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, StringArray};
    use sentiscope_core::{AnalysisRecord, analysis_batch};

    fn summary(labels: &[SentimentLabel]) -> SentimentSummary {
        SentimentSummary::from_labels(labels.iter().copied())
    }

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(bar(50.0, 100.0).chars().filter(|&c| c == '█').count(), 20);
        assert_eq!(bar(100.0, 100.0).chars().filter(|&c| c == '█').count(), BAR_WIDTH);
        assert_eq!(bar(0.0, 0.0).chars().filter(|&c| c == '░').count(), BAR_WIDTH);
    }

    #[test]
    fn label_counts_list_every_label() {
        use SentimentLabel::*;
        let out = format_label_counts(&summary(&[Positive, Positive, Negative]));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Positive") && lines[0].contains(" 2 "));
        assert!(lines[1].contains("Negative") && lines[1].contains(" 1 "));
        assert!(lines[2].contains("Neutral") && lines[2].contains(" 0 "));
        // Largest count gets the full bar.
        assert_eq!(lines[0].chars().filter(|&c| c == '█').count(), BAR_WIDTH);
    }

    #[test]
    fn percentages_are_two_decimals() {
        use SentimentLabel::*;
        let out = format_percentages(&summary(&[Positive, Negative, Neutral]));
        assert!(out.contains("33.33%"));
    }

    #[test]
    fn empty_summary_has_no_percentages() {
        assert!(format_percentages(&SentimentSummary::default()).is_empty());
    }

    #[test]
    fn sentiment_block() {
        let sentiment = Sentiment {
            score: 0.5,
            label: SentimentLabel::Positive,
            subjectivity: Some(0.6),
        };
        let out = format_sentiment("love product", &sentiment);
        assert!(out.contains("love product"));
        assert!(out.contains("0.50"));
        assert!(out.contains("0.60"));
        assert!(out.contains("Positive"));

        let without = Sentiment {
            subjectivity: None,
            ..sentiment
        };
        assert!(!format_sentiment("", &without).contains("Subjectivity"));
    }

    #[test]
    fn long_cells_are_shortened() {
        let record = AnalysisRecord {
            text: "x".repeat(200),
            cleaned_text: "x".into(),
            score: 0.0,
            label: SentimentLabel::Neutral,
        };
        let batch = analysis_batch([record.as_row()]).unwrap();
        let short = truncate_cells(&batch).unwrap();
        let text = short
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(text.value(0).chars().count(), MAX_CELL_CHARS);
        assert!(text.value(0).ends_with("..."));
    }
}
