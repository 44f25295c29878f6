//! CSV import and export.
//!
//! Import reads every column as `Utf8` so values reach the normalizer exactly
//! as they appear in the file, whatever their apparent type. Export prefixes
//! the UTF-8 byte-order mark so spreadsheet applications detect the encoding.

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, LargeStringArray, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use tracing::info;

use crate::StoreError;

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A CSV file loaded into memory with all columns typed `Utf8`.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl CsvTable {
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    /// No header and no rows.
    pub fn is_empty(&self) -> bool {
        self.schema.fields().is_empty() || self.num_rows() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.fields().iter().map(|f| f.name().clone()).collect()
    }

    /// Values of one column as text, in row order. Empty cells become `""`.
    pub fn text_column(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let idx = self
            .schema
            .index_of(name)
            .map_err(|_| StoreError::ColumnNotFound {
                column: name.to_string(),
                available: self.column_names(),
            })?;

        let mut out = Vec::with_capacity(self.num_rows());
        for batch in &self.batches {
            let col = batch.column(idx);
            for row in 0..batch.num_rows() {
                out.push(get_string(col.as_ref(), row).unwrap_or_default());
            }
        }
        Ok(out)
    }
}

/// Read a CSV file with a header row. A leading BOM is ignored.
pub fn read_csv(path: &Path) -> Result<CsvTable, StoreError> {
    if !path.exists() {
        return Err(StoreError::FileNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    let table = read_csv_bytes(&bytes)?;
    info!(
        path = %path.display(),
        rows = table.num_rows(),
        columns = table.schema.fields().len(),
        "read csv"
    );
    Ok(table)
}

/// Read CSV content from memory. See [`read_csv`].
pub fn read_csv_bytes(bytes: &[u8]) -> Result<CsvTable, StoreError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    // Header names only; every column is then read as text.
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(bytes), Some(0))?;
    let schema: SchemaRef = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    if schema.fields().is_empty() {
        return Ok(CsvTable {
            schema,
            batches: vec![],
        });
    }

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_truncated_rows(true)
        .build(Cursor::new(bytes))?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(CsvTable { schema, batches })
}

/// Serialize a batch to CSV bytes: BOM, header row, then data rows.
pub fn csv_bytes_with_bom(batch: &RecordBatch) -> Result<Vec<u8>, StoreError> {
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut writer = WriterBuilder::new().with_header(true).build(&mut buf);
        writer.write(batch)?;
    }
    Ok(buf)
}

/// Write a batch to `path` as BOM-prefixed CSV, replacing any existing file.
pub fn write_csv_with_bom(path: &Path, batch: &RecordBatch) -> Result<(), StoreError> {
    let bytes = csv_bytes_with_bom(batch)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    file.flush()?;
    info!(path = %path.display(), rows = batch.num_rows(), "wrote csv");
    Ok(())
}

/// Extract a string value from an Arrow array (handles Utf8 and LargeUtf8).
fn get_string(col: &dyn Array, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    col.as_any()
        .downcast_ref::<StringArray>()
        .map(|arr| arr.value(row).to_string())
        .or_else(|| {
            col.as_any()
                .downcast_ref::<LargeStringArray>()
                .map(|arr| arr.value(row).to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiscope_core::{AnalysisRecord, SentimentLabel, analysis_batch};

    const REVIEWS: &str = "id,review,stars\n1,Great phone!,5\n2,\"Bad, really bad\",1\n3,,3\n";

    #[test]
    fn reads_header_and_rows() {
        let table = read_csv_bytes(REVIEWS.as_bytes()).unwrap();
        assert_eq!(table.column_names(), vec!["id", "review", "stars"]);
        assert_eq!(table.num_rows(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn all_columns_are_text() {
        let table = read_csv_bytes(REVIEWS.as_bytes()).unwrap();
        for field in table.schema.fields() {
            assert_eq!(field.data_type(), &DataType::Utf8);
        }
        assert_eq!(table.text_column("stars").unwrap(), vec!["5", "1", "3"]);
    }

    #[test]
    fn quoted_fields_and_empty_cells() {
        let table = read_csv_bytes(REVIEWS.as_bytes()).unwrap();
        assert_eq!(
            table.text_column("review").unwrap(),
            vec!["Great phone!", "Bad, really bad", ""]
        );
    }

    #[test]
    fn unknown_column() {
        let table = read_csv_bytes(REVIEWS.as_bytes()).unwrap();
        let err = table.text_column("comment").unwrap_err();
        match err {
            StoreError::ColumnNotFound { column, available } => {
                assert_eq!(column, "comment");
                assert_eq!(available.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn leading_bom_is_ignored() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"text\nhello\n");
        let table = read_csv_bytes(&bytes).unwrap();
        assert_eq!(table.column_names(), vec!["text"]);
        assert_eq!(table.text_column("text").unwrap(), vec!["hello"]);
    }

    #[test]
    fn header_only_is_empty() {
        let table = read_csv_bytes(b"text,score\n").unwrap();
        assert_eq!(table.column_names(), vec!["text", "score"]);
        assert!(table.is_empty());
        assert!(table.text_column("text").unwrap().is_empty());
    }

    #[test]
    fn empty_input_is_empty() {
        let table = read_csv_bytes(b"").unwrap();
        assert!(table.is_empty());
        assert!(table.column_names().is_empty());
    }

    #[test]
    fn short_rows_are_padded() {
        let table = read_csv_bytes(b"a,b\n1\n2,3\n").unwrap();
        assert_eq!(table.text_column("b").unwrap(), vec!["", "3"]);
    }

    #[test]
    fn missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = read_csv(&tmp.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, StoreError::FileNotFound(_)));
    }

    fn sample_batch() -> RecordBatch {
        let record = AnalysisRecord {
            text: "Great phone!".into(),
            cleaned_text: "great phone".into(),
            score: 0.8,
            label: SentimentLabel::Positive,
        };
        analysis_batch([record.as_row()]).unwrap()
    }

    #[test]
    fn export_starts_with_bom_and_header() {
        let bytes = csv_bytes_with_bom(&sample_batch()).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("text,cleaned_text,score,label"));
        assert_eq!(lines.next(), Some("Great phone!,great phone,0.8,Positive"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn export_then_import_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("analyzed_data.csv");

        write_csv_with_bom(&path, &sample_batch()).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(UTF8_BOM));

        let table = read_csv(&path).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["text", "cleaned_text", "score", "label"]
        );
        assert_eq!(table.text_column("label").unwrap(), vec!["Positive"]);
        assert_eq!(table.text_column("score").unwrap(), vec!["0.8"]);
    }
}
