//! Tabular I/O: CSV files in and out as Arrow RecordBatches.

mod error;
pub use error::StoreError;

mod csv;
pub use csv::{CsvTable, UTF8_BOM, csv_bytes_with_bom, read_csv, read_csv_bytes, write_csv_with_bom};
