//! In-memory review dataset.
//!
//! A dataset is a header plus rows of cells loaded from a delimited file.
//! Columns are referenced by name; derived columns are appended on first
//! write and replaced on later writes.

mod sample;
mod value;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub use sample::{SampleSize, MAX_SAMPLE_SIZE, MIN_SAMPLE_SIZE};
pub use value::Value;

/// Free-text review column.
pub const SUMMARY_COLUMN: &str = "SUMMARY";
/// Product category column.
pub const PRODUCT_COLUMN: &str = "PRODUCT";
/// Pre-computed score column shipped with some datasets.
pub const SENTIMENT_SCORE_COLUMN: &str = "SENTIMENT_SCORE";
/// Score column written by the sentiment scorer.
pub const SENTIMENT_COLUMN: &str = "SENTIMENT";
/// Normalized text column written by the text normalizer.
pub const CLEANED_SUMMARY_COLUMN: &str = "CLEANED_SUMMARY";

static MISSING: Value = Value::Missing;

/// Errors from loading or addressing a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Sample size must be between {} and {}, got {}", MIN_SAMPLE_SIZE, MAX_SAMPLE_SIZE, .0)]
    InvalidSampleSize(usize),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Column {column} has {actual} values but the dataset has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One customer review row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    cells: Vec<Value>,
}

impl Record {
    pub fn new(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.cells.get(index)
    }
}

/// Tabular collection of records with named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Dataset {
    /// Build a dataset from a header and rows of cells.
    pub fn from_rows<S: Into<String>>(
        columns: Vec<S>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, DatasetError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DatasetError::LengthMismatch {
                    column: format!("row {}", i),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            records.push(Record::new(row));
        }
        Ok(Self {
            columns,
            records,
            source: None,
        })
    }

    /// Load a comma-separated file.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        Self::load_with_delimiter(path, b',')
    }

    /// Load a delimited file with a header row.
    ///
    /// Empty cells load as `Value::Missing`, everything else as text.
    pub fn load_with_delimiter(path: &Path, delimiter: u8) -> Result<Self, DatasetError> {
        if !path.is_file() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                DatasetError::NotFound(path.to_path_buf())
            }
            _ => DatasetError::Io(e),
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(file);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let cells = row.iter().map(Value::from_field).collect();
            records.push(Record::new(cells));
        }

        info!(
            "Loaded {} records with {} columns from {}",
            records.len(),
            columns.len(),
            path.display()
        );

        Ok(Self {
            columns,
            records,
            source: Some(path.to_path_buf()),
        })
    }

    /// Path the dataset was loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize, DatasetError> {
        self.column_index(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    /// Cell at `row` in column `name`.
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.records.get(row).and_then(|r| r.get(idx))
    }

    /// All cells of a column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>, DatasetError> {
        let idx = self.require_column(name)?;
        Ok(self
            .records
            .iter()
            .map(|r| r.get(idx).unwrap_or(&MISSING))
            .collect())
    }

    /// A column as text; missing cells become `None`.
    pub fn column_text(&self, name: &str) -> Result<Vec<Option<String>>, DatasetError> {
        Ok(self
            .column(name)?
            .into_iter()
            .map(|v| (!v.is_missing()).then(|| v.to_string()))
            .collect())
    }

    /// A column coerced to numbers; unparseable cells become `None`.
    pub fn column_numbers(&self, name: &str) -> Result<Vec<Option<f64>>, DatasetError> {
        Ok(self.column(name)?.into_iter().map(Value::as_f64).collect())
    }

    /// Write a derived column, appending it if it does not exist yet.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), DatasetError> {
        if values.len() != self.records.len() {
            return Err(DatasetError::LengthMismatch {
                column: name.to_string(),
                expected: self.records.len(),
                actual: values.len(),
            });
        }

        match self.column_index(name) {
            Some(idx) => {
                for (record, value) in self.records.iter_mut().zip(values) {
                    record.cells[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (record, value) in self.records.iter_mut().zip(values) {
                    record.cells.push(value);
                }
            }
        }
        debug!("Wrote column {} ({} rows)", name, self.records.len());
        Ok(())
    }

    /// Distinct non-missing values of a column, in first-seen order.
    pub fn unique(&self, name: &str) -> Result<Vec<String>, DatasetError> {
        let mut seen = Vec::new();
        for value in self.column(name)? {
            if value.is_missing() {
                continue;
            }
            let label = value.to_string();
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        Ok(seen)
    }

    /// Rows whose `name` cell displays as `label`.
    pub fn filter_eq(&self, name: &str, label: &str) -> Result<Dataset, DatasetError> {
        let idx = self.require_column(name)?;
        let records = self
            .records
            .iter()
            .filter(|r| r.get(idx).is_some_and(|v| !v.is_missing() && v.to_string() == label))
            .cloned()
            .collect();
        Ok(self.with_records(records))
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        self.with_records(self.records.iter().take(n).cloned().collect())
    }

    fn with_records(&self, records: Vec<Record>) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            records,
            source: self.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reviews_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "PRODUCT,SUMMARY,SENTIMENT_SCORE").unwrap();
        writeln!(file, "Chair,\"Sturdy, comfy!\",0.8").unwrap();
        writeln!(file, "Lamp,Too dim,-0.4").unwrap();
        writeln!(file, "Chair,Wobbly legs,").unwrap();
        file
    }

    #[test]
    fn load_reads_header_and_cells() {
        let file = reviews_csv();
        let ds = Dataset::load(file.path()).unwrap();
        assert_eq!(ds.columns(), ["PRODUCT", "SUMMARY", "SENTIMENT_SCORE"]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.value(0, "SUMMARY"), Some(&Value::text("Sturdy, comfy!")));
        assert_eq!(ds.value(2, "SENTIMENT_SCORE"), Some(&Value::Missing));
        assert_eq!(ds.source_path(), Some(file.path()));
    }

    #[test]
    fn load_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer_reviews.csv");
        match Dataset::load(&path) {
            Err(DatasetError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn load_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Dataset::load(dir.path()),
            Err(DatasetError::NotFound(_))
        ));
    }

    #[test]
    fn load_ragged_rows_is_csv_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "PRODUCT,SUMMARY").unwrap();
        writeln!(file, "Chair,fine,extra").unwrap();
        assert!(matches!(
            Dataset::load(file.path()),
            Err(DatasetError::Csv(_))
        ));
    }

    #[test]
    fn load_with_semicolon_delimiter() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "PRODUCT;SUMMARY").unwrap();
        writeln!(file, "Desk;solid, heavy").unwrap();
        let ds = Dataset::load_with_delimiter(file.path(), b';').unwrap();
        assert_eq!(ds.value(0, "SUMMARY"), Some(&Value::text("solid, heavy")));
    }

    #[test]
    fn column_numbers_coerce_bad_cells_to_none() {
        let ds = Dataset::from_rows(
            vec!["SCORE"],
            vec![
                vec![Value::text("0.5")],
                vec![Value::text("n/a")],
                vec![Value::Missing],
                vec![Value::Number(-1.0)],
            ],
        )
        .unwrap();
        assert_eq!(
            ds.column_numbers("SCORE").unwrap(),
            vec![Some(0.5), None, None, Some(-1.0)]
        );
    }

    #[test]
    fn set_column_appends_then_replaces() {
        let file = reviews_csv();
        let mut ds = Dataset::load(file.path()).unwrap();
        ds.set_column("X", vec![Value::Number(1.0); 3]).unwrap();
        assert_eq!(ds.columns().last().map(String::as_str), Some("X"));
        ds.set_column("X", vec![Value::Number(2.0); 3]).unwrap();
        assert_eq!(ds.columns().len(), 4);
        assert_eq!(ds.value(1, "X"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn set_column_rejects_wrong_length() {
        let file = reviews_csv();
        let mut ds = Dataset::load(file.path()).unwrap();
        assert!(matches!(
            ds.set_column("X", vec![Value::Missing]),
            Err(DatasetError::LengthMismatch { expected: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn unique_keeps_first_seen_order() {
        let file = reviews_csv();
        let ds = Dataset::load(file.path()).unwrap();
        assert_eq!(ds.unique("PRODUCT").unwrap(), vec!["Chair", "Lamp"]);
        assert!(matches!(
            ds.unique("CATEGORY"),
            Err(DatasetError::MissingColumn(c)) if c == "CATEGORY"
        ));
    }

    #[test]
    fn filter_eq_and_head() {
        let file = reviews_csv();
        let ds = Dataset::load(file.path()).unwrap();
        let chairs = ds.filter_eq("PRODUCT", "Chair").unwrap();
        assert_eq!(chairs.len(), 2);
        assert_eq!(chairs.columns(), ds.columns());
        assert_eq!(ds.head(1).len(), 1);
        assert_eq!(ds.head(10).len(), 3);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Dataset::from_rows(vec!["A", "B"], vec![vec![Value::Missing]]).unwrap_err();
        assert!(matches!(err, DatasetError::LengthMismatch { .. }));
    }
}
