//! Untyped tab-delimited tables, as handed over by the ingestion step.

use crate::error::{CoexprError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A table of string cells with a header row.
///
/// This is the shape the upstream aggregation step produces: one row per
/// sample, gene columns and metadata columns mixed together. Nothing is
/// interpreted yet; see [`crate::schema::split_schema`] for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a raw table, checking that every row matches the header width.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for row in &rows {
            if row.len() != header.len() {
                return Err(CoexprError::DimensionMismatch {
                    expected: header.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { header, rows })
    }

    /// Load a raw table from a TSV file.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a raw table from any tab-delimited reader.
    ///
    /// Rows with a different number of fields than the header are rejected
    /// by the CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let header: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if header.is_empty() || header.iter().all(|h| h.is_empty()) {
            return Err(CoexprError::EmptyData("Table has no header".to_string()));
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Self::new(header, rows)
    }

    /// Column names in file order.
    #[inline]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// All data rows.
    #[inline]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.header.len()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Iterate over the cells of one column.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[idx].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader() {
        let tsv = "PatientID\tSampleType\tA\nP1\t01\t1.5\nP2\t11\t2.0\n";
        let table = RawTable::from_reader(tsv.as_bytes()).unwrap();

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.column_index("A"), Some(2));
        let col: Vec<&str> = table.column(1).collect();
        assert_eq!(col, vec!["01", "11"]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let tsv = "PatientID\tA\nP1\t1.0\t2.0\n";
        assert!(RawTable::from_reader(tsv.as_bytes()).is_err());

        let header = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec!["1".to_string()]];
        assert!(matches!(
            RawTable::new(header, rows),
            Err(CoexprError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }
}
