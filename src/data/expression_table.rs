//! Dense expression table: samples × genes plus sample metadata.

use crate::data::metadata::{SampleMetadata, PATIENT_ID, SAMPLE_TYPE, TUMOR_STAGE};
use crate::data::RawTable;
use crate::error::{CoexprError, Result};
use nalgebra::DMatrix;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Gene expression values for a set of samples.
///
/// Rows are samples, columns are genes in a fixed, explicit order. Gene names
/// are unique and every column has one value per sample. Tables are never
/// mutated in place; every transform returns a new table.
#[derive(Debug, Clone)]
pub struct ExpressionTable {
    /// Dense matrix (samples × genes).
    data: DMatrix<f64>,
    /// Gene names (column names) in table order.
    gene_names: Vec<String>,
    /// Metadata, one entry per row.
    metadata: SampleMetadata,
}

impl ExpressionTable {
    /// Create a new table from a matrix, gene names and metadata.
    pub fn new(data: DMatrix<f64>, gene_names: Vec<String>, metadata: SampleMetadata) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if ncols != gene_names.len() {
            return Err(CoexprError::DimensionMismatch {
                expected: ncols,
                actual: gene_names.len(),
            });
        }
        if nrows != metadata.len() {
            return Err(CoexprError::DimensionMismatch {
                expected: nrows,
                actual: metadata.len(),
            });
        }
        let mut seen = HashSet::new();
        for name in &gene_names {
            if !seen.insert(name.as_str()) {
                return Err(CoexprError::Schema(format!("Duplicate gene column '{}'", name)));
            }
        }
        Ok(Self {
            data,
            gene_names,
            metadata,
        })
    }

    /// Build a table from per-gene columns.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>, metadata: SampleMetadata) -> Result<Self> {
        let nrows = metadata.len();
        for (name, values) in &columns {
            if values.len() != nrows {
                return Err(CoexprError::Schema(format!(
                    "Column '{}' has {} values, expected {}",
                    name,
                    values.len(),
                    nrows
                )));
            }
        }
        let data = DMatrix::from_fn(nrows, columns.len(), |i, j| columns[j].1[i]);
        let gene_names = columns.into_iter().map(|(name, _)| name).collect();
        Self::new(data, gene_names, metadata)
    }

    /// Load and validate a table from a TSV file.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = RawTable::from_tsv(path)?;
        crate::schema::split_schema(&raw)
    }

    /// Write the table as TSV: metadata columns first, then genes.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        write!(writer, "{}\t{}\t{}", PATIENT_ID, TUMOR_STAGE, SAMPLE_TYPE)?;
        for name in &self.gene_names {
            write!(writer, "\t{}", name)?;
        }
        writeln!(writer)?;

        for row in 0..self.n_samples() {
            write!(
                writer,
                "{}\t{}\t{}",
                self.metadata.patient_ids()[row],
                self.metadata.tumor_stages()[row],
                self.metadata.sample_types()[row]
            )?;
            for col in 0..self.n_genes() {
                write!(writer, "\t{}", self.data[(row, col)])?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write the table to a TSV file, replacing it atomically.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::report::write_atomic(path, |w| self.write_tsv(w))
    }

    /// Number of samples (rows).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Number of genes (columns).
    #[inline]
    pub fn n_genes(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn gene_names(&self) -> &[String] {
        &self.gene_names
    }

    #[inline]
    pub fn metadata(&self) -> &SampleMetadata {
        &self.metadata
    }

    /// Get reference to the underlying matrix.
    #[inline]
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Value at (sample, gene).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    /// Position of a gene column.
    pub fn gene_index(&self, name: &str) -> Option<usize> {
        self.gene_names.iter().position(|g| g == name)
    }

    /// Values of one gene column.
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.data.column(col).iter().copied().collect()
    }

    /// Values of a gene column looked up by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<f64>> {
        self.gene_index(name).map(|j| self.column(j))
    }

    /// Resolve the target gene to a column index.
    ///
    /// `None` or an empty name selects the first gene column in table order.
    pub fn resolve_target(&self, target: Option<&str>) -> Result<usize> {
        match target.map(str::trim).filter(|t| !t.is_empty()) {
            Some(name) => self
                .gene_index(name)
                .ok_or_else(|| CoexprError::TargetGeneNotFound(name.to_string())),
            None if self.n_genes() > 0 => Ok(0),
            None => Err(CoexprError::EmptyData(
                "Table has no gene columns to select a target from".to_string(),
            )),
        }
    }

    /// Keep only the given rows, in the given order.
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_samples()) {
            return Err(CoexprError::InvalidParameter(format!(
                "Row index {} out of bounds",
                bad
            )));
        }
        let data = DMatrix::from_fn(indices.len(), self.n_genes(), |i, j| {
            self.data[(indices[i], j)]
        });
        Self::new(data, self.gene_names.clone(), self.metadata.subset_rows(indices)?)
    }

    /// Keep only the given gene columns, in the given order.
    pub fn select_genes(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&j| j >= self.n_genes()) {
            return Err(CoexprError::InvalidParameter(format!(
                "Gene index {} out of bounds",
                bad
            )));
        }
        let data = DMatrix::from_fn(self.n_samples(), indices.len(), |i, j| {
            self.data[(i, indices[j])]
        });
        let names = indices.iter().map(|&j| self.gene_names[j].clone()).collect();
        Self::new(data, names, self.metadata.clone())
    }

    /// Keep only the named gene columns, in the given order.
    pub fn select_genes_by_name<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.gene_index(name).ok_or_else(|| {
                    CoexprError::InvalidParameter(format!("Unknown gene column '{}'", name))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.select_genes(&indices)
    }

    /// Same genes and samples with new values.
    pub fn with_data(&self, data: DMatrix<f64>) -> Result<Self> {
        Self::new(data, self.gene_names.clone(), self.metadata.clone())
    }

    /// Same values with new gene names.
    pub fn with_gene_names(&self, gene_names: Vec<String>) -> Result<Self> {
        Self::new(self.data.clone(), gene_names, self.metadata.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table() -> ExpressionTable {
        // 4 samples × 3 genes
        let metadata = SampleMetadata::new(
            (1..=4).map(|i| format!("P{}", i)).collect(),
            vec!["stage i".to_string(); 4],
            vec!["01".to_string(), "01".to_string(), "11".to_string(), "06".to_string()],
        )
        .unwrap();
        ExpressionTable::from_columns(
            vec![
                ("DAB2".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
                ("GAPDH".to_string(), vec![10.0, 20.0, 30.0, 40.0]),
                ("F2RL3".to_string(), vec![0.5, 0.1, 0.3, 0.2]),
            ],
            metadata,
        )
        .unwrap()
    }

    #[test]
    fn test_dimensions() {
        let table = create_test_table();
        assert_eq!(table.n_samples(), 4);
        assert_eq!(table.n_genes(), 3);
        assert_eq!(table.get(1, 1), 20.0);
        assert_eq!(table.column_by_name("F2RL3").unwrap(), vec![0.5, 0.1, 0.3, 0.2]);
    }

    #[test]
    fn test_duplicate_gene_rejected() {
        let metadata = SampleMetadata::new(
            vec!["P1".to_string()],
            vec!["na".to_string()],
            vec!["01".to_string()],
        )
        .unwrap();
        let result = ExpressionTable::from_columns(
            vec![("A".to_string(), vec![1.0]), ("A".to_string(), vec![2.0])],
            metadata,
        );
        assert!(matches!(result, Err(CoexprError::Schema(_))));
    }

    #[test]
    fn test_resolve_target() {
        let table = create_test_table();
        assert_eq!(table.resolve_target(None).unwrap(), 0);
        assert_eq!(table.resolve_target(Some("")).unwrap(), 0);
        assert_eq!(table.resolve_target(Some("F2RL3")).unwrap(), 2);
        assert!(matches!(
            table.resolve_target(Some("TP53")),
            Err(CoexprError::TargetGeneNotFound(name)) if name == "TP53"
        ));
    }

    #[test]
    fn test_subset_rows() {
        let table = create_test_table();
        let subset = table.subset_rows(&[3, 1]).unwrap();
        assert_eq!(subset.n_samples(), 2);
        assert_eq!(subset.column(0), vec![4.0, 2.0]);
        assert_eq!(subset.metadata().patient_ids(), &["P4", "P2"]);
        assert!(table.subset_rows(&[4]).is_err());
    }

    #[test]
    fn test_select_genes_by_name() {
        let table = create_test_table();
        let selected = table.select_genes_by_name(&["F2RL3", "DAB2"]).unwrap();
        assert_eq!(selected.gene_names(), &["F2RL3", "DAB2"]);
        assert_eq!(selected.column(1), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(table.select_genes_by_name(&["NOPE"]).is_err());
    }

    #[test]
    fn test_tsv_roundtrip() {
        let table = create_test_table();
        let file = tempfile::NamedTempFile::new().unwrap();
        table.to_tsv(file.path()).unwrap();

        let loaded = ExpressionTable::from_tsv(file.path()).unwrap();
        assert_eq!(loaded.gene_names(), table.gene_names());
        assert_eq!(loaded.metadata(), table.metadata());
        assert_eq!(loaded.data(), table.data());
    }
}
