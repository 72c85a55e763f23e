//! Final heatmap matrix assembly.

use crate::data::metadata::PATIENT_ID;
use crate::data::{ExpressionTable, SampleTypeMap};
use crate::error::{CoexprError, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Name of the trailing sample-type code column.
pub const SAMPLE_TYPE_CODE: &str = "SampleTypeCode";

/// Direction of the final row sort on the target gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Highest target value first.
    #[default]
    Descending,
    /// Lowest target value first.
    Ascending,
}

impl SortOrder {
    pub fn from_invert(invert: bool) -> Self {
        if invert {
            Self::Ascending
        } else {
            Self::Descending
        }
    }
}

/// Matrix handed to the heatmap renderer.
///
/// Column 0 is the target gene, the last column is [`SAMPLE_TYPE_CODE`], and
/// rows are ordered by the target value.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapMatrix {
    /// Values (rows × columns), sample-type codes stored as floats.
    #[serde(skip)]
    data: DMatrix<f64>,
    /// Column names.
    columns: Vec<String>,
    /// Patient IDs, one per row.
    row_ids: Vec<String>,
}

impl HeatmapMatrix {
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    /// Get reference to the underlying matrix.
    #[inline]
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    /// Values of a named column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.columns.iter().position(|c| c == name)?;
        Some(self.data.column(j).iter().copied().collect())
    }

    /// Target gene values in row order.
    pub fn target_values(&self) -> Vec<f64> {
        self.data.column(0).iter().copied().collect()
    }

    /// Sample-type codes in row order.
    pub fn sample_type_codes(&self) -> Vec<i32> {
        let last = self.n_cols() - 1;
        self.data.column(last).iter().map(|&c| c as i32).collect()
    }

    /// Write as TSV with a leading patient ID column.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", PATIENT_ID)?;
        for name in &self.columns {
            write!(writer, "\t{}", name)?;
        }
        writeln!(writer)?;

        let last = self.n_cols() - 1;
        for (i, row_id) in self.row_ids.iter().enumerate() {
            write!(writer, "{}", row_id)?;
            for j in 0..last {
                write!(writer, "\t{}", self.data[(i, j)])?;
            }
            writeln!(writer, "\t{}", self.data[(i, last)] as i32)?;
        }
        Ok(())
    }

    /// Write to a TSV file, replacing it atomically.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::report::write_atomic(path, |w| self.write_tsv(w))
    }
}

/// Assemble the heatmap matrix.
///
/// Steps, in order:
/// 1. select `column_order` from the table
/// 2. put `target_gene` at position 0 (any occurrence in `column_order` is
///    ignored)
/// 3. append the encoded sample type as the last column
/// 4. sort rows on the target value; ties keep their input order
///
/// # Errors
/// * `EmptyResult` if the table has no rows
/// * `TargetGeneNotFound` if the target is absent
/// * `InvalidParameter` for unknown or repeated names in `column_order`
/// * `UnknownSampleType` for unmapped sample types
pub fn assemble_matrix(
    table: &ExpressionTable,
    target_gene: &str,
    column_order: &[String],
    sample_types: &SampleTypeMap,
    order: SortOrder,
) -> Result<HeatmapMatrix> {
    if table.n_samples() == 0 {
        return Err(CoexprError::EmptyResult(
            "no samples left to assemble into a matrix".to_string(),
        ));
    }

    let target_idx = table
        .gene_index(target_gene)
        .ok_or_else(|| CoexprError::TargetGeneNotFound(target_gene.to_string()))?;

    let mut selected = vec![target_idx];
    let mut seen = HashSet::new();
    for name in column_order.iter().filter(|n| n.as_str() != target_gene) {
        if !seen.insert(name.as_str()) {
            return Err(CoexprError::InvalidParameter(format!(
                "Column '{}' listed twice in column order",
                name
            )));
        }
        let idx = table.gene_index(name).ok_or_else(|| {
            CoexprError::InvalidParameter(format!("Unknown gene column '{}'", name))
        })?;
        selected.push(idx);
    }

    let codes = sample_types.encode(table.metadata().sample_types())?;

    let target = table.column(target_idx);
    let mut rows: Vec<usize> = (0..table.n_samples()).collect();
    rows.sort_by(|&a, &b| {
        let cmp = target[a].partial_cmp(&target[b]).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Descending => cmp.reverse(),
            SortOrder::Ascending => cmp,
        }
    });

    let n_genes = selected.len();
    let data = DMatrix::from_fn(rows.len(), n_genes + 1, |i, j| {
        if j < n_genes {
            table.get(rows[i], selected[j])
        } else {
            codes[rows[i]] as f64
        }
    });

    let mut columns: Vec<String> = selected
        .iter()
        .map(|&j| table.gene_names()[j].clone())
        .collect();
    columns.push(SAMPLE_TYPE_CODE.to_string());

    let row_ids = rows
        .iter()
        .map(|&i| table.metadata().patient_ids()[i].clone())
        .collect();

    Ok(HeatmapMatrix {
        data,
        columns,
        row_ids,
    })
}
