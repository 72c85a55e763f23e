//! Column-wise z-score normalization.

use crate::correlate::pearson::is_constant;
use crate::data::ExpressionTable;
use crate::error::{CoexprError, Result};
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Z-scores of a single column, using the sample standard deviation.
///
/// Returns `None` for constant columns (including a single value), where the
/// standard deviation is zero and z-scores are undefined.
pub fn zscore(values: &[f64]) -> Option<Vec<f64>> {
    if values.len() < 2 || is_constant(values) {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let sd = var.sqrt();
    if sd == 0.0 {
        return None;
    }
    Some(values.iter().map(|v| (v - mean) / sd).collect())
}

/// Replace every gene column by its z-scores over the table's rows.
///
/// # Formula
/// For gene j: z_ij = (x_ij - mean_j) / sd_j, with sd_j the sample standard
/// deviation (n - 1 denominator).
///
/// # Errors
/// `ZeroVariance` naming the first constant column in table order.
pub fn zscore_columns(table: &ExpressionTable) -> Result<ExpressionTable> {
    let n_samples = table.n_samples();
    let n_genes = table.n_genes();

    let columns: Vec<Option<Vec<f64>>> = (0..n_genes)
        .into_par_iter()
        .map(|j| zscore(&table.column(j)))
        .collect();

    let mut data = DMatrix::zeros(n_samples, n_genes);
    for (j, column) in columns.into_iter().enumerate() {
        let column = column.ok_or_else(|| CoexprError::ZeroVariance {
            column: table.gene_names()[j].clone(),
        })?;
        for (i, z) in column.into_iter().enumerate() {
            data[(i, j)] = z;
        }
    }

    table.with_data(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleMetadata;
    use approx::assert_relative_eq;

    fn create_test_table(columns: Vec<(&str, Vec<f64>)>) -> ExpressionTable {
        let n = columns[0].1.len();
        let metadata = SampleMetadata::new(
            (0..n).map(|i| format!("P{}", i)).collect(),
            vec!["na".to_string(); n],
            vec!["01".to_string(); n],
        )
        .unwrap();
        ExpressionTable::from_columns(
            columns
                .into_iter()
                .map(|(name, v)| (name.to_string(), v))
                .collect(),
            metadata,
        )
        .unwrap()
    }

    #[test]
    fn test_zscore_values() {
        // mean 5, sample sd = sqrt(10) for [1, 3, 5, 7, 9]
        let z = zscore(&[1.0, 3.0, 5.0, 7.0, 9.0]).unwrap();
        let sd = 10f64.sqrt();
        assert_relative_eq!(z[0], -4.0 / sd, epsilon = 1e-12);
        assert_relative_eq!(z[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(z[4], 4.0 / sd, epsilon = 1e-12);
    }

    #[test]
    fn test_columns_have_zero_mean_unit_sd() {
        let table = create_test_table(vec![
            ("A", vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0]),
            ("B", vec![100.0, 90.0, 95.0, 300.0, 12.0, 40.0]),
        ]);
        let z = zscore_columns(&table).unwrap();

        for j in 0..z.n_genes() {
            let col = z.column(j);
            let n = col.len() as f64;
            let mean = col.iter().sum::<f64>() / n;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
            assert_relative_eq!(var.sqrt(), 1.0, epsilon = 1e-12);
        }
        assert_eq!(z.gene_names(), table.gene_names());
        assert_eq!(z.metadata(), table.metadata());
    }

    #[test]
    fn test_zero_variance_names_first_column() {
        let table = create_test_table(vec![
            ("A", vec![1.0, 2.0, 3.0]),
            ("B", vec![0.3, 0.3, 0.3]),
            ("C", vec![5.0, 5.0, 5.0]),
        ]);
        match zscore_columns(&table) {
            Err(CoexprError::ZeroVariance { column }) => assert_eq!(column, "B"),
            other => panic!("expected zero variance error, got {:?}", other),
        }
    }

    #[test]
    fn test_single_row_is_undefined() {
        assert!(zscore(&[4.2]).is_none());
        assert!(zscore(&[]).is_none());
    }
}
