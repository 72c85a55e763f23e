//! log2(x + 1) transform of expression values.

use crate::data::ExpressionTable;
use crate::error::{CoexprError, Result};

/// Apply `log2(x + 1)` to every value.
///
/// FPKM-UQ values span several orders of magnitude; the shifted log keeps
/// zeros at zero.
///
/// # Errors
/// `InvalidParameter` if any value is `<= -1`.
pub fn log2_transform(table: &ExpressionTable) -> Result<ExpressionTable> {
    if let Some(((row, col), v)) = table
        .data()
        .iter()
        .enumerate()
        .map(|(k, v)| ((k % table.n_samples(), k / table.n_samples()), *v))
        .find(|(_, v)| *v <= -1.0)
    {
        return Err(CoexprError::InvalidParameter(format!(
            "log2(x + 1) undefined for {} in column '{}' at row {}",
            v,
            table.gene_names()[col],
            row
        )));
    }
    table.with_data(table.data().map(|x| (x + 1.0).log2()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleMetadata;
    use approx::assert_relative_eq;

    fn create_test_table(values: Vec<f64>) -> ExpressionTable {
        let n = values.len();
        let metadata = SampleMetadata::new(
            (0..n).map(|i| format!("P{}", i)).collect(),
            vec!["na".to_string(); n],
            vec!["01".to_string(); n],
        )
        .unwrap();
        ExpressionTable::from_columns(vec![("A".to_string(), values)], metadata).unwrap()
    }

    #[test]
    fn test_log2_values() {
        let table = create_test_table(vec![0.0, 1.0, 3.0, 1023.0]);
        let logged = log2_transform(&table).unwrap();
        let col = logged.column(0);
        assert_relative_eq!(col[0], 0.0);
        assert_relative_eq!(col[1], 1.0);
        assert_relative_eq!(col[2], 2.0);
        assert_relative_eq!(col[3], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_values_at_or_below_minus_one() {
        let table = create_test_table(vec![1.0, -1.0]);
        match log2_transform(&table) {
            Err(CoexprError::InvalidParameter(msg)) => assert!(msg.contains("row 1")),
            other => panic!("expected invalid parameter, got {:?}", other),
        }
    }
}
