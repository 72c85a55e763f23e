//! Correlating every gene column against a target gene.

use super::pearson::{correlation_p_value, is_constant, pearson};
use super::spearman::spearman;
use crate::data::{CorrelationResult, CorrelationSet, CorrelationStats, ExpressionTable};
use crate::error::{CoexprError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What to do with a gene column that is constant over the active rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Fail the run on the first constant column.
    #[default]
    Abort,
    /// Record the column as degenerate and carry on; the pipeline then drops
    /// it before normalization.
    Flag,
}

/// Correlate every gene column of `table` with the target gene.
///
/// Produces one result per gene column in table order, the target included.
/// The target's own record is the exact identity (`r = 1`, `p = 0`). All rows
/// of `table` are used; exclude rows beforehand to correlate over a subset.
///
/// # Arguments
/// * `table` - Expression table restricted to the active rows
/// * `target_gene` - Target column; `None` or empty selects the first column
/// * `policy` - Handling of constant columns
///
/// # Errors
/// * `TargetGeneNotFound` if the target is absent
/// * `DegenerateColumn` if the target is constant, or any column is constant
///   under [`DegeneratePolicy::Abort`]
pub fn correlate_target(
    table: &ExpressionTable,
    target_gene: Option<&str>,
    policy: DegeneratePolicy,
) -> Result<CorrelationSet> {
    let target_idx = table.resolve_target(target_gene)?;
    let target_name = table.gene_names()[target_idx].clone();
    let n_rows = table.n_samples();

    let x = table.column(target_idx);
    if is_constant(&x) {
        return Err(CoexprError::DegenerateColumn {
            column: target_name,
            n_rows,
        });
    }

    let results: Vec<CorrelationResult> = (0..table.n_genes())
        .into_par_iter()
        .map(|j| {
            let name = &table.gene_names()[j];
            if j == target_idx {
                return CorrelationResult::computed(name, CorrelationStats::identity());
            }
            let y = table.column(j);
            match (pearson(&x, &y), spearman(&x, &y)) {
                (Some(pearson_r), Some(spearman_r)) => CorrelationResult::computed(
                    name,
                    CorrelationStats {
                        pearson_r,
                        pearson_p: correlation_p_value(pearson_r, n_rows),
                        spearman_r,
                        spearman_p: correlation_p_value(spearman_r, n_rows),
                    },
                ),
                _ => CorrelationResult::degenerate(name),
            }
        })
        .collect();

    if let Some(first) = results.iter().find(|r| r.is_degenerate()) {
        match policy {
            DegeneratePolicy::Abort => {
                return Err(CoexprError::DegenerateColumn {
                    column: first.gene_name.clone(),
                    n_rows,
                });
            }
            DegeneratePolicy::Flag => {
                for r in results.iter().filter(|r| r.is_degenerate()) {
                    warn!(column = %r.gene_name, n_rows, "degenerate column flagged");
                }
            }
        }
    }

    info!(
        target_gene = %target_name,
        n_genes = results.len(),
        n_rows,
        "correlation coefficients computed"
    );

    Ok(CorrelationSet {
        target_gene: target_name,
        n_rows,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleMetadata;

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
    fn test_one_record_per_column() {
        let table = create_test_table(vec![
            ("A", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("B", vec![2.0, 1.0, 4.0, 3.0, 5.0]),
            ("C", vec![5.0, 4.0, 3.0, 2.0, 1.0]),
        ]);
        let set = correlate_target(&table, Some("A"), DegeneratePolicy::Abort).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.target_gene, "A");
        let a = set.get("A").unwrap().stats.unwrap();
        assert_eq!(a.pearson_r, 1.0);
        assert_eq!(a.pearson_p, 0.0);
        let c = set.get("C").unwrap().stats.unwrap();
        assert!((c.pearson_r + 1.0).abs() < 1e-12);
        assert!((c.spearman_r + 1.0).abs() < 1e-12);
        for r in set.iter() {
            let s = r.stats.unwrap();
            assert!((-1.0..=1.0).contains(&s.pearson_r));
            assert!((-1.0..=1.0).contains(&s.spearman_r));
            assert!((0.0..=1.0).contains(&s.pearson_p));
            assert!((0.0..=1.0).contains(&s.spearman_p));
        }
    }

    #[test]
    fn test_default_target_is_first_column() {
        let table = create_test_table(vec![
            ("B", vec![1.0, 2.0, 3.0]),
            ("A", vec![3.0, 1.0, 2.0]),
        ]);
        let set = correlate_target(&table, None, DegeneratePolicy::Abort).unwrap();
        assert_eq!(set.target_gene, "B");
    }

    #[test]
    fn test_degenerate_abort() {
        let table = create_test_table(vec![
            ("A", vec![1.0, 2.0, 3.0]),
            ("B", vec![7.0, 7.0, 7.0]),
        ]);
        match correlate_target(&table, Some("A"), DegeneratePolicy::Abort) {
            Err(CoexprError::DegenerateColumn { column, n_rows }) => {
                assert_eq!(column, "B");
                assert_eq!(n_rows, 3);
            }
            other => panic!("expected degenerate column error, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_flag() {
        let table = create_test_table(vec![
            ("A", vec![1.0, 2.0, 3.0]),
            ("B", vec![7.0, 7.0, 7.0]),
            ("C", vec![1.0, 3.0, 2.0]),
        ]);
        let set = correlate_target(&table, Some("A"), DegeneratePolicy::Flag).unwrap();
        assert!(set.get("B").unwrap().is_degenerate());
        assert!(!set.get("C").unwrap().is_degenerate());
        assert_eq!(set.degenerate_columns(), vec!["B"]);
    }

    #[test]
    fn test_constant_target_always_fails() {
        let table = create_test_table(vec![
            ("A", vec![2.0, 2.0, 2.0]),
            ("B", vec![1.0, 2.0, 3.0]),
        ]);
        assert!(matches!(
            correlate_target(&table, Some("A"), DegeneratePolicy::Flag),
            Err(CoexprError::DegenerateColumn { .. })
        ));
    }

    #[test]
    fn test_unknown_target() {
        let table = create_test_table(vec![("A", vec![1.0, 2.0, 3.0])]);
        assert!(matches!(
            correlate_target(&table, Some("DAB2"), DegeneratePolicy::Abort),
            Err(CoexprError::TargetGeneNotFound(_))
        ));
    }
}
