//! Column ranking by combined Pearson / Spearman coefficient.

use crate::data::CorrelationSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A non-target column with its ranking key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedColumn {
    /// Gene name.
    pub gene_name: String,
    /// Mean of Pearson and Spearman r; `None` for degenerate columns.
    pub key: Option<f64>,
}

/// Order the non-target columns of a correlation set.
///
/// With ranking enabled, columns are sorted by descending key with a stable
/// sort, so equal keys keep their table order. Degenerate columns have no key
/// and follow all ranked columns in table order. With ranking disabled the
/// table order is returned unchanged. Either way the output is a permutation
/// of the non-target columns.
pub fn rank_columns(correlations: &CorrelationSet, enabled: bool) -> Vec<RankedColumn> {
    let columns: Vec<RankedColumn> = correlations
        .iter()
        .filter(|r| r.gene_name != correlations.target_gene)
        .map(|r| RankedColumn {
            gene_name: r.gene_name.clone(),
            key: r.ranking_key(),
        })
        .collect();

    if !enabled {
        return columns;
    }

    let (mut keyed, unkeyed): (Vec<_>, Vec<_>) =
        columns.into_iter().partition(|c| c.key.is_some());
    keyed.sort_by(|a, b| match (a.key, b.key) {
        (Some(ka), Some(kb)) => kb.partial_cmp(&ka).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    });
    keyed.extend(unkeyed);
    keyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CorrelationResult, CorrelationStats};

    fn stats(r: f64) -> CorrelationStats {
        CorrelationStats {
            pearson_r: r,
            pearson_p: 0.5,
            spearman_r: r,
            spearman_p: 0.5,
        }
    }

    fn create_test_set() -> CorrelationSet {
        CorrelationSet {
            target_gene: "T".to_string(),
            n_rows: 20,
            results: vec![
                CorrelationResult::computed("B", stats(0.2)),
                CorrelationResult::computed("T", CorrelationStats::identity()),
                CorrelationResult::degenerate("D"),
                CorrelationResult::computed("C", stats(0.9)),
                CorrelationResult::computed("E", stats(0.2)),
                CorrelationResult::computed("F", stats(-0.7)),
            ],
        }
    }

    fn names(columns: &[RankedColumn]) -> Vec<&str> {
        columns.iter().map(|c| c.gene_name.as_str()).collect()
    }

    #[test]
    fn test_descending_with_stable_ties() {
        let ranked = rank_columns(&create_test_set(), true);
        // B and E tie at 0.2 and keep table order; degenerate D goes last
        assert_eq!(names(&ranked), vec!["C", "B", "E", "F", "D"]);
    }

    #[test]
    fn test_disabled_preserves_order() {
        let ranked = rank_columns(&create_test_set(), false);
        assert_eq!(names(&ranked), vec!["B", "D", "C", "E", "F"]);
    }

    #[test]
    fn test_permutation_of_non_target_columns() {
        let set = create_test_set();
        let mut ranked = names(&rank_columns(&set, true))
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        let mut expected: Vec<String> = set
            .iter()
            .filter(|r| r.gene_name != "T")
            .map(|r| r.gene_name.clone())
            .collect();
        ranked.sort();
        expected.sort();
        assert_eq!(ranked, expected);
    }

    #[test]
    fn test_keys_non_increasing() {
        let ranked = rank_columns(&create_test_set(), true);
        let keys: Vec<f64> = ranked.iter().filter_map(|c| c.key).collect();
        assert!(keys.windows(2).all(|w| w[0] >= w[1]));
    }
}
