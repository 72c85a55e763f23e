//! Spearman rank correlation.

use super::pearson::pearson;
use std::cmp::Ordering;

/// Rank values from 1, giving tied values the average of their ranks.
pub fn rank_average_ties(values: &[f64]) -> Vec<f64> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < idx.len() {
        let start = i;
        let val = values[idx[i]];
        while i < idx.len() && values[idx[i]] == val {
            i += 1;
        }
        // 1-based average of positions start..i
        let avg = (start + i - 1) as f64 / 2.0 + 1.0;
        for &k in &idx[start..i] {
            ranks[k] = avg;
        }
    }
    ranks
}

/// Spearman rank correlation: Pearson correlation of average ranks.
///
/// Returns `None` when either input is constant.
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    pearson(&rank_average_ties(x), &rank_average_ties(y))
}
