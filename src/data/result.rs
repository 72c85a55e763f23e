//! Correlation result types.

use serde::{Deserialize, Serialize};

/// Coefficients and two-sided p-values for one gene against the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationStats {
    /// Pearson correlation coefficient.
    pub pearson_r: f64,
    /// Pearson p-value.
    pub pearson_p: f64,
    /// Spearman rank correlation coefficient.
    pub spearman_r: f64,
    /// Spearman p-value.
    pub spearman_p: f64,
}

impl CorrelationStats {
    /// Self-correlation of a non-constant column.
    pub fn identity() -> Self {
        Self {
            pearson_r: 1.0,
            pearson_p: 0.0,
            spearman_r: 1.0,
            spearman_p: 0.0,
        }
    }

    /// Combined strength used for column ranking.
    pub fn ranking_key(&self) -> f64 {
        (self.pearson_r + self.spearman_r) / 2.0
    }
}

/// Correlation of one gene column with the target gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Gene (column) name.
    pub gene_name: String,
    /// Coefficients, or `None` when the column is constant over the active
    /// rows and correlation is undefined.
    pub stats: Option<CorrelationStats>,
}

impl CorrelationResult {
    pub fn computed(gene_name: &str, stats: CorrelationStats) -> Self {
        Self {
            gene_name: gene_name.to_string(),
            stats: Some(stats),
        }
    }

    pub fn degenerate(gene_name: &str) -> Self {
        Self {
            gene_name: gene_name.to_string(),
            stats: None,
        }
    }

    /// Check if the column was flagged as degenerate.
    pub fn is_degenerate(&self) -> bool {
        self.stats.is_none()
    }

    /// Mean of the Pearson and Spearman coefficients.
    pub fn ranking_key(&self) -> Option<f64> {
        self.stats.as_ref().map(CorrelationStats::ranking_key)
    }
}

/// Correlation results for every gene column of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationSet {
    /// Target gene the columns were correlated against.
    pub target_gene: String,
    /// Number of rows the coefficients were computed over.
    pub n_rows: usize,
    /// One result per gene column, in table order.
    pub results: Vec<CorrelationResult>,
}

impl CorrelationSet {
    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over results in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CorrelationResult> {
        self.results.iter()
    }

    /// Get the result for a specific gene.
    pub fn get(&self, gene_name: &str) -> Option<&CorrelationResult> {
        self.results.iter().find(|r| r.gene_name == gene_name)
    }

    /// The target's self-correlation record.
    pub fn target(&self) -> Option<&CorrelationResult> {
        self.get(&self.target_gene)
    }

    /// Names of columns flagged as degenerate.
    pub fn degenerate_columns(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.is_degenerate())
            .map(|r| r.gene_name.as_str())
            .collect()
    }
}
