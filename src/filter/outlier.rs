//! Z-score outlier filtering of samples.

use crate::data::ExpressionTable;
use crate::error::{CoexprError, Result};
use serde::{Deserialize, Serialize};

/// Z-score cutoff setting.
///
/// Configured as a single number: `-1` disables normalization and filtering
/// altogether, `0` normalizes without filtering, and any positive value is
/// the magnitude threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum ZCutoff {
    /// Raw values pass straight through (`-1`).
    PassThrough,
    /// Normalize, keep every row (`0`).
    Unfiltered,
    /// Normalize, drop rows with any `|z|` above the threshold.
    Threshold(f64),
}

impl Default for ZCutoff {
    fn default() -> Self {
        Self::Threshold(5.0)
    }
}

impl ZCutoff {
    /// Whether z-score normalization runs.
    pub fn normalizes(&self) -> bool {
        !matches!(self, Self::PassThrough)
    }

    /// Threshold to filter on, if filtering is enabled.
    pub fn threshold(&self) -> Option<f64> {
        match self {
            Self::Threshold(z) => Some(*z),
            _ => None,
        }
    }
}

impl TryFrom<f64> for ZCutoff {
    type Error = CoexprError;

    fn try_from(value: f64) -> Result<Self> {
        if value == -1.0 {
            Ok(Self::PassThrough)
        } else if value == 0.0 {
            Ok(Self::Unfiltered)
        } else if value.is_finite() && value > 0.0 {
            Ok(Self::Threshold(value))
        } else {
            Err(CoexprError::InvalidParameter(format!(
                "Z-score cutoff must be -1, 0 or a positive number, got {}",
                value
            )))
        }
    }
}

impl From<ZCutoff> for f64 {
    fn from(cutoff: ZCutoff) -> Self {
        match cutoff {
            ZCutoff::PassThrough => -1.0,
            ZCutoff::Unfiltered => 0.0,
            ZCutoff::Threshold(z) => z,
        }
    }
}

impl std::fmt::Display for ZCutoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PassThrough => write!(f, "disabled (no normalization)"),
            Self::Unfiltered => write!(f, "disabled"),
            Self::Threshold(z) => write!(f, "{}", z),
        }
    }
}

/// Audit record of a row filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOutcome {
    /// Number of rows before filtering.
    pub rows_before: usize,
    /// Number of rows after filtering.
    pub rows_after: usize,
    /// Patient IDs of removed rows, in input order.
    pub dropped_row_ids: Vec<String>,
}

impl FilterOutcome {
    /// Outcome of a filter that kept every row.
    pub fn unfiltered(rows: usize) -> Self {
        Self {
            rows_before: rows,
            rows_after: rows,
            dropped_row_ids: Vec::new(),
        }
    }

    /// Number of rows removed.
    pub fn n_dropped(&self) -> usize {
        self.rows_before - self.rows_after
    }

    /// Percentage of rows removed; 0 for an empty input.
    pub fn percent_dropped(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            100.0 * self.n_dropped() as f64 / self.rows_before as f64
        }
    }
}

impl std::fmt::Display for FilterOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Number of samples (before Z-cutoff): {}", self.rows_before)?;
        writeln!(f, "Number of samples (after Z-cutoff): {}", self.rows_after)?;
        write!(
            f,
            "Dropped {} samples ({:.6}% of total dataset)",
            self.n_dropped(),
            self.percent_dropped()
        )
    }
}

/// Remove every row with any value whose magnitude exceeds `z`.
///
/// A single extreme gene removes the whole sample. `z = 0` disables
/// filtering. Rows with `|value| == z` are kept, so filtering a table that
/// already passed the same threshold removes nothing. An empty result is
/// returned as-is; callers decide whether that is fatal.
///
/// # Errors
/// `InvalidParameter` for a negative or non-finite threshold.
pub fn filter_outliers(table: &ExpressionTable, z: f64) -> Result<(ExpressionTable, FilterOutcome)> {
    if !z.is_finite() || z < 0.0 {
        return Err(CoexprError::InvalidParameter(format!(
            "Z-score threshold must be a non-negative number, got {}",
            z
        )));
    }
    let rows_before = table.n_samples();
    if z == 0.0 {
        return Ok((table.clone(), FilterOutcome::unfiltered(rows_before)));
    }

    let data = table.data();
    let (keep, drop): (Vec<usize>, Vec<usize>) =
        (0..rows_before).partition(|&i| data.row(i).iter().all(|v| v.abs() <= z));

    let dropped_row_ids = drop
        .iter()
        .map(|&i| table.metadata().patient_ids()[i].clone())
        .collect();
    let filtered = table.subset_rows(&keep)?;
    let outcome = FilterOutcome {
        rows_before,
        rows_after: filtered.n_samples(),
        dropped_row_ids,
    };
    Ok((filtered, outcome))
}
