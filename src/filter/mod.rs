//! Sample (row) filtering.

mod outlier;
mod sample_type;

pub use outlier::{filter_outliers, FilterOutcome, ZCutoff};
pub use sample_type::{exclude_categories, select_for_correlation};
