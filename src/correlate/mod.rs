//! Correlation of gene columns with a target gene.

mod engine;
pub mod pearson;
pub mod spearman;

pub use engine::{correlate_target, DegeneratePolicy};
pub use pearson::{correlation_p_value, pearson};
pub use spearman::{rank_average_ties, spearman};
