//! Normalization of expression values.
//!
//! - **zscore**: per-gene standardization to mean 0, sample sd 1
//! - **log2**: log2(x + 1) variance-stabilizing transform

pub mod log2;
pub mod zscore;

pub use log2::log2_transform;
pub use zscore::{zscore, zscore_columns};
