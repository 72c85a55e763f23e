//! Ordering of gene columns by correlation strength.

mod columns;

pub use columns::{rank_columns, RankedColumn};
