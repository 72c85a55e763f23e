//! Schema splitting: raw string tables into typed expression tables.

mod split;

pub use split::split_schema;
