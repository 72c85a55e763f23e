//! Data structures for co-expression analysis.

mod expression_table;
pub mod metadata;
mod raw_table;
mod result;
mod sample_type;
mod targets;

pub use expression_table::ExpressionTable;
pub use metadata::{tumor_stage_number, SampleMetadata};
pub use raw_table::RawTable;
pub use result::{CorrelationResult, CorrelationSet, CorrelationStats};
pub use sample_type::{SampleCategory, SampleTypeEntry, SampleTypeMap};
pub use targets::{extract_targets, TargetEntry, TargetExtraction, TargetList};
