//! Composable Co-expression Analysis Library
//!
//! This library correlates every gene of an expression table against a target
//! gene, z-score normalizes the table, removes outlier samples and assembles
//! a target-sorted matrix for heatmap rendering.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (ExpressionTable, SampleTypeMap, CorrelationSet)
//! - **schema**: Splitting a raw table into metadata and numeric gene columns
//! - **profile**: Sample-type and tumor-stage census
//! - **correlate**: Pearson and Spearman correlation against the target gene
//! - **rank**: Column ranking by correlation strength
//! - **normalize**: log2 and z-score transforms
//! - **filter**: Sample filtering (z-score outliers, tissue category)
//! - **assemble**: Final heatmap matrix
//! - **report**: Correlation report, run log and atomic file output
//! - **pipeline**: Pipeline composition and execution
//!
//! # Example
//!
//! ```no_run
//! use coexpr::prelude::*;
//!
//! let table = ExpressionTable::from_tsv("expression.tsv").unwrap();
//!
//! let output = Pipeline::new()
//!     .name("TCGA-BRCA")
//!     .target_gene("DAB2")
//!     .z_cutoff(ZCutoff::Threshold(5.0))
//!     .run(&table)
//!     .unwrap();
//!
//! println!("{}", render_correlation_report(&output.correlations));
//! ```

pub mod assemble;
pub mod correlate;
pub mod data;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod rank;
pub mod report;
pub mod schema;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::assemble::{assemble_matrix, HeatmapMatrix, SortOrder, SAMPLE_TYPE_CODE};
    pub use crate::correlate::{
        correlate_target, correlation_p_value, pearson, spearman, DegeneratePolicy,
    };
    pub use crate::data::{
        extract_targets, tumor_stage_number, CorrelationResult, CorrelationSet,
        CorrelationStats, ExpressionTable, RawTable, SampleCategory, SampleMetadata,
        SampleTypeEntry, SampleTypeMap, TargetEntry, TargetExtraction, TargetList,
    };
    pub use crate::error::{CoexprError, Result};
    pub use crate::filter::{
        exclude_categories, filter_outliers, select_for_correlation, FilterOutcome, ZCutoff,
    };
    pub use crate::normalize::{log2_transform, zscore, zscore_columns};
    pub use crate::pipeline::{ArtifactPaths, Pipeline, PipelineConfig, PipelineOutput};
    pub use crate::profile::{profile_sample_types, SampleTypeCensus};
    pub use crate::rank::{rank_columns, RankedColumn};
    pub use crate::report::{
        format_scientific, render_correlation_report, write_atomic, write_correlation_report,
        RunLog,
    };
    pub use crate::schema::split_schema;
}
