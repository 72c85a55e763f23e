//! Assembly of the final heatmap matrix.

mod matrix;

pub use matrix::{assemble_matrix, HeatmapMatrix, SortOrder, SAMPLE_TYPE_CODE};
