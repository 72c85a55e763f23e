//! Data profiling before analysis.

mod census;

pub use census::{profile_sample_types, SampleTypeCensus};
