//! Pipeline composition and execution for co-expression analysis.

mod config;
mod runner;

pub use config::PipelineConfig;
pub use runner::{ArtifactPaths, Pipeline, PipelineOutput};
