//! Serializable run configuration.

use crate::correlate::DegeneratePolicy;
use crate::data::{SampleCategory, SampleTypeMap};
use crate::error::{CoexprError, Result};
use crate::filter::ZCutoff;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every option of a co-expression run.
///
/// Missing YAML keys take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Project name, used in the run log and output file names.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Target gene; `None` selects the first gene column.
    pub target_gene: Option<String>,
    /// Z-score cutoff: `-1` pass-through, `0` unfiltered, `> 0` threshold.
    pub z_cutoff: ZCutoff,
    /// Correlate over control samples too.
    pub include_controls_in_correlation: bool,
    /// Order matrix columns by correlation strength.
    pub rank_columns: bool,
    /// Sort matrix rows ascending instead of descending.
    pub invert_sort: bool,
    /// Apply `log2(x + 1)` before correlation.
    pub log2_transform: bool,
    /// Sample categories removed before any computation.
    pub exclude_categories: Vec<SampleCategory>,
    /// Handling of constant gene columns.
    pub degenerate_policy: DegeneratePolicy,
    /// Sample-type label table.
    pub sample_types: SampleTypeMap,
    /// Produce the heatmap matrix artifact.
    pub write_heatmap: bool,
    /// Produce the correlation report artifact.
    pub write_report: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "coexpr".to_string(),
            description: None,
            target_gene: None,
            z_cutoff: ZCutoff::default(),
            include_controls_in_correlation: true,
            rank_columns: true,
            invert_sort: false,
            log2_transform: false,
            exclude_categories: Vec::new(),
            degenerate_policy: DegeneratePolicy::default(),
            sample_types: SampleTypeMap::default(),
            write_heatmap: true,
            write_report: true,
        }
    }
}

impl PipelineConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(CoexprError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(CoexprError::from)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_roundtrip() {
        let config = PipelineConfig {
            name: "TCGA-BRCA".to_string(),
            target_gene: Some("DAB2".to_string()),
            z_cutoff: ZCutoff::PassThrough,
            exclude_categories: vec![SampleCategory::Metastatic],
            degenerate_policy: DegeneratePolicy::Flag,
            ..Default::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("z_cutoff: -1"));
        let restored = PipelineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = PipelineConfig::from_yaml("name: demo\nz_cutoff: 3\n").unwrap();
        assert_eq!(config.name, "demo");
        assert_eq!(config.z_cutoff, ZCutoff::Threshold(3.0));
        assert!(config.include_controls_in_correlation);
        assert!(config.rank_columns);
        assert_eq!(config.sample_types, SampleTypeMap::default());
    }

    #[test]
    fn test_invalid_cutoff_rejected() {
        assert!(PipelineConfig::from_yaml("z_cutoff: -3\n").is_err());
    }
}
