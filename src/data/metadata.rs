//! Per-sample categorical metadata.

use crate::error::{CoexprError, Result};
use serde::{Deserialize, Serialize};

/// Column holding the patient / sample identifier.
pub const PATIENT_ID: &str = "PatientID";
/// Legacy spelling of [`PATIENT_ID`] written by the aggregation scripts.
pub const PATIENT_ID_ALIAS: &str = "PtID";
/// Column holding the clinical tumor stage label.
pub const TUMOR_STAGE: &str = "TumorStage";
/// Column holding the tissue-source sample type label.
pub const SAMPLE_TYPE: &str = "SampleType";

/// Check whether a column name is one of the reserved metadata columns.
pub fn is_metadata_column(name: &str) -> bool {
    matches!(name, PATIENT_ID | PATIENT_ID_ALIAS | TUMOR_STAGE | SAMPLE_TYPE)
}

/// Metadata columns for every sample, parallel to the expression rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMetadata {
    patient_ids: Vec<String>,
    tumor_stages: Vec<String>,
    sample_types: Vec<String>,
}

impl SampleMetadata {
    /// Create metadata from three equally long columns.
    pub fn new(
        patient_ids: Vec<String>,
        tumor_stages: Vec<String>,
        sample_types: Vec<String>,
    ) -> Result<Self> {
        let n = patient_ids.len();
        for len in [tumor_stages.len(), sample_types.len()] {
            if len != n {
                return Err(CoexprError::DimensionMismatch {
                    expected: n,
                    actual: len,
                });
            }
        }
        Ok(Self {
            patient_ids,
            tumor_stages,
            sample_types,
        })
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.patient_ids.len()
    }

    /// Check if there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patient_ids.is_empty()
    }

    #[inline]
    pub fn patient_ids(&self) -> &[String] {
        &self.patient_ids
    }

    #[inline]
    pub fn tumor_stages(&self) -> &[String] {
        &self.tumor_stages
    }

    #[inline]
    pub fn sample_types(&self) -> &[String] {
        &self.sample_types
    }

    /// Keep only the given rows, in the given order.
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        let pick = |col: &[String]| -> Result<Vec<String>> {
            indices
                .iter()
                .map(|&i| {
                    col.get(i).cloned().ok_or_else(|| {
                        CoexprError::InvalidParameter(format!("Row index {} out of bounds", i))
                    })
                })
                .collect()
        };
        Ok(Self {
            patient_ids: pick(&self.patient_ids)?,
            tumor_stages: pick(&self.tumor_stages)?,
            sample_types: pick(&self.sample_types)?,
        })
    }
}

/// Map a tumor stage label to its numeric stage.
///
/// Sub-stages collapse onto their parent (`stage iiib` → 3). Unstaged,
/// unreported and unrecognized labels map to 0.
pub fn tumor_stage_number(label: &str) -> u8 {
    let label = label.trim().to_ascii_lowercase();
    let Some(roman) = label.strip_prefix("stage ") else {
        return 0;
    };
    let roman = roman.trim_end_matches(|c: char| matches!(c, 'a' | 'b' | 'c'));
    match roman {
        "i" => 1,
        "ii" => 2,
        "iii" => 3,
        "iv" => 4,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_length_mismatch() {
        let result = SampleMetadata::new(
            strings(&["P1", "P2"]),
            strings(&["stage i"]),
            strings(&["01", "01"]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_subset_rows() {
        let meta = SampleMetadata::new(
            strings(&["P1", "P2", "P3"]),
            strings(&["stage i", "stage ii", "na"]),
            strings(&["01", "11", "06"]),
        )
        .unwrap();

        let subset = meta.subset_rows(&[2, 0]).unwrap();
        assert_eq!(subset.patient_ids(), &["P3", "P1"]);
        assert_eq!(subset.sample_types(), &["06", "01"]);
        assert!(meta.subset_rows(&[5]).is_err());
    }

    #[test]
    fn test_tumor_stage_number() {
        assert_eq!(tumor_stage_number("stage i"), 1);
        assert_eq!(tumor_stage_number("stage ia"), 1);
        assert_eq!(tumor_stage_number("stage iib"), 2);
        assert_eq!(tumor_stage_number("stage iiic"), 3);
        assert_eq!(tumor_stage_number("Stage IV"), 4);
        assert_eq!(tumor_stage_number("stage x"), 0);
        assert_eq!(tumor_stage_number("not reported"), 0);
        assert_eq!(tumor_stage_number("na"), 0);
    }

    #[test]
    fn test_reserved_names() {
        assert!(is_metadata_column("PatientID"));
        assert!(is_metadata_column("PtID"));
        assert!(is_metadata_column("SampleType"));
        assert!(!is_metadata_column("DAB2"));
    }
}
