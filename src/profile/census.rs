//! Sample counts per tissue category and tumor stage.

use crate::data::{tumor_stage_number, ExpressionTable, SampleCategory, SampleTypeMap};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Census of the samples in a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTypeCensus {
    /// Total number of samples.
    pub total: usize,
    /// Primary solid tumors.
    pub solid_tumor: usize,
    /// Metastatic samples.
    pub metastatic: usize,
    /// Recurrent solid tumors.
    pub recurrent: usize,
    /// Solid normal tissue.
    pub normal: usize,
    /// Samples per numeric tumor stage (0 = unstaged).
    pub by_stage: BTreeMap<u8, usize>,
}

impl SampleTypeCensus {
    /// Count for a single category.
    pub fn count(&self, category: SampleCategory) -> usize {
        match category {
            SampleCategory::SolidTumor => self.solid_tumor,
            SampleCategory::Metastatic => self.metastatic,
            SampleCategory::RecurrentTumor => self.recurrent,
            SampleCategory::NormalControl => self.normal,
        }
    }
}

impl std::fmt::Display for SampleTypeCensus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Total cases: {}", self.total)?;
        for category in SampleCategory::ALL {
            write!(f, "\n\t{}:{}", category.name(), self.count(category))?;
        }
        for (stage, count) in &self.by_stage {
            match stage {
                0 => write!(f, "\n\tUnstaged:{}", count)?,
                n => write!(f, "\n\tStage {}:{}", n, count)?,
            }
        }
        Ok(())
    }
}

/// Count samples per category and per tumor stage.
///
/// # Errors
/// `UnknownSampleType` if a sample type has no entry in `sample_types`.
pub fn profile_sample_types(
    table: &ExpressionTable,
    sample_types: &SampleTypeMap,
) -> Result<SampleTypeCensus> {
    let categories = sample_types.categorize(table.metadata().sample_types())?;
    let tally = |c: SampleCategory| categories.iter().filter(|&&x| x == c).count();

    let mut by_stage = BTreeMap::new();
    for stage in table.metadata().tumor_stages() {
        *by_stage.entry(tumor_stage_number(stage)).or_insert(0) += 1;
    }

    Ok(SampleTypeCensus {
        total: table.n_samples(),
        solid_tumor: tally(SampleCategory::SolidTumor),
        metastatic: tally(SampleCategory::Metastatic),
        recurrent: tally(SampleCategory::RecurrentTumor),
        normal: tally(SampleCategory::NormalControl),
        by_stage,
    })
}
