//! Sample-type labels and their display codes.

use crate::error::{CoexprError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tissue category a sample-type label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SampleCategory {
    /// Solid normal tissue, used as control.
    NormalControl,
    /// Primary solid tumor.
    SolidTumor,
    /// Recurrent solid tumor.
    RecurrentTumor,
    /// Metastatic tumor.
    Metastatic,
}

impl SampleCategory {
    /// All categories in census order.
    pub const ALL: [SampleCategory; 4] = [
        Self::SolidTumor,
        Self::Metastatic,
        Self::RecurrentTumor,
        Self::NormalControl,
    ];

    /// Human-readable name used in run logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NormalControl => "Normal Tissue",
            Self::SolidTumor => "Solid Tumor",
            Self::RecurrentTumor => "Recurrent Solid Tumor",
            Self::Metastatic => "Metastatic",
        }
    }

    /// Check if this is the control category.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::NormalControl)
    }
}

/// One row of the sample-type table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTypeEntry {
    /// Label as it appears in the `SampleType` column.
    pub label: String,
    /// Category the label belongs to.
    pub category: SampleCategory,
    /// Signed code written into the heatmap matrix.
    pub code: i32,
}

impl SampleTypeEntry {
    pub fn new(label: &str, category: SampleCategory, code: i32) -> Self {
        Self {
            label: label.to_string(),
            category,
            code,
        }
    }

    /// Check whether a raw label refers to this entry.
    ///
    /// Numeric labels compare by value, so `1` matches `01`.
    fn matches(&self, label: &str) -> bool {
        let label = label.trim();
        if self.label == label {
            return true;
        }
        match (self.label.parse::<u32>(), label.parse::<u32>()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// Total mapping from sample-type labels to categories and display codes.
///
/// The default table follows the TCGA sample-type codes: `11` normal tissue
/// (-2), `01` primary solid tumor (0), `02` recurrent solid tumor (1) and `06`
/// metastatic (2). The category names themselves are accepted as labels too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SampleTypeEntry>", into = "Vec<SampleTypeEntry>")]
pub struct SampleTypeMap {
    entries: Vec<SampleTypeEntry>,
}

impl Default for SampleTypeMap {
    fn default() -> Self {
        use SampleCategory::*;
        Self {
            entries: vec![
                SampleTypeEntry::new("11", NormalControl, -2),
                SampleTypeEntry::new("01", SolidTumor, 0),
                SampleTypeEntry::new("02", RecurrentTumor, 1),
                SampleTypeEntry::new("06", Metastatic, 2),
                SampleTypeEntry::new("NormalControl", NormalControl, -2),
                SampleTypeEntry::new("SolidTumor", SolidTumor, 0),
                SampleTypeEntry::new("RecurrentTumor", RecurrentTumor, 1),
                SampleTypeEntry::new("Metastatic", Metastatic, 2),
            ],
        }
    }
}

impl SampleTypeMap {
    /// Create a table from explicit entries. Labels must be unique.
    pub fn new(entries: Vec<SampleTypeEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(CoexprError::InvalidParameter(
                "Sample-type table must have at least one entry".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.label.trim()) {
                return Err(CoexprError::InvalidParameter(format!(
                    "Duplicate sample-type label '{}'",
                    entry.label
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[SampleTypeEntry] {
        &self.entries
    }

    /// Find the entry for a label. Exact matches win over numeric ones.
    pub fn lookup(&self, label: &str) -> Option<&SampleTypeEntry> {
        let trimmed = label.trim();
        self.entries
            .iter()
            .find(|e| e.label == trimmed)
            .or_else(|| self.entries.iter().find(|e| e.matches(trimmed)))
    }

    /// Resolve every label, failing on the first one without an entry.
    pub fn resolve<'a>(&'a self, labels: &[String]) -> Result<Vec<&'a SampleTypeEntry>> {
        labels
            .iter()
            .enumerate()
            .map(|(row, label)| {
                self.lookup(label)
                    .ok_or_else(|| CoexprError::UnknownSampleType {
                        label: label.clone(),
                        row,
                    })
            })
            .collect()
    }

    /// Category of every label.
    pub fn categorize(&self, labels: &[String]) -> Result<Vec<SampleCategory>> {
        Ok(self.resolve(labels)?.iter().map(|e| e.category).collect())
    }

    /// Display code of every label.
    pub fn encode(&self, labels: &[String]) -> Result<Vec<i32>> {
        Ok(self.resolve(labels)?.iter().map(|e| e.code).collect())
    }
}

impl TryFrom<Vec<SampleTypeEntry>> for SampleTypeMap {
    type Error = CoexprError;

    fn try_from(entries: Vec<SampleTypeEntry>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<SampleTypeMap> for Vec<SampleTypeEntry> {
    fn from(map: SampleTypeMap) -> Self {
        map.entries
    }
}
