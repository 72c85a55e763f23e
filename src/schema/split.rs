//! Splitting a raw table into gene columns and metadata columns.

use crate::data::metadata::{
    is_metadata_column, PATIENT_ID, PATIENT_ID_ALIAS, SAMPLE_TYPE, TUMOR_STAGE,
};
use crate::data::{ExpressionTable, RawTable, SampleMetadata};
use crate::error::{CoexprError, Result};
use std::collections::HashSet;
use tracing::debug;

/// Split a raw table into a validated [`ExpressionTable`].
///
/// Every column that is not a reserved metadata column is a gene column and
/// must contain only finite numbers. `PatientID` (or its alias `PtID`),
/// `TumorStage` and `SampleType` are all required.
///
/// # Errors
/// * `Schema` on duplicate column names, a missing metadata column, or no
///   gene columns at all
/// * `NonNumeric` on the first unparseable gene value
pub fn split_schema(raw: &RawTable) -> Result<ExpressionTable> {
    let header = raw.header();

    let mut seen = HashSet::new();
    for name in header {
        if !seen.insert(name.as_str()) {
            return Err(CoexprError::Schema(format!("Duplicate column '{}'", name)));
        }
    }

    let patient_idx = match (raw.column_index(PATIENT_ID), raw.column_index(PATIENT_ID_ALIAS)) {
        (Some(_), Some(_)) => {
            return Err(CoexprError::Schema(format!(
                "Both '{}' and '{}' present; keep only one",
                PATIENT_ID, PATIENT_ID_ALIAS
            )))
        }
        (Some(idx), None) | (None, Some(idx)) => idx,
        (None, None) => return Err(missing(PATIENT_ID)),
    };
    let stage_idx = raw.column_index(TUMOR_STAGE).ok_or_else(|| missing(TUMOR_STAGE))?;
    let type_idx = raw.column_index(SAMPLE_TYPE).ok_or_else(|| missing(SAMPLE_TYPE))?;

    let text_column = |idx: usize| -> Vec<String> {
        raw.column(idx).map(|v| v.trim().to_string()).collect()
    };
    let metadata = SampleMetadata::new(
        text_column(patient_idx),
        text_column(stage_idx),
        text_column(type_idx),
    )?;

    let mut columns = Vec::new();
    for (col_idx, name) in header.iter().enumerate() {
        if is_metadata_column(name) {
            continue;
        }
        let values = raw
            .column(col_idx)
            .enumerate()
            .map(|(row, cell)| parse_value(name, row, cell))
            .collect::<Result<Vec<f64>>>()?;
        columns.push((name.clone(), values));
    }

    if columns.is_empty() {
        return Err(CoexprError::Schema("Table has no gene columns".to_string()));
    }

    debug!(
        n_samples = raw.n_rows(),
        n_genes = columns.len(),
        "schema split"
    );
    ExpressionTable::from_columns(columns, metadata)
}

fn missing(column: &str) -> CoexprError {
    CoexprError::Schema(format!("Required metadata column '{}' is missing", column))
}

fn parse_value(column: &str, row: usize, cell: &str) -> Result<f64> {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CoexprError::NonNumeric {
            column: column.to_string(),
            row,
            value: cell.to_string(),
        }),
    }
}
