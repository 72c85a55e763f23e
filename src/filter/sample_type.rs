//! Sample filtering by tissue category.

use super::outlier::FilterOutcome;
use crate::data::{ExpressionTable, SampleCategory, SampleTypeMap};
use crate::error::Result;

/// Remove every sample whose type maps to one of `categories`.
///
/// # Errors
/// `UnknownSampleType` if a sample type has no entry in `sample_types`.
pub fn exclude_categories(
    table: &ExpressionTable,
    sample_types: &SampleTypeMap,
    categories: &[SampleCategory],
) -> Result<(ExpressionTable, FilterOutcome)> {
    let resolved = sample_types.categorize(table.metadata().sample_types())?;
    let rows_before = table.n_samples();
    if categories.is_empty() {
        return Ok((table.clone(), FilterOutcome::unfiltered(rows_before)));
    }

    let (keep, drop): (Vec<usize>, Vec<usize>) =
        (0..rows_before).partition(|&i| !categories.contains(&resolved[i]));
    let dropped_row_ids = drop
        .iter()
        .map(|&i| table.metadata().patient_ids()[i].clone())
        .collect();

    let filtered = table.subset_rows(&keep)?;
    let outcome = FilterOutcome {
        rows_before,
        rows_after: filtered.n_samples(),
        dropped_row_ids,
    };
    Ok((filtered, outcome))
}

/// Rows used for correlation: all rows, or all but the control samples.
pub fn select_for_correlation(
    table: &ExpressionTable,
    sample_types: &SampleTypeMap,
    include_controls: bool,
) -> Result<ExpressionTable> {
    if include_controls {
        return Ok(table.clone());
    }
    let (selected, _) = exclude_categories(table, sample_types, &[SampleCategory::NormalControl])?;
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleMetadata;
    use crate::error::CoexprError;

    fn create_test_table(types: &[&str]) -> ExpressionTable {
        let n = types.len();
        let metadata = SampleMetadata::new(
            (1..=n).map(|i| format!("P{}", i)).collect(),
            vec!["na".to_string(); n],
            types.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap();
        ExpressionTable::from_columns(
            vec![("A".to_string(), (0..n).map(|i| i as f64).collect())],
            metadata,
        )
        .unwrap()
    }

    #[test]
    fn test_exclude_metastatic() {
        let table = create_test_table(&["01", "06", "11", "06", "02"]);
        let (filtered, outcome) =
            exclude_categories(&table, &SampleTypeMap::default(), &[SampleCategory::Metastatic])
                .unwrap();
        assert_eq!(filtered.metadata().patient_ids(), &["P1", "P3", "P5"]);
        assert_eq!(outcome.dropped_row_ids, vec!["P2", "P4"]);
        assert_eq!(outcome.rows_after, 3);
    }

    #[test]
    fn test_select_for_correlation() {
        let table = create_test_table(&["01", "11", "01"]);
        let map = SampleTypeMap::default();

        let all = select_for_correlation(&table, &map, true).unwrap();
        assert_eq!(all.n_samples(), 3);

        let tumors = select_for_correlation(&table, &map, false).unwrap();
        assert_eq!(tumors.column(0), vec![0.0, 2.0]);
    }

    #[test]
    fn test_unknown_type_fails() {
        let table = create_test_table(&["01", "99"]);
        assert!(matches!(
            exclude_categories(&table, &SampleTypeMap::default(), &[]),
            Err(CoexprError::UnknownSampleType { .. })
        ));
    }
}
