//! Target gene lists and extraction of their columns from a full table.

use crate::data::ExpressionTable;
use crate::error::{CoexprError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// One gene of a target list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEntry {
    /// Display symbol, may contain spaces (`WWTR1 (TAZ)`).
    pub symbol: String,
    /// Column identifier in the full table (Ensembl gene ID).
    pub gene_id: String,
}

/// Ordered target list. The first entry is the gene of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetList {
    entries: Vec<TargetEntry>,
}

impl TargetList {
    /// Parse a target list.
    ///
    /// One gene per line: the last whitespace-separated token is the gene ID,
    /// everything before it is the symbol. Blank lines are skipped. Each
    /// symbol may appear once, since symbols become column names.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (line_no, line) in text.lines().enumerate() {
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                [] => continue,
                [_] => {
                    return Err(CoexprError::Schema(format!(
                        "Target list line {} needs a symbol and a gene ID: '{}'",
                        line_no + 1,
                        line.trim()
                    )))
                }
                [symbol @ .., gene_id] => {
                    let symbol = symbol.join(" ");
                    if let Some(first) = seen.insert(symbol.clone(), line_no + 1) {
                        return Err(CoexprError::Schema(format!(
                            "Target list line {} repeats symbol '{}' from line {}",
                            line_no + 1,
                            symbol,
                            first
                        )));
                    }
                    entries.push(TargetEntry {
                        symbol,
                        gene_id: gene_id.to_string(),
                    });
                }
            }
        }
        if entries.is_empty() {
            return Err(CoexprError::EmptyData("Target list is empty".to_string()));
        }
        Ok(Self { entries })
    }

    /// Read and parse a target list file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// All entries in list order.
    pub fn entries(&self) -> &[TargetEntry] {
        &self.entries
    }

    /// The gene of interest (first entry).
    pub fn gene_of_interest(&self) -> &TargetEntry {
        &self.entries[0]
    }
}

/// Table restricted to a target list.
#[derive(Debug, Clone)]
pub struct TargetExtraction {
    /// Target columns renamed to their symbols, gene of interest first.
    pub table: ExpressionTable,
    /// Targets whose gene ID was not present in the source table.
    pub missing: Vec<TargetEntry>,
}

/// Extract target columns from a table keyed by gene ID.
///
/// Columns are renamed to symbols and ordered gene of interest first, then
/// the remaining targets in list order. Absent targets are skipped and
/// reported; an absent gene of interest is an error.
pub fn extract_targets(table: &ExpressionTable, targets: &TargetList) -> Result<TargetExtraction> {
    let goi = targets.gene_of_interest();
    if table.gene_index(&goi.gene_id).is_none() {
        return Err(CoexprError::TargetGeneNotFound(format!(
            "{} ({})",
            goi.symbol, goi.gene_id
        )));
    }

    let mut indices = Vec::with_capacity(targets.entries().len());
    let mut symbols = Vec::with_capacity(targets.entries().len());
    let mut missing = Vec::new();
    for entry in targets.entries() {
        match table.gene_index(&entry.gene_id) {
            Some(idx) => {
                indices.push(idx);
                symbols.push(entry.symbol.clone());
            }
            None => {
                warn!(
                    gene_id = %entry.gene_id,
                    symbol = %entry.symbol,
                    "target not found in dataset"
                );
                missing.push(entry.clone());
            }
        }
    }

    let selected = table.select_genes(&indices)?;
    Ok(TargetExtraction {
        table: selected.with_gene_names(symbols)?,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleMetadata;

    fn create_full_table() -> ExpressionTable {
        let metadata = SampleMetadata::new(
            vec!["P1".to_string(), "P2".to_string()],
            vec!["na".to_string(); 2],
            vec!["01".to_string(); 2],
        )
        .unwrap();
        ExpressionTable::from_columns(
            vec![
                ("ENSG00000111640".to_string(), vec![100.0, 110.0]),
                ("ENSG00000153071".to_string(), vec![5.0, 7.0]),
                ("ENSG00000018408".to_string(), vec![3.0, 1.0]),
            ],
            metadata,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_multiword_symbol() {
        let list = TargetList::parse(
            "DAB2\tENSG00000153071\n\nWWTR1 (TAZ) ENSG00000018408\nGAPDH ENSG00000111640\n",
        )
        .unwrap();
        assert_eq!(list.entries().len(), 3);
        assert_eq!(list.gene_of_interest().symbol, "DAB2");
        assert_eq!(list.entries()[1].symbol, "WWTR1 (TAZ)");
        assert_eq!(list.entries()[1].gene_id, "ENSG00000018408");
    }

    #[test]
    fn test_parse_errors() {
        assert!(TargetList::parse("").is_err());
        assert!(TargetList::parse("DAB2\n").is_err());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let result = TargetList::parse(
            "DAB2 ENSG00000153071\nWWTR1 (TAZ) ENSG00000018408\n\nWWTR1  (TAZ) ENSG00000111640\n",
        );
        match result {
            Err(CoexprError::Schema(msg)) => {
                assert!(msg.contains("line 4"));
                assert!(msg.contains("'WWTR1 (TAZ)'"));
                assert!(msg.contains("line 2"));
            }
            other => panic!("expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_targets() {
        let table = create_full_table();
        let list = TargetList::parse(
            "DAB2 ENSG00000153071\nF2RL3 ENSG00000127533\nGAPDH ENSG00000111640\n",
        )
        .unwrap();

        let extraction = extract_targets(&table, &list).unwrap();
        assert_eq!(extraction.table.gene_names(), &["DAB2", "GAPDH"]);
        assert_eq!(extraction.table.column(0), vec![5.0, 7.0]);
        assert_eq!(extraction.missing.len(), 1);
        assert_eq!(extraction.missing[0].symbol, "F2RL3");
    }

    #[test]
    fn test_missing_gene_of_interest() {
        let table = create_full_table();
        let list = TargetList::parse("F2RL3 ENSG00000127533\nGAPDH ENSG00000111640\n").unwrap();
        assert!(matches!(
            extract_targets(&table, &list),
            Err(CoexprError::TargetGeneNotFound(_))
        ));
    }
}
