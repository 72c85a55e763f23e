//! Basic example demonstrating a co-expression run.
//!
//! This example shows how to:
//! 1. Build a synthetic expression table
//! 2. Profile its sample types
//! 3. Run the correlation / z-score pipeline
//! 4. Examine the report and matrix

use coexpr::prelude::*;

fn main() -> Result<()> {
    println!("=== Co-expression Example ===\n");

    let table = create_example_table()?;
    println!("Data dimensions:");
    println!("  Genes:   {}", table.n_genes());
    println!("  Samples: {}", table.n_samples());
    println!();

    println!("=== Sample Profile ===\n");
    let census = profile_sample_types(&table, &SampleTypeMap::default())?;
    println!("{}\n", census);

    println!("=== Running Pipeline ===\n");
    let output = Pipeline::new()
        .name("example")
        .target_gene("DAB2")
        .z_cutoff(ZCutoff::Threshold(2.0))
        .include_controls(false)
        .run(&table)?;

    println!("{}", render_correlation_report(&output.correlations));
    println!("{}\n", output.filter);

    println!("=== Heatmap Matrix (first 5 rows) ===\n");
    println!("{:<8} {}", "Patient", output.matrix.columns().join(" "));
    for (i, id) in output.matrix.row_ids().iter().take(5).enumerate() {
        let row: Vec<String> = (0..output.matrix.n_cols())
            .map(|j| format!("{:.2}", output.matrix.get(i, j)))
            .collect();
        println!("{:<8} {}", id, row.join(" "));
    }

    Ok(())
}

/// Create a small table: TGFBR2 follows DAB2, CDH1 opposes it, ACTB is noise.
fn create_example_table() -> Result<ExpressionTable> {
    let n = 24;
    let mut seed = 7u64;
    let mut noise = || -> f64 {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        ((seed >> 16) & 0x7FFF) as f64 / 32768.0 - 0.5
    };

    let dab2: Vec<f64> = (0..n).map(|i| 5.0 + 0.4 * i as f64 + noise()).collect();
    let tgfbr2: Vec<f64> = dab2.iter().map(|&x| 0.8 * x + 2.0 * noise()).collect();
    let cdh1: Vec<f64> = dab2.iter().map(|&x| 20.0 - x + 2.0 * noise()).collect();
    let actb: Vec<f64> = (0..n).map(|_| 50.0 + 4.0 * noise()).collect();

    let codes = ["01", "01", "01", "11", "06", "02"];
    let metadata = SampleMetadata::new(
        (0..n).map(|i| format!("P{:03}", i)).collect(),
        (0..n).map(|i| format!("stage {}", ["i", "ii", "iii", "iv"][i % 4])).collect(),
        (0..n).map(|i| codes[i % codes.len()].to_string()).collect(),
    )?;

    ExpressionTable::from_columns(
        vec![
            ("DAB2".to_string(), dab2),
            ("TGFBR2".to_string(), tgfbr2),
            ("CDH1".to_string(), cdh1),
            ("ACTB".to_string(), actb),
        ],
        metadata,
    )
}
