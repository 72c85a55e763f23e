//! coexpr - Co-expression Analysis CLI
//!
//! Command-line interface for target-gene co-expression analysis.

use clap::{Parser, Subcommand, ValueEnum};
use coexpr::correlate::DegeneratePolicy;
use coexpr::data::{extract_targets, ExpressionTable, SampleCategory, TargetList};
use coexpr::error::Result;
use coexpr::filter::ZCutoff;
use coexpr::pipeline::{ArtifactPaths, Pipeline, PipelineConfig};
use coexpr::profile::profile_sample_types;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI-friendly sample category enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCategory {
    /// Solid normal tissue
    Normal,
    /// Primary solid tumor
    Solid,
    /// Recurrent solid tumor
    Recurrent,
    /// Metastatic tumor
    Metastatic,
}

impl From<CliCategory> for SampleCategory {
    fn from(category: CliCategory) -> Self {
        match category {
            CliCategory::Normal => SampleCategory::NormalControl,
            CliCategory::Solid => SampleCategory::SolidTumor,
            CliCategory::Recurrent => SampleCategory::RecurrentTumor,
            CliCategory::Metastatic => SampleCategory::Metastatic,
        }
    }
}

/// Target-gene co-expression analysis
#[derive(Parser)]
#[command(name = "coexpr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correlate, normalize, filter and write report / matrix / log
    Run(RunArgs),

    /// Print the sample-type and tumor-stage census of a table
    Profile {
        /// Path to expression table TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Pipeline configuration YAML supplying the sample-type table
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Extract target genes from an Ensembl-ID keyed table
    Extract {
        /// Path to expression table TSV with Ensembl ID columns
        #[arg(short, long)]
        input: PathBuf,

        /// Target list: one `<symbol> <ensembl id>` per line, gene of interest first
        #[arg(short, long)]
        targets: PathBuf,

        /// Output path for the extracted table TSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate an example pipeline configuration
    Example {
        /// Output path for example YAML
        #[arg(short, long, default_value = "example_pipeline.yaml")]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Path to expression table TSV
    #[arg(short, long)]
    input: PathBuf,

    /// Pipeline configuration YAML; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Project name used in output file names
    #[arg(short, long)]
    name: Option<String>,

    /// Target gene (default: first gene column)
    #[arg(short, long)]
    target: Option<String>,

    /// Z-score cutoff: -1 no normalization, 0 no filtering, > 0 threshold
    #[arg(short, long, allow_hyphen_values = true)]
    z_cutoff: Option<f64>,

    /// Leave control samples out of correlation
    #[arg(long)]
    exclude_controls: bool,

    /// Keep table column order instead of ranking by correlation
    #[arg(long)]
    no_rank: bool,

    /// Sort matrix rows ascending on the target gene
    #[arg(long)]
    invert_sort: bool,

    /// Apply log2(x + 1) before correlation
    #[arg(long)]
    log2: bool,

    /// Drop samples of these categories before analysis
    #[arg(long, value_enum)]
    exclude: Vec<CliCategory>,

    /// Drop constant gene columns instead of failing
    #[arg(long)]
    flag_degenerate: bool,

    /// Skip the heatmap matrix
    #[arg(long)]
    no_heatmap: bool,

    /// Skip the correlation report
    #[arg(long)]
    no_report: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Profile {
            input,
            config,
            format,
        } => cmd_profile(&input, config.as_ref(), &format),
        Commands::Extract {
            input,
            targets,
            output,
        } => cmd_extract(&input, &targets, &output),
        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load the config file if one was given, else the defaults.
fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            info!(config = %path.display(), "loading pipeline configuration");
            PipelineConfig::from_file(path)
        }
        None => Ok(PipelineConfig::default()),
    }
}

/// Merge the optional config file with explicit flags.
fn build_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = load_config(args.config.as_ref())?;

    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    if let Some(target) = &args.target {
        config.target_gene = Some(target.clone());
    }
    if let Some(z) = args.z_cutoff {
        config.z_cutoff = ZCutoff::try_from(z)?;
    }
    if args.exclude_controls {
        config.include_controls_in_correlation = false;
    }
    if args.no_rank {
        config.rank_columns = false;
    }
    if args.invert_sort {
        config.invert_sort = true;
    }
    if args.log2 {
        config.log2_transform = true;
    }
    for &category in &args.exclude {
        let category = SampleCategory::from(category);
        if !config.exclude_categories.contains(&category) {
            config.exclude_categories.push(category);
        }
    }
    if args.flag_degenerate {
        config.degenerate_policy = DegeneratePolicy::Flag;
    }
    if args.no_heatmap {
        config.write_heatmap = false;
    }
    if args.no_report {
        config.write_report = false;
    }
    Ok(config)
}

/// Run the analysis and write its artifacts
fn cmd_run(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;

    info!(input = %args.input.display(), "loading expression table");
    let table = ExpressionTable::from_tsv(&args.input)?;
    info!(
        samples = table.n_samples(),
        genes = table.n_genes(),
        "expression table loaded"
    );

    let pipeline = Pipeline::from_config(&config);
    let output = pipeline.run(&table)?;

    std::fs::create_dir_all(&args.out)?;
    let paths = ArtifactPaths::new(&args.out, &config.name, &output.target_gene);
    let written = pipeline.write_artifacts(&output, &paths)?;

    for path in &written {
        eprintln!("Wrote {}", path.display());
    }
    eprintln!(
        "Done! {} samples x {} columns in the final matrix",
        output.matrix.n_rows(),
        output.matrix.n_cols()
    );

    Ok(())
}

/// Print the sample census
fn cmd_profile(input: &PathBuf, config: Option<&PathBuf>, format: &str) -> Result<()> {
    let config = load_config(config)?;
    let table = ExpressionTable::from_tsv(input)?;
    let census = profile_sample_types(&table, &config.sample_types)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&census)?),
        "yaml" => println!("{}", serde_yaml::to_string(&census)?),
        _ => {
            println!("Sample Profile");
            println!("==============");
            println!();
            println!("Genes: {}", table.n_genes());
            println!("{}", census);
        }
    }

    Ok(())
}

/// Extract target genes and write them as a symbol-named table
fn cmd_extract(input: &PathBuf, targets: &PathBuf, output: &PathBuf) -> Result<()> {
    let list = TargetList::from_file(targets)?;
    let table = ExpressionTable::from_tsv(input)?;

    let extraction = extract_targets(&table, &list)?;
    extraction.table.to_tsv(output)?;

    eprintln!(
        "Extracted {} of {} targets to {:?}",
        extraction.table.n_genes(),
        list.entries().len(),
        output
    );
    for missing in &extraction.missing {
        eprintln!("  missing: {} ({})", missing.symbol, missing.gene_id);
    }

    Ok(())
}

/// Generate an example pipeline
fn cmd_example(output_path: &PathBuf) -> Result<()> {
    let pipeline = Pipeline::new()
        .name("TCGA-BRCA")
        .target_gene("DAB2")
        .z_cutoff(ZCutoff::Threshold(5.0))
        .exclude_category(SampleCategory::Metastatic);

    let config = pipeline.to_config(Some(
        "Correlate every target gene with DAB2 and drop samples beyond |z| = 5",
    ));
    let yaml = config.to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example pipeline to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}
