//! Pipeline runner for composing and executing a co-expression analysis.

use super::config::PipelineConfig;
use crate::assemble::{assemble_matrix, HeatmapMatrix, SortOrder};
use crate::correlate::{correlate_target, DegeneratePolicy};
use crate::data::{CorrelationSet, ExpressionTable, SampleCategory, SampleTypeMap};
use crate::error::{CoexprError, Result};
use crate::filter::{exclude_categories, filter_outliers, select_for_correlation, FilterOutcome, ZCutoff};
use crate::normalize::{log2_transform, zscore_columns};
use crate::profile::{profile_sample_types, SampleTypeCensus};
use crate::rank::{rank_columns, RankedColumn};
use crate::report::{commit_all, write_correlation_report, RunLog, StagedFile};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Builder for constructing and running co-expression analyses.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a config.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Set the project name.
    pub fn name(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    /// Correlate against `gene` instead of the first gene column.
    pub fn target_gene(mut self, gene: &str) -> Self {
        self.config.target_gene = Some(gene.to_string());
        self
    }

    pub fn z_cutoff(mut self, cutoff: ZCutoff) -> Self {
        self.config.z_cutoff = cutoff;
        self
    }

    /// Include or exclude control samples from correlation.
    pub fn include_controls(mut self, include: bool) -> Self {
        self.config.include_controls_in_correlation = include;
        self
    }

    pub fn rank_columns(mut self, enabled: bool) -> Self {
        self.config.rank_columns = enabled;
        self
    }

    /// Sort matrix rows ascending on the target gene.
    pub fn invert_sort(mut self, invert: bool) -> Self {
        self.config.invert_sort = invert;
        self
    }

    /// Apply `log2(x + 1)` before correlation.
    pub fn log2_transform(mut self, enabled: bool) -> Self {
        self.config.log2_transform = enabled;
        self
    }

    /// Remove samples of `category` before any computation.
    pub fn exclude_category(mut self, category: SampleCategory) -> Self {
        if !self.config.exclude_categories.contains(&category) {
            self.config.exclude_categories.push(category);
        }
        self
    }

    pub fn degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.config.degenerate_policy = policy;
        self
    }

    pub fn sample_types(mut self, sample_types: SampleTypeMap) -> Self {
        self.config.sample_types = sample_types;
        self
    }

    pub fn write_heatmap(mut self, enabled: bool) -> Self {
        self.config.write_heatmap = enabled;
        self
    }

    pub fn write_report(mut self, enabled: bool) -> Self {
        self.config.write_report = enabled;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> PipelineConfig {
        PipelineConfig {
            description: description.map(String::from),
            ..self.config.clone()
        }
    }

    /// Run the analysis on a validated expression table.
    ///
    /// Stages run in order: sample-type census, category exclusion, optional
    /// log2, correlation, column ranking, z-score normalization, outlier
    /// filtering and matrix assembly. Any failure aborts the run.
    pub fn run(&self, table: &ExpressionTable) -> Result<PipelineOutput> {
        let config = &self.config;
        let mut log = RunLog::new();
        log.push(format!("Project: {}", config.name));

        if table.n_samples() == 0 {
            return Err(CoexprError::EmptyData("Input table has no samples".to_string()));
        }

        let census = timed("census", || {
            profile_sample_types(table, &config.sample_types)
        })?;
        log.push(census.to_string());

        let (table, exclusion) = timed("exclude", || {
            exclude_categories(table, &config.sample_types, &config.exclude_categories)
        })?;
        if !config.exclude_categories.is_empty() {
            let names: Vec<&str> = config.exclude_categories.iter().map(|c| c.name()).collect();
            log.push(format!(
                "Dropped {} samples of excluded types ({})",
                exclusion.n_dropped(),
                names.join(", ")
            ));
        }
        if table.n_samples() == 0 {
            return Err(CoexprError::EmptyResult(format!(
                "category exclusion removed all {} samples",
                exclusion.rows_before
            )));
        }

        let table = if config.log2_transform {
            let transformed = timed("log2", || log2_transform(&table))?;
            log.push("Applied log2(x + 1) transform");
            transformed
        } else {
            table
        };

        let target_idx = table.resolve_target(config.target_gene.as_deref())?;
        let target_gene = table.gene_names()[target_idx].clone();
        log.push(format!("Target gene: {}", target_gene));

        let correlations = timed("correlate", || {
            let active = select_for_correlation(
                &table,
                &config.sample_types,
                config.include_controls_in_correlation,
            )?;
            match active.n_samples() {
                0 => {
                    return Err(CoexprError::EmptyResult(
                        "no samples left for correlation after excluding controls".to_string(),
                    ))
                }
                1 => {
                    return Err(CoexprError::EmptyResult(
                        "correlation needs at least 2 samples, 1 left".to_string(),
                    ))
                }
                _ => {}
            }
            correlate_target(&active, Some(target_gene.as_str()), config.degenerate_policy)
        })?;
        log.push(format!(
            "Computed correlation coefficients for {} genes over {} samples",
            correlations.len(),
            correlations.n_rows
        ));

        let dropped_columns: Vec<String> = correlations
            .degenerate_columns()
            .into_iter()
            .map(String::from)
            .collect();
        for column in &dropped_columns {
            log.push(format!("Dropped degenerate column {}", column));
        }

        let ranked = timed("rank", || Ok(rank_columns(&correlations, config.rank_columns)))?;
        let column_order: Vec<String> = ranked
            .iter()
            .filter(|c| c.key.is_some())
            .map(|c| c.gene_name.clone())
            .collect();

        let mut kept = Vec::with_capacity(column_order.len() + 1);
        kept.push(target_gene.clone());
        kept.extend(column_order.iter().cloned());
        let table = table.select_genes_by_name(&kept)?;

        let table = if config.z_cutoff.normalizes() {
            let normalized = timed("normalize", || zscore_columns(&table))?;
            log.push(format!("Normalized {} columns to z-scores", normalized.n_genes()));
            normalized
        } else {
            log.push("Z-score normalization disabled");
            table
        };

        let (table, filter) = match config.z_cutoff.threshold() {
            Some(z) => {
                log.push(format!("Filtering out cases with z-score > {}", z));
                timed("filter", || filter_outliers(&table, z))?
            }
            None => {
                let rows = table.n_samples();
                (table, FilterOutcome::unfiltered(rows))
            }
        };
        log.push(filter.to_string());
        if filter.rows_after == 0 {
            return Err(CoexprError::EmptyResult(format!(
                "z-score cutoff {} removed all {} samples",
                config.z_cutoff, filter.rows_before
            )));
        }

        let matrix = timed("assemble", || {
            assemble_matrix(
                &table,
                &target_gene,
                &column_order,
                &config.sample_types,
                SortOrder::from_invert(config.invert_sort),
            )
        })?;
        log.push(format!(
            "Assembled heatmap matrix: {} samples x {} columns",
            matrix.n_rows(),
            matrix.n_cols()
        ));

        Ok(PipelineOutput {
            target_gene,
            census,
            exclusion,
            correlations,
            ranked,
            column_order,
            dropped_columns,
            filter,
            matrix,
            log,
        })
    }

    /// Write the enabled artifacts of `output` to `paths`.
    ///
    /// Every file is fully written to a temporary file before any is moved
    /// into place. The run log is always written and records the other
    /// artifacts. Returns the written paths in order.
    pub fn write_artifacts(
        &self,
        output: &PipelineOutput,
        paths: &ArtifactPaths,
    ) -> Result<Vec<PathBuf>> {
        let mut log = output.log.clone();
        let mut staged = Vec::new();

        if self.config.write_report {
            staged.push(StagedFile::stage(&paths.report, |w| {
                write_correlation_report(&output.correlations, w)
            })?);
            log.push(format!("Saved correlation data to: {}", paths.report.display()));
        }
        if self.config.write_heatmap {
            staged.push(StagedFile::stage(&paths.matrix, |w| {
                output.matrix.write_tsv(w)
            })?);
            log.push(format!("Saved heatmap matrix to: {}", paths.matrix.display()));
        }
        log.push("DONE!");
        staged.push(StagedFile::stage(&paths.log, |w| log.write_to(w))?);

        let written = commit_all(staged)?;
        info!(files = written.len(), "artifacts written");
        Ok(written)
    }
}

/// Run one stage with timing and failure logging.
fn timed<T, F>(stage: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let start = Instant::now();
    info!(stage, "stage started");
    match f() {
        Ok(value) => {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            info!(stage, elapsed_ms, "stage finished");
            Ok(value)
        }
        Err(err) => {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            warn!(stage, elapsed_ms, error = %err, "stage failed");
            Err(err)
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Resolved target gene.
    pub target_gene: String,
    /// Census of the input samples.
    pub census: SampleTypeCensus,
    /// Rows removed by category exclusion.
    pub exclusion: FilterOutcome,
    /// Correlation of every gene column with the target.
    pub correlations: CorrelationSet,
    /// Non-target columns in ranked order, degenerate ones included.
    pub ranked: Vec<RankedColumn>,
    /// Matrix column order after the target.
    pub column_order: Vec<String>,
    /// Columns dropped as degenerate.
    pub dropped_columns: Vec<String>,
    /// Rows removed by the z-score cutoff.
    pub filter: FilterOutcome,
    /// Final matrix.
    pub matrix: HeatmapMatrix,
    /// Human-readable run log.
    pub log: RunLog,
}

/// Output file locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub report: PathBuf,
    pub matrix: PathBuf,
    pub log: PathBuf,
}

impl ArtifactPaths {
    /// Standard names: `{project}_{target}_correlations.txt`,
    /// `{project}_{target}_heatmap_matrix.tsv` and
    /// `{project}_{target}_analysis_log.txt` under `out_dir`.
    pub fn new<P: AsRef<Path>>(out_dir: P, project: &str, target_gene: &str) -> Self {
        let dir = out_dir.as_ref();
        let stem = format!("{}_{}", project, target_gene);
        Self {
            report: dir.join(format!("{}_correlations.txt", stem)),
            matrix: dir.join(format!("{}_heatmap_matrix.tsv", stem)),
            log: dir.join(format!("{}_analysis_log.txt", stem)),
        }
    }
}
