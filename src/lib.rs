pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod rows;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, CorpusConfig, PipelineConfig, ReportConfig};
pub use error::{Result, UserFriendlyError, ZipRowsError};

// Core functionality re-exports
pub use extractor::{ArchiveExtractor, Workspace};
pub use generator::{CorpusGenerator, GenerationProgress};
pub use parser::{parse_document, parse_document_str, ParsedDocument};
pub use pipeline::{
    discover_archives, PipelineOrchestrator, PipelineOutcome, PipelineProgress, ResultAggregator,
    TaskFailure,
};
pub use report::{ReportPaths, ReportWriter};
pub use rows::{LevelRow, ObjectRow};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main library interface for ZipRows functionality
pub struct ZipRows {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl ZipRows {
    /// Create a new ZipRows instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create ZipRows instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Write a synthetic corpus into the working directory, with progress
    /// indication
    pub fn generate_corpus(&self, work_dir: &Path) -> Result<GenerationProgress> {
        self.output_formatter
            .start_operation("Generating synthetic corpus");

        let generation_progress = self
            .progress_manager
            .create_generation_progress(self.config.corpus.archives as u64);
        let progress_callback = {
            let pb = generation_progress.clone();
            move |progress: &GenerationProgress| {
                ui::progress::update_generation_progress(&pb, progress);
            }
        };

        let generator = CorpusGenerator::new(&self.config.corpus);
        let progress = generator.generate(work_dir, Some(&progress_callback))?;

        ui::progress::finish_progress_with_summary(
            &generation_progress,
            &format!("Wrote {} archives", progress.archives_written),
            progress.elapsed(),
        );

        self.output_formatter.info(&format!(
            "Generated {} documents across {} archives",
            progress.documents_written, progress.archives_written
        ));

        Ok(progress)
    }

    /// Run the archive pipeline over the working directory
    pub async fn process_archives(&self, work_dir: &Path) -> Result<PipelineOutcome> {
        let pool_size = self.config.effective_pool_size();
        self.output_formatter
            .start_operation(&format!("Processing archives with {} workers", pool_size));

        // Length 0 until discovery reports the real archive count.
        let archive_progress = self.progress_manager.create_archive_progress(0);
        let progress_callback = {
            let pb = archive_progress.clone();
            move |progress: &PipelineProgress| {
                ui::progress::update_pipeline_progress(&pb, progress);
            }
        };

        let orchestrator = PipelineOrchestrator::new(pool_size).with_progress(progress_callback);
        let outcome = orchestrator.run(work_dir).await?;

        ui::progress::finish_progress_with_summary(
            &archive_progress,
            &format!("Processed {} archives", outcome.successful_archives()),
            outcome.duration,
        );

        for failure in &outcome.errors {
            self.output_formatter.warning(&failure.to_string());
        }

        self.output_formatter.print_pipeline_summary(&outcome);

        Ok(outcome)
    }

    /// Write the CSV reports for a pipeline outcome. The report directory
    /// defaults to the working directory itself.
    pub fn write_reports(&self, work_dir: &Path, outcome: &PipelineOutcome) -> Result<ReportPaths> {
        let report_dir = self
            .config
            .report
            .report_dir
            .clone()
            .unwrap_or_else(|| work_dir.to_path_buf());

        let writer = ReportWriter::new(report_dir);
        let paths = writer.write_reports(&outcome.level_rows, &outcome.object_rows)?;

        self.output_formatter.success(&format!(
            "Reports written to {}",
            writer.report_dir().display()
        ));

        Ok(paths)
    }

    /// Assemble the serializable summary of a finished run
    pub fn build_summary(
        &self,
        work_dir: &Path,
        outcome: &PipelineOutcome,
        reports: Option<ReportPaths>,
    ) -> RunSummary {
        RunSummary {
            work_dir: work_dir.to_path_buf(),
            pool_size: self.config.effective_pool_size(),
            completed_at: Utc::now(),
            archives_discovered: outcome.archives_discovered,
            archives_processed: outcome.successful_archives(),
            archives_failed: outcome.errors.len(),
            level_rows: outcome.level_rows.len(),
            object_rows: outcome.object_rows.len(),
            duration: outcome.duration,
            reports,
            errors: outcome.errors.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(ZipRowsError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Get progress manager reference
    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ZipRowsError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Serializable record of one finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub work_dir: PathBuf,
    pub pool_size: usize,
    pub completed_at: DateTime<Utc>,
    pub archives_discovered: usize,
    pub archives_processed: usize,
    pub archives_failed: usize,
    pub level_rows: usize,
    pub object_rows: usize,
    pub duration: Duration,
    pub reports: Option<ReportPaths>,
    pub errors: Vec<String>,
}

/// Convenience function to process a working directory with minimal setup
pub async fn process_archives_simple(
    work_dir: &Path,
    pool_size: Option<usize>,
    verbose: bool,
) -> Result<PipelineOutcome> {
    let mut config = Config::default();
    config.pipeline.pool_size = pool_size;

    let ziprows = ZipRows::new(config, OutputMode::Human, if verbose { 1 } else { 0 }, false);

    ziprows.process_archives(work_dir).await
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Get build information
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        target: std::env::consts::ARCH.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ZipRows {} ({}) built on {} for {}",
            self.version, self.git_hash, self.build_date, self.target
        )
    }
}
