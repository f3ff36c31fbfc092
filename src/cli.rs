use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ziprows")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aggregate XML document rows from ZIP archives")]
#[command(
    long_about = "ZipRows scans a working directory for ZIP archives, extracts each one into \
                       an isolated workspace, parses the XML documents inside, and aggregates \
                       their rows into combined CSV reports."
)]
#[command(before_help = "📦 ZipRows - Archive Aggregation Pipeline")]
#[command(after_help = "EXAMPLES:\n  \
    ziprows ./corpus\n  \
    ziprows ./corpus --pool-size 8 --verbose\n  \
    ziprows ./corpus --generate --archives 50 --documents 100\n  \
    ziprows ./corpus --report-dir reports --output-format json\n\n\
    For more information, visit: https://github.com/user/ziprows")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Directory containing the ZIP archives to process
    #[arg(required_unless_present = "generate_config")]
    pub work_dir: Option<PathBuf>,

    /// Number of archive workers running at once
    #[arg(short, long, value_parser = parse_pool_size)]
    pub pool_size: Option<usize>,

    /// Generate a synthetic corpus into the working directory first
    #[arg(short, long)]
    pub generate: bool,

    /// Number of archives to generate
    #[arg(long, requires = "generate")]
    pub archives: Option<usize>,

    /// Number of documents per generated archive
    #[arg(long, requires = "generate")]
    pub documents: Option<usize>,

    /// Directory for the CSV reports (defaults to the working directory)
    #[arg(short, long)]
    pub report_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be processed without executing)
    #[arg(long, help = "List the archives that would be processed without touching them")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_pool_size(self.pool_size)
            .with_archives(self.archives)
            .with_documents(self.documents)
            .with_report_dir(self.report_dir.clone())
    }

    pub fn should_use_colors(&self) -> bool {
        !self.quiet && console::Term::stdout().features().colors_supported()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn parse_pool_size(s: &str) -> std::result::Result<usize, String> {
    let size: usize = s
        .parse()
        .map_err(|_| format!("Invalid pool size: {}", s))?;

    if size == 0 {
        return Err("Pool size must be at least 1".to_string());
    }

    Ok(size)
}
