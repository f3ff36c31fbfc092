use clap::Parser;
use std::path::Path;
use std::process;
use ziprows::{Cli, OutputFormatter, OutputMode, UserFriendlyError, ZipRows, ZipRowsError};

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // clap requires the argument unless --generate-config is set
    let work_dir = match cli.work_dir.clone() {
        Some(dir) => dir,
        None => {
            eprintln!("error: a working directory is required");
            return 1;
        }
    };

    // Create ZipRows instance
    let ziprows = match ZipRows::from_cli(&cli) {
        Ok(ziprows) => ziprows,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    // Handle dry run mode
    if cli.dry_run {
        return handle_dry_run(&cli, &work_dir, &ziprows);
    }

    // Optionally generate a corpus before processing
    if cli.generate {
        if let Err(e) = ziprows.generate_corpus(&work_dir) {
            ziprows.handle_error(&e);
            return 1;
        }
    }

    // Execute main pipeline workflow
    match ziprows.process_archives(&work_dir).await {
        Ok(outcome) => {
            let reports = match ziprows.write_reports(&work_dir, &outcome) {
                Ok(paths) => Some(paths),
                Err(e) => {
                    ziprows.handle_error(&e);
                    return 1;
                }
            };

            let summary = ziprows.build_summary(&work_dir, &outcome, reports);
            ziprows.output_formatter().print_run_summary(&summary);

            // Return appropriate exit code
            if outcome.is_clean() {
                0 // Success
            } else {
                2 // Success with failed archives
            }
        }
        Err(e) => {
            ziprows.handle_error(&e);

            // Map error types to appropriate exit codes
            match e {
                ZipRowsError::WorkDir { .. } => 3,
                ZipRowsError::Config { .. } => 4,
                _ => 1, // General error
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "ziprows.toml".to_string());

    match ZipRows::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  ziprows <work-dir> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, work_dir: &Path, ziprows: &ZipRows) -> i32 {
    let formatter = ziprows.output_formatter();

    formatter.info("DRY RUN MODE - No archives will be processed");
    formatter.print_separator();

    let archives = match ziprows::discover_archives(work_dir) {
        Ok(archives) => archives,
        Err(e) => {
            formatter.error(&format!(
                "Cannot scan working directory: {}",
                e.user_message()
            ));
            return 1;
        }
    };

    // Display configuration that would be used
    formatter.info("Configuration that would be used:");
    let config = ziprows.config();

    println!("  Working directory: {}", work_dir.display());
    println!("  Worker pool size:  {}", config.effective_pool_size());
    match config.report.report_dir {
        Some(ref report_dir) => println!("  Report directory:  {}", report_dir.display()),
        None => println!("  Report directory:  {}", work_dir.display()),
    }

    if cli.generate {
        println!(
            "  Corpus to generate: {} archives with {} documents each",
            config.corpus.archives, config.corpus.documents_per_archive
        );
    }

    formatter.print_separator();

    formatter.info(&format!("Archives found: {}", archives.len()));
    for archive in &archives {
        println!("  {}", archive.display());
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to process the archives");

    0
}

fn print_startup_error(error: &ZipRowsError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "ziprows",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[corpus]"));
    }

    #[test]
    fn test_dry_run_mode() {
        let temp_dir = TempDir::new().unwrap();
        // Dry run only lists archives, so an empty file is enough.
        fs::write(temp_dir.path().join("sample.zip"), b"").unwrap();

        let cli = Cli::try_parse_from([
            "ziprows",
            temp_dir.path().to_str().unwrap(),
            "--quiet",
            "--dry-run",
        ])
        .unwrap();
        let ziprows = ZipRows::from_cli(&cli).unwrap();

        let exit_code = handle_dry_run(&cli, temp_dir.path(), &ziprows);
        assert_eq!(exit_code, 0);
    }

    #[test]
    fn test_dry_run_with_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let cli = Cli::try_parse_from([
            "ziprows",
            missing.to_str().unwrap(),
            "--quiet",
            "--dry-run",
        ])
        .unwrap();
        let ziprows = ZipRows::from_cli(&cli).unwrap();

        let exit_code = handle_dry_run(&cli, &missing, &ziprows);
        assert_eq!(exit_code, 1);
    }
}
