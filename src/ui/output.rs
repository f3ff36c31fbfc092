use crate::error::{UserFriendlyError, ZipRowsError};
use crate::pipeline::PipelineOutcome;
use crate::RunSummary;
use console::{style, Emoji, Term};
use serde_json;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl OutputMode {
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        }
    }
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

/// Message kinds routed through [`OutputFormatter::emit`]. Each kind knows
/// its own decoration per output mode; errors additionally go to stderr.
#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

impl MessageType {
    fn emoji(&self) -> Emoji<'static, 'static> {
        match self {
            MessageType::Success => CHECKMARK,
            MessageType::Error => CROSS,
            MessageType::Warning => WARNING,
            MessageType::Info => INFO,
        }
    }

    /// ASCII fallback used when colors are off.
    fn prefix(&self) -> &'static str {
        match self {
            MessageType::Success => "✓",
            MessageType::Error => "✗",
            MessageType::Warning => "!",
            MessageType::Info => "i",
        }
    }

    /// Tag for plain mode, and (lowercased) the JSON `level` field.
    fn tag(&self) -> &'static str {
        match self {
            MessageType::Success => "SUCCESS",
            MessageType::Error => "ERROR",
            MessageType::Warning => "WARNING",
            MessageType::Info => "INFO",
        }
    }

    fn paint<'a>(&self, text: &'a str) -> console::StyledObject<&'a str> {
        match self {
            MessageType::Success => style(text).green().bold(),
            MessageType::Error => style(text).red().bold(),
            MessageType::Warning => style(text).yellow().bold(),
            MessageType::Info => style(text).cyan(),
        }
    }

    fn is_error(&self) -> bool {
        matches!(self, MessageType::Error)
    }
}

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors =
            mode == OutputMode::Human && !quiet && Term::stdout().features().colors_supported();

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        self.emit(MessageType::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(MessageType::Error, message);
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(1) {
            self.emit(MessageType::Warning, message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            self.emit(MessageType::Info, message);
        }
    }

    pub fn debug(&self, message: &str) {
        if !self.should_show_message(2) {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("  {}", style(message).dim());
                } else {
                    println!("  DEBUG: {}", message);
                }
            }
            OutputMode::Json => self.json_line("debug", message),
            OutputMode::Plain => println!("DEBUG: {}", message),
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if !self.should_show_message(0) {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}{}", ROCKET, style(operation).bold());
                } else {
                    println!("> {}", operation);
                }
            }
            OutputMode::Json => self.json_line("operation_start", operation),
            OutputMode::Plain => println!("STARTING: {}", operation),
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &ZipRowsError) {
        self.error(&error.user_message());

        let Some(suggestion) = error.suggestion() else {
            return;
        };
        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!(
                        "{}{}",
                        INFO,
                        style(&format!("Suggestion: {}", suggestion)).cyan()
                    );
                } else {
                    println!("Suggestion: {}", suggestion);
                }
            }
            OutputMode::Json => self.json_object(&serde_json::json!({
                "type": "suggestion",
                "message": suggestion
            })),
            OutputMode::Plain => println!("SUGGESTION: {}", suggestion),
        }
    }

    // Summary and reporting
    pub fn print_pipeline_summary(&self, outcome: &PipelineOutcome) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(outcome),
            OutputMode::Json => self.print_json_summary(outcome),
            OutputMode::Plain => self.print_plain_summary(outcome),
        }
    }

    pub fn print_run_summary(&self, summary: &RunSummary) {
        match self.mode {
            OutputMode::Human => self.print_human_report(summary),
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => self.print_plain_report(summary),
        }
    }

    // Specialized output methods
    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => self.json_object(&serde_json::json!({
                "type": "header",
                "title": title
            })),
            OutputMode::Plain => println!("=== {} ===", title),
        }
    }

    pub fn print_separator(&self) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        if self.use_colors {
            println!("{}", style("─".repeat(60)).dim());
        } else {
            println!("{}", "-".repeat(60));
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn emit(&self, kind: MessageType, message: &str) {
        match self.mode {
            OutputMode::Human => {
                let line = if self.use_colors {
                    format!("{}{}", kind.emoji(), kind.paint(message))
                } else {
                    format!("{} {}", kind.prefix(), message)
                };
                if kind.is_error() {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            }
            OutputMode::Json => self.json_line(&kind.tag().to_lowercase(), message),
            OutputMode::Plain => {
                if kind.is_error() {
                    eprintln!("{}: {}", kind.tag(), message);
                } else {
                    println!("{}: {}", kind.tag(), message);
                }
            }
        }
    }

    fn json_line(&self, level: &str, message: &str) {
        self.json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    /// Highlight a value in the human summary when colors are on.
    fn accent(&self, text: String) -> String {
        if self.use_colors {
            style(text).cyan().bold().to_string()
        } else {
            text
        }
    }

    fn print_human_summary(&self, outcome: &PipelineOutcome) {
        println!();
        self.print_separator();

        if self.use_colors {
            println!(
                "{} {}",
                style("Archive processing completed!").green().bold(),
                CHECKMARK
            );
        } else {
            println!("✓ Archive processing completed!");
        }

        let archives = format!(
            "{}/{}",
            outcome.successful_archives(),
            outcome.archives_discovered
        );

        println!();
        println!("  Archives processed: {}", self.accent(archives));
        println!(
            "  Level rows:         {}",
            self.accent(outcome.level_rows.len().to_string())
        );
        println!(
            "  Object rows:        {}",
            self.accent(outcome.object_rows.len().to_string())
        );
        println!(
            "  Time taken:         {}",
            self.accent(format_duration(outcome.duration))
        );

        if !outcome.errors.is_empty() {
            println!("  Failed archives:    {}", outcome.errors.len());
        }

        self.print_separator();
    }

    fn print_json_summary(&self, outcome: &PipelineOutcome) {
        let summary = serde_json::json!({
            "type": "summary",
            "archives_discovered": outcome.archives_discovered,
            "archives_processed": outcome.successful_archives(),
            "archives_failed": outcome.errors.len(),
            "level_rows": outcome.level_rows.len(),
            "object_rows": outcome.object_rows.len(),
            "duration_ms": outcome.duration.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_plain_summary(&self, outcome: &PipelineOutcome) {
        println!("COMPLETED: Archive processing");
        println!(
            "Archives processed: {}/{}",
            outcome.successful_archives(),
            outcome.archives_discovered
        );
        println!("Level rows: {}", outcome.level_rows.len());
        println!("Object rows: {}", outcome.object_rows.len());
        println!("Duration: {:?}", outcome.duration);
        if !outcome.errors.is_empty() {
            println!("Errors: {}", outcome.errors.len());
        }
    }

    fn print_human_report(&self, summary: &RunSummary) {
        self.print_header("Run Summary");

        println!("Working directory: {}", summary.work_dir.display());
        println!("Worker pool size:  {}", summary.pool_size);
        println!(
            "Completed at:      {}",
            summary.completed_at.format("%Y-%m-%d %H:%M UTC")
        );
        println!();

        println!(
            "Archives: {} processed, {} failed",
            summary.archives_processed, summary.archives_failed
        );
        println!("Level rows:  {}", summary.level_rows);
        println!("Object rows: {}", summary.object_rows);

        if let Some(ref reports) = summary.reports {
            println!();
            println!("Reports written:");
            println!("  {}", reports.levels.display());
            println!("  {}", reports.objects.display());
        }

        if !summary.errors.is_empty() {
            println!();
            println!("Issues encountered:");
            for error in &summary.errors {
                println!("  - {}", error);
            }
        }
    }

    fn print_plain_report(&self, summary: &RunSummary) {
        println!("REPORT: Run completed");
        println!(
            "Archives: {}/{}",
            summary.archives_processed, summary.archives_discovered
        );
        println!("Level rows: {}", summary.level_rows);
        println!("Object rows: {}", summary.object_rows);
        println!("Duration: {:?}", summary.duration);

        if !summary.errors.is_empty() {
            println!("Errors: {}", summary.errors.len());
        }
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
