use crate::generator::GenerationProgress;
use crate::pipeline::PipelineProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    pub fn create_archive_progress(&self, total_archives: u64) -> ProgressBar {
        self.archive_bar(total_archives, "Processing archives...")
    }

    pub fn create_generation_progress(&self, total_archives: u64) -> ProgressBar {
        self.archive_bar(total_archives, "Generating archives...")
    }

    /// Both operations count archives, so they share one bar layout.
    fn archive_bar(&self, total_archives: u64, message: &'static str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_archives));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>4}/{len:4} archives {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

// Helper functions for updating progress bars based on application events
pub fn update_pipeline_progress(pb: &ProgressBar, progress: &PipelineProgress) {
    // The archive count is only known once discovery finishes, so the
    // length is refreshed on every update.
    pb.set_length(progress.total_archives as u64);
    pb.set_position(progress.completed_archives as u64);

    if progress.failed_archives > 0 {
        pb.set_message(format!(
            "{} ({} failed)",
            progress.current_archive, progress.failed_archives
        ));
    } else {
        pb.set_message(progress.current_archive.clone());
    }
}

pub fn update_generation_progress(pb: &ProgressBar, progress: &GenerationProgress) {
    pb.set_position(progress.archives_written as u64);

    if let Some(ref current_archive) = progress.current_archive {
        pb.set_message(format!("Wrote {}", current_archive));
    } else {
        pb.set_message("Generating archives...".to_string());
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_manager_creation() {
        let manager = ProgressManager::new(true);
        assert!(manager.is_enabled());

        let disabled_manager = ProgressManager::new(false);
        assert!(!disabled_manager.is_enabled());
    }

    #[test]
    fn test_disabled_progress_bars() {
        let manager = ProgressManager::new(false);

        let archive_pb = manager.create_archive_progress(10);
        assert!(archive_pb.is_hidden());

        let generation_pb = manager.create_generation_progress(10);
        assert!(generation_pb.is_hidden());
    }

    #[test]
    fn test_update_pipeline_progress() {
        let manager = ProgressManager::new(false);
        let pb = manager.create_archive_progress(0);

        update_pipeline_progress(
            &pb,
            &PipelineProgress {
                total_archives: 5,
                completed_archives: 2,
                failed_archives: 1,
                current_archive: "002.zip".to_string(),
            },
        );

        assert_eq!(pb.length(), Some(5));
        assert_eq!(pb.position(), 2);
    }

    #[test]
    fn test_update_generation_progress() {
        let manager = ProgressManager::new(false);
        let pb = manager.create_generation_progress(4);

        let mut progress = GenerationProgress::new(4);
        progress.update_archive("000.zip".to_string(), 10);
        update_generation_progress(&pb, &progress);

        assert_eq!(pb.position(), 1);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "61m 1s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }
}
