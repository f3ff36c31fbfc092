//! Archive processing pipeline
//!
//! Discovers the ZIP archives in a working directory and runs one task per
//! archive on a bounded worker pool. Each task extracts its archive into an
//! isolated workspace, parses every document inside, and commits the parsed
//! rows to the shared aggregator as one batch. A failing archive surfaces
//! in the outcome's error list and never blocks the other archives.

use crate::error::{Result, ZipRowsError};
use crate::extractor::ArchiveExtractor;
use crate::parser::parse_document;
use crate::pipeline::aggregator::ResultAggregator;
use crate::rows::{LevelRow, ObjectRow};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use walkdir::WalkDir;

/// Entries with this extension are treated as archives.
const ARCHIVE_EXTENSION: &str = "zip";

/// One archive that reached a terminal failure, with the error that ended
/// its task. The ordering follows archive discovery order.
#[derive(Debug)]
pub struct TaskFailure {
    pub archive: PathBuf,
    pub error: ZipRowsError,
}

impl std::fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.archive.display(), self.error)
    }
}

/// Everything one run produces: the two aggregated collections, the
/// per-archive failures, and run-level bookkeeping.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub level_rows: Vec<LevelRow>,
    pub object_rows: Vec<ObjectRow>,
    pub errors: Vec<TaskFailure>,
    pub archives_discovered: usize,
    pub duration: Duration,
}

impl PipelineOutcome {
    /// True when every discovered archive was processed successfully.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn successful_archives(&self) -> usize {
        self.archives_discovered - self.errors.len()
    }
}

/// Snapshot handed to the progress callback after each archive finishes.
#[derive(Debug, Clone)]
pub struct PipelineProgress {
    pub total_archives: usize,
    pub completed_archives: usize,
    pub failed_archives: usize,
    pub current_archive: String,
}

pub struct PipelineOrchestrator {
    pool_size: usize,
    progress_callback: Option<Box<dyn Fn(&PipelineProgress) + Send + Sync>>,
}

impl PipelineOrchestrator {
    /// Create an orchestrator whose worker pool admits `pool_size`
    /// concurrently running tasks. Size 1 serializes the archives.
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            progress_callback: None,
        }
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&PipelineProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    /// Process every archive under `work_dir` and aggregate the results.
    ///
    /// One task is scheduled per archive; at most `pool_size` run at a
    /// time. Every task reaches a terminal state before this returns:
    /// its rows land in the collections, or its error lands in
    /// `PipelineOutcome::errors` (in discovery order). Partial results are
    /// the contract: a non-empty error list still comes with the rows of
    /// every archive that succeeded.
    ///
    /// # Errors
    ///
    /// Returns `ZipRowsError::Config` for a zero pool size and
    /// `ZipRowsError::WorkDir` when `work_dir` is missing or not a
    /// directory. Both are checked before any task is scheduled;
    /// per-archive failures never surface here.
    pub async fn run(&self, work_dir: &Path) -> Result<PipelineOutcome> {
        let start_time = Instant::now();

        if self.pool_size == 0 {
            return Err(ZipRowsError::Config {
                message: "pool size must be at least 1".to_string(),
            });
        }

        let archives = discover_archives(work_dir)?;
        let total_archives = archives.len();

        let aggregator = Arc::new(ResultAggregator::new());
        let semaphore = Arc::new(Semaphore::new(self.pool_size));

        let mut handles = Vec::with_capacity(total_archives);
        for archive in archives {
            let semaphore = Arc::clone(&semaphore);
            let aggregator = Arc::clone(&aggregator);
            let task_work_dir = work_dir.to_path_buf();
            let task_archive = archive.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ZipRowsError::extraction(&task_archive, e))?;

                let blocking_archive = task_archive.clone();
                match tokio::task::spawn_blocking(move || {
                    process_archive(&blocking_archive, &task_work_dir, &aggregator)
                })
                .await
                {
                    Ok(result) => result,
                    // The blocking body panicked; record it as this
                    // archive's failure instead of tearing down the run.
                    Err(join_error) => Err(ZipRowsError::extraction(&task_archive, join_error)),
                }
            });

            handles.push((archive, handle));
        }

        let mut errors = Vec::new();
        let mut completed_archives = 0;

        for (archive, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(ZipRowsError::extraction(&archive, join_error)),
            };
            completed_archives += 1;

            if let Err(error) = result {
                errors.push(TaskFailure {
                    archive: archive.clone(),
                    error,
                });
            }

            if let Some(ref callback) = self.progress_callback {
                callback(&PipelineProgress {
                    total_archives,
                    completed_archives,
                    failed_archives: errors.len(),
                    current_archive: display_name(&archive),
                });
            }
        }

        let (level_rows, object_rows) = aggregator.take_results();

        Ok(PipelineOutcome {
            level_rows,
            object_rows,
            errors,
            archives_discovered: total_archives,
            duration: start_time.elapsed(),
        })
    }
}

/// Blocking task body: extract, parse every document, commit one batch.
///
/// The merge happens while the workspace guard is still alive; the guard
/// drops right after (or during the error return), removing the extraction
/// directory on every exit path. A parse failure aborts the whole archive
/// before anything is merged, so a failed archive contributes no rows.
fn process_archive(
    archive: &Path,
    work_dir: &Path,
    aggregator: &ResultAggregator,
) -> Result<()> {
    let (workspace, documents) = ArchiveExtractor::new().extract(archive, work_dir)?;

    let mut level_rows = Vec::with_capacity(documents.len());
    let mut object_rows = Vec::new();

    for document in &documents {
        let parsed = parse_document(document)?;
        level_rows.push(parsed.level_row());
        object_rows.extend(parsed.object_rows());
    }

    aggregator.merge(level_rows, object_rows);
    drop(workspace);

    Ok(())
}

/// List the archives directly under `work_dir`, in the order the
/// filesystem reports them. No sorting: tasks impose no cross-archive
/// ordering anyway.
///
/// # Errors
///
/// Returns `ZipRowsError::WorkDir` when `work_dir` is missing or not a
/// directory.
pub fn discover_archives(work_dir: &Path) -> Result<Vec<PathBuf>> {
    if !work_dir.is_dir() {
        return Err(ZipRowsError::WorkDir {
            path: work_dir.display().to_string(),
        });
    }

    let mut archives = Vec::new();

    for entry in WalkDir::new(work_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();

        if entry.file_type().is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(ARCHIVE_EXTENSION)
        {
            archives.push(path.to_path_buf());
        }
    }

    Ok(archives)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
