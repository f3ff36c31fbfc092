//! ZIP archive extraction into per-task workspaces
//!
//! Unpacks one archive into a fresh [`Workspace`] and reports the document
//! entries found inside, in archive entry order.

use crate::error::{Result, ZipRowsError};
use crate::extractor::workspace::Workspace;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

/// Entries with this extension are documents; everything else is
/// extracted but not reported.
const DOCUMENT_EXTENSION: &str = "xml";

/// Extracts one ZIP archive at a time into an isolated workspace.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract `archive` into a fresh workspace under `work_dir`.
    ///
    /// Returns the workspace guard together with the paths of the
    /// extracted documents, in archive entry order. The caller decides how
    /// long the workspace lives; the returned paths are only valid while
    /// it does.
    ///
    /// # Errors
    ///
    /// Returns `ZipRowsError::Extraction` if the archive is missing,
    /// unreadable, or not a valid ZIP file, or if the workspace cannot be
    /// created or written.
    pub fn extract(&self, archive: &Path, work_dir: &Path) -> Result<(Workspace, Vec<PathBuf>)> {
        let workspace =
            Workspace::create_in(work_dir).map_err(|e| ZipRowsError::extraction(archive, e))?;

        let file = File::open(archive).map_err(|e| ZipRowsError::extraction(archive, e))?;
        let reader = BufReader::new(file);
        let mut zip =
            ZipArchive::new(reader).map_err(|e| ZipRowsError::extraction(archive, e))?;

        let mut documents = Vec::new();

        for i in 0..zip.len() {
            let mut entry = zip
                .by_index(i)
                .map_err(|e| ZipRowsError::extraction(archive, e))?;

            // Skip directories
            if entry.is_dir() {
                continue;
            }

            if entry.encrypted() {
                return Err(ZipRowsError::extraction(
                    archive,
                    io::Error::other("archive entry is password protected"),
                ));
            }

            let raw_name = entry.name().to_string();

            // Entry names can carry traversal components; keep only what
            // resolves inside the workspace.
            let Some(relative) = sanitize_entry_name(&raw_name) else {
                continue;
            };

            let target = workspace.path().join(&relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ZipRowsError::extraction(archive, e))?;
            }

            let mut out = File::create(&target).map_err(|e| ZipRowsError::extraction(archive, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| ZipRowsError::extraction(archive, e))?;

            if relative.extension().and_then(|ext| ext.to_str()) == Some(DOCUMENT_EXTENSION) {
                documents.push(target);
            }
        }

        Ok((workspace, documents))
    }
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitize an entry name: drop parent refs (..), current-dir refs (.),
/// root prefixes, and drive letters. Returns None if nothing normal
/// remains.
fn sanitize_entry_name(name: &str) -> Option<PathBuf> {
    let mut sanitized = PathBuf::new();

    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            sanitized.push(part);
        }
    }

    if sanitized.as_os_str().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::{FileOptions, ZipWriter};

    /// Helper: write a ZIP archive with the given entries into `dir`.
    fn create_test_archive(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<()> = FileOptions::default();

        for (entry_name, content) in entries {
            zip.start_file(*entry_name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
        path
    }

    #[test]
    fn test_extract_returns_documents_in_entry_order() {
        let dir = tempfile::tempdir().unwrap();
        let archive = create_test_archive(
            dir.path(),
            "000.zip",
            &[
                ("002.xml", "<root/>"),
                ("000.xml", "<root/>"),
                ("001.xml", "<root/>"),
            ],
        );

        let (workspace, documents) = ArchiveExtractor::new()
            .extract(&archive, dir.path())
            .unwrap();

        let names: Vec<_> = documents
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["002.xml", "000.xml", "001.xml"]);

        for document in &documents {
            assert!(document.starts_with(workspace.path()));
            assert!(document.is_file());
        }
    }

    #[test]
    fn test_extract_reports_only_documents() {
        let dir = tempfile::tempdir().unwrap();
        let archive = create_test_archive(
            dir.path(),
            "mixed.zip",
            &[("readme.txt", "notes"), ("000.xml", "<root/>")],
        );

        let (workspace, documents) = ArchiveExtractor::new()
            .extract(&archive, dir.path())
            .unwrap();

        assert_eq!(documents.len(), 1);
        assert!(documents[0].ends_with("000.xml"));
        // The non-document entry is still extracted alongside.
        assert!(workspace.path().join("readme.txt").is_file());
    }

    #[test]
    fn test_extract_uses_distinct_workspaces() {
        let dir = tempfile::tempdir().unwrap();
        let archive = create_test_archive(dir.path(), "000.zip", &[("000.xml", "<root/>")]);

        let extractor = ArchiveExtractor::new();
        let (first, _) = extractor.extract(&archive, dir.path()).unwrap();
        let (second, _) = extractor.extract(&archive, dir.path()).unwrap();

        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_zero_byte_archive_fails_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("empty.zip");
        File::create(&archive).unwrap();

        let err = ArchiveExtractor::new()
            .extract(&archive, dir.path())
            .unwrap_err();

        assert!(matches!(err, ZipRowsError::Extraction { .. }));
        assert!(err.to_string().contains("empty.zip"));
    }

    #[test]
    fn test_missing_archive_fails_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArchiveExtractor::new()
            .extract(&dir.path().join("nonexistent.zip"), dir.path())
            .unwrap_err();

        assert!(matches!(err, ZipRowsError::Extraction { .. }));
    }

    #[test]
    fn test_traversal_entry_names_stay_inside_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let archive = create_test_archive(
            dir.path(),
            "sneaky.zip",
            &[("../escape.xml", "<root/>"), ("nested/dir/deep.xml", "<root/>")],
        );

        let (workspace, documents) = ArchiveExtractor::new()
            .extract(&archive, dir.path())
            .unwrap();

        assert_eq!(documents.len(), 2);
        for document in &documents {
            assert!(document.starts_with(workspace.path()));
        }
        assert!(workspace.path().join("escape.xml").is_file());
        assert!(!dir.path().join("escape.xml").exists());
    }

    #[test]
    fn test_empty_archive_yields_no_documents() {
        let dir = tempfile::tempdir().unwrap();
        let archive = create_test_archive(dir.path(), "bare.zip", &[]);

        let (_workspace, documents) = ArchiveExtractor::new()
            .extract(&archive, dir.path())
            .unwrap();

        assert!(documents.is_empty());
    }

    #[test]
    fn test_sanitize_entry_name() {
        assert_eq!(
            sanitize_entry_name("../../etc/passwd"),
            Some(PathBuf::from("etc/passwd"))
        );
        assert_eq!(
            sanitize_entry_name("/absolute/file.xml"),
            Some(PathBuf::from("absolute/file.xml"))
        );
        assert_eq!(sanitize_entry_name(".."), None);
        assert_eq!(sanitize_entry_name(""), None);
    }
}
