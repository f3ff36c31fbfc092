//! CSV report output
//!
//! Writes the aggregated collections to semicolon-delimited report files
//! inside a report directory, creating the directory on first use.

use crate::error::Result;
use crate::rows::{LevelRow, ObjectRow};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const LEVEL_REPORT: &str = "id_to_level.csv";
pub const OBJECT_REPORT: &str = "id_to_object.csv";

/// Locations of the written report files.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPaths {
    pub levels: PathBuf,
    pub objects: PathBuf,
}

pub struct ReportWriter {
    report_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Write both reports. Empty collections still produce files with a
    /// header line, so downstream consumers always find well-formed CSV.
    pub fn write_reports(
        &self,
        levels: &[LevelRow],
        objects: &[ObjectRow],
    ) -> Result<ReportPaths> {
        fs::create_dir_all(&self.report_dir)?;

        let levels_path = self.write_report(LEVEL_REPORT, LevelRow::HEADER, levels)?;
        let objects_path = self.write_report(OBJECT_REPORT, ObjectRow::HEADER, objects)?;

        Ok(ReportPaths {
            levels: levels_path,
            objects: objects_path,
        })
    }

    fn write_report<T: Serialize>(
        &self,
        file_name: &str,
        header: [&str; 2],
        rows: &[T],
    ) -> Result<PathBuf> {
        let path = self.report_dir.join(file_name);

        // Headers are written explicitly so empty collections are not
        // emitted as zero-byte files.
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_path(&path)?;

        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(path)
    }
}
