pub mod csv_writer;

pub use csv_writer::{ReportPaths, ReportWriter, LEVEL_REPORT, OBJECT_REPORT};
