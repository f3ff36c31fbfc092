pub mod archive_extractor;
pub mod workspace;

pub use archive_extractor::ArchiveExtractor;
pub use workspace::Workspace;
