use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZipRowsError {
    #[error("Failed to extract archive: {archive}")]
    Extraction {
        archive: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document {document} is missing required attribute: {field}")]
    MissingField {
        document: String,
        field: &'static str,
    },

    #[error("Document {document} is not well-formed XML")]
    InvalidDocument {
        document: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Working directory is missing or not a directory: {path}")]
    WorkDir { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to write report: {0}")]
    Report(#[from] csv::Error),
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ZipRowsError {
    fn user_message(&self) -> String {
        match self {
            ZipRowsError::Extraction { archive, source } => {
                format!("Could not extract archive {}: {}", archive, source)
            }
            ZipRowsError::MissingField { document, field } => {
                format!(
                    "Document {} has no var element named \"{}\"",
                    document, field
                )
            }
            ZipRowsError::InvalidDocument { document, .. } => {
                format!("Document {} could not be read as XML", document)
            }
            ZipRowsError::WorkDir { path } => {
                format!("Working directory does not exist: {}", path)
            }
            ZipRowsError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ZipRowsError::Report(error) => {
                format!("Failed to write report: {}", error)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ZipRowsError::Extraction { .. } => Some(
                "Verify the file is a valid ZIP archive and is readable. A corrupt archive fails on its own; the rest of the run still completes.".to_string()
            ),
            ZipRowsError::MissingField { .. } => Some(
                "Every document must carry <var name=\"id\" value=\"...\"/> and <var name=\"level\" value=\"...\"/> entries.".to_string()
            ),
            ZipRowsError::InvalidDocument { .. } => Some(
                "Regenerate the corpus with --generate or remove the archive containing the malformed document.".to_string()
            ),
            ZipRowsError::WorkDir { .. } => Some(
                "Create the directory first, or point the command at an existing one (use --generate to populate it).".to_string()
            ),
            ZipRowsError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            ZipRowsError::Report(_) => Some(
                "Ensure the report directory is writable and has enough free space.".to_string()
            ),
            _ => None,
        }
    }
}

impl ZipRowsError {
    /// Wrap an extraction-phase failure with the archive it belongs to.
    pub fn extraction(
        archive: &Path,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ZipRowsError::Extraction {
            archive: archive.display().to_string(),
            source: Box::new(source),
        }
    }
}

impl From<toml::de::Error> for ZipRowsError {
    fn from(error: toml::de::Error) -> Self {
        ZipRowsError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZipRowsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = ZipRowsError::MissingField {
            document: "001.xml".to_string(),
            field: "level",
        };
        assert!(error.user_message().contains("001.xml"));
        assert!(error.user_message().contains("level"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_extraction_error_carries_source() {
        use std::error::Error;

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = ZipRowsError::Extraction {
            archive: "000.zip".to_string(),
            source: Box::new(io_error),
        };
        assert!(error.source().is_some());
        assert!(error.to_string().contains("000.zip"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("not [ valid").unwrap_err();
        let error = ZipRowsError::from(toml_error);
        assert!(matches!(error, ZipRowsError::Config { .. }));
    }
}
