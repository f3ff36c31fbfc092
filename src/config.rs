use crate::error::{Result, ZipRowsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub corpus: CorpusConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub pool_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub archives: usize,
    pub documents_per_archive: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub report_dir: Option<PathBuf>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            archives: 50,
            documents_per_archive: 100,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ZipRowsError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ZipRowsError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ZipRowsError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                // Try to load from default locations
                let default_paths = ["ziprows.toml", "ziprows.config.toml", ".ziprows.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                // If no config file found, use defaults
                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(pool_size) = cli_args.pool_size {
            self.pipeline.pool_size = Some(pool_size);
        }

        if let Some(archives) = cli_args.archives {
            self.corpus.archives = archives;
        }

        if let Some(documents) = cli_args.documents {
            self.corpus.documents_per_archive = documents;
        }

        if let Some(ref report_dir) = cli_args.report_dir {
            self.report.report_dir = Some(report_dir.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ZipRowsError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ZipRowsError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        // Validate worker pool size
        if self.pipeline.pool_size == Some(0) {
            return Err(ZipRowsError::Config {
                message: "Worker pool size must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Worker pool size to run with. Defaults to one worker per CPU.
    pub fn effective_pool_size(&self) -> usize {
        self.pipeline.pool_size.unwrap_or_else(num_cpus::get)
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub pool_size: Option<usize>,
    pub archives: Option<usize>,
    pub documents: Option<usize>,
    pub report_dir: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool_size(mut self, pool_size: Option<usize>) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_archives(mut self, archives: Option<usize>) -> Self {
        self.archives = archives;
        self
    }

    pub fn with_documents(mut self, documents: Option<usize>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_report_dir(mut self, report_dir: Option<PathBuf>) -> Self {
        self.report_dir = report_dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pipeline.pool_size, None);
        assert_eq!(config.corpus.archives, 50);
        assert_eq!(config.corpus.documents_per_archive, 100);
        assert_eq!(config.report.report_dir, None);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.pipeline.pool_size = Some(4);
        assert!(config.validate().is_ok());

        config.pipeline.pool_size = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_pool_size() {
        let mut config = Config::default();
        assert!(config.effective_pool_size() >= 1);

        config.pipeline.pool_size = Some(3);
        assert_eq!(config.effective_pool_size(), 3);
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.pipeline.pool_size = Some(2);
        config.corpus.archives = 7;
        let temp_file = NamedTempFile::new().unwrap();

        // Test saving
        config.save_to_file(temp_file.path()).unwrap();

        // Test loading
        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.pipeline.pool_size, Some(2));
        assert_eq!(loaded_config.corpus.archives, 7);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[pipeline]\npool_size = 4").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.pool_size, Some(4));
        assert_eq!(config.corpus.archives, 50);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_pool_size(Some(2))
            .with_archives(Some(5))
            .with_report_dir(Some(PathBuf::from("reports")));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.pipeline.pool_size, Some(2));
        assert_eq!(config.corpus.archives, 5);
        assert_eq!(config.corpus.documents_per_archive, 100);
        assert_eq!(config.report.report_dir, Some(PathBuf::from("reports")));
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(!sample.is_empty());
        assert!(sample.contains("[corpus]"));
        assert!(sample.contains("archives"));
        assert!(sample.contains("documents_per_archive"));
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("does-not-exist.toml");
        assert!(matches!(result, Err(ZipRowsError::Config { .. })));
    }
}
