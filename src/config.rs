use crate::error::Result;
use crate::utils::constants::{
    BASE_URL, CLEAN_TRIPS_FILE, DATA_DIR, DEFAULT_CONFIG_FILE, DEFAULT_DOWNLOAD_WORKERS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TOP_N, DOWNLOAD_SUMMARY_FILE, PROCESSED_SUBDIR,
    RAW_SUBDIR,
};
use crate::utils::structure_report_path_for;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use validator::Validate;

/// Runtime settings: built-in defaults, then `bikeshare.toml`, then `BIKESHARE_*` variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    #[validate(length(min = 1))]
    pub data_dir: String,

    #[validate(url)]
    pub base_url: String,

    #[validate(range(min = 1, max = 16))]
    pub download_workers: usize,

    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_secs: u64,

    #[validate(range(min = 1, max = 1000))]
    pub top_n: usize,
}

impl PipelineConfig {
    /// An explicit `path` must exist; the default config file is optional
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_source = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let settings = Config::builder()
            .set_default("data_dir", DATA_DIR)?
            .set_default("base_url", BASE_URL)?
            .set_default("download_workers", DEFAULT_DOWNLOAD_WORKERS as i64)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?
            .set_default("top_n", DEFAULT_TOP_N as i64)?
            .add_source(file_source)
            .add_source(Environment::with_prefix("BIKESHARE").try_parsing(true))
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir().join(RAW_SUBDIR)
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir().join(PROCESSED_SUBDIR)
    }

    pub fn download_summary_path(&self) -> PathBuf {
        self.data_dir().join(DOWNLOAD_SUMMARY_FILE)
    }

    pub fn clean_trips_path(&self) -> PathBuf {
        self.processed_dir().join(CLEAN_TRIPS_FILE)
    }

    pub fn structure_report_path(&self) -> PathBuf {
        structure_report_path_for(&self.clean_trips_path())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: DATA_DIR.to_string(),
            base_url: BASE_URL.to_string(),
            download_workers: DEFAULT_DOWNLOAD_WORKERS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.raw_dir(), PathBuf::from("bicycle_data/raw"));
        assert_eq!(
            config.clean_trips_path(),
            PathBuf::from("bicycle_data/processed/clean_trips.csv")
        );
        assert_eq!(
            config.structure_report_path(),
            PathBuf::from("bicycle_data/processed/structure_report.json")
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_file_overrides_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("pipeline.toml");
        fs::write(&path, "data_dir = \"/tmp/trips\"\ndownload_workers = 5\n")?;

        let config = PipelineConfig::load(Some(&path))?;
        assert_eq!(config.data_dir, "/tmp/trips");
        assert_eq!(config.download_workers, 5);
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert_eq!(config.base_url, BASE_URL);
        Ok(())
    }

    #[test]
    fn test_out_of_range_workers_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("pipeline.toml");
        fs::write(&path, "download_workers = 64\n")?;

        let result = PipelineConfig::load(Some(&path));
        assert!(matches!(result, Err(ProcessingError::Validation(_))));
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = PipelineConfig::load(Some(Path::new("/nonexistent/pipeline.toml")));
        assert!(matches!(result, Err(ProcessingError::Config(_))));
    }
}
