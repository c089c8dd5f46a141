//! Configuration management for flightlog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::report::ReportLayout;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "flightlog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "logbook.db";

/// Default reports directory name, under the data directory.
const REPORTS_DIR_NAME: &str = "reports";

/// Default staging directory name, under the OS temp directory.
const STAGING_DIR_NAME: &str = "flightlog-staging";

/// Default report title.
const DEFAULT_REPORT_TITLE: &str = "Flight Logbook";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables, `FLIGHTLOG_` prefixed with `__` separating
///    nesting levels, e.g. `FLIGHTLOG_REPORT__TITLE`
/// 2. TOML config file at `~/.config/flightlog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Report configuration.
    pub report: ReportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/flightlog/logbook.db`
    pub database_path: Option<PathBuf>,
    /// Directory for archived report files.
    /// Defaults to `~/.local/share/flightlog/reports`
    pub reports_dir: Option<PathBuf>,
    /// Directory for staged (not yet archived) report files.
    /// Defaults to `flightlog-staging` under the OS temp directory.
    pub staging_dir: Option<PathBuf>,
}

/// Report-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Title printed on the first page of each report.
    pub title: String,
    /// Repeat the column header band on continuation pages.
    pub repeat_header: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            repeat_header: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FLIGHTLOG_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLIGHTLOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.report.title.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "report title must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the reports directory, resolving defaults if not set.
    #[must_use]
    pub fn reports_dir(&self) -> PathBuf {
        self.storage
            .reports_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(REPORTS_DIR_NAME))
    }

    /// Get the staging directory, resolving defaults if not set.
    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        self.storage
            .staging_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(STAGING_DIR_NAME))
    }

    /// Build the report layout configured here, on top of the standard
    /// page geometry.
    #[must_use]
    pub fn report_layout(&self) -> ReportLayout {
        ReportLayout {
            title: self.report.title.clone(),
            repeat_header: self.report.repeat_header,
            ..ReportLayout::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.report.title, "Flight Logbook");
        assert!(!config.report.repeat_header);
        assert!(config.storage.database_path.is_none());
        assert!(config.storage.reports_dir.is_none());
        assert!(config.storage.staging_dir.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_title() {
        let mut config = Config::default();
        config.report.title = String::new();

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("title"));
    }

    #[test]
    fn test_validate_whitespace_title() {
        let mut config = Config::default();
        config.report.title = "   ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("logbook.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_reports_dir_default() {
        let config = Config::default();
        let path = config.reports_dir();

        assert!(path.to_string_lossy().contains("reports"));
    }

    #[test]
    fn test_staging_dir_default() {
        let config = Config::default();
        let path = config.staging_dir();

        assert!(path.to_string_lossy().contains("flightlog-staging"));
    }

    #[test]
    fn test_staging_dir_custom() {
        let mut config = Config::default();
        config.storage.staging_dir = Some(PathBuf::from("/custom/staging"));

        assert_eq!(config.staging_dir(), PathBuf::from("/custom/staging"));
    }

    #[test]
    fn test_report_layout_carries_config() {
        let mut config = Config::default();
        config.report.title = "Glider Log".to_string();
        config.report.repeat_header = true;

        let layout = config.report_layout();
        assert_eq!(layout.title, "Glider Log");
        assert!(layout.repeat_header);
        assert_eq!(layout.columns.len(), ReportLayout::default().columns.len());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("flightlog"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("flightlog"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[report]\ntitle = \"Club Logbook\"\nrepeat_header = true\n\n\
             [storage]\ndatabase_path = \"/tmp/club.db\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.report.title, "Club Logbook");
        assert!(config.report.repeat_header);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/club.db"));
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[report]\ntitle = \"\"\n").unwrap();

        assert!(Config::load_from(Some(path)).is_err());
    }

    #[test]
    fn test_storage_config_serialize() {
        let storage = StorageConfig::default();
        let json = serde_json::to_string(&storage).unwrap();
        assert!(json.contains("database_path"));
    }

    #[test]
    fn test_report_config_deserialize() {
        let json = r#"{"title": "Test Log", "repeat_header": true}"#;
        let report: ReportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(report.title, "Test Log");
        assert!(report.repeat_header);
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
