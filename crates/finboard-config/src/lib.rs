//! Configuration management for finboard
//!
//! This module handles loading, validation, and management of
//! finboard configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the directory holding the ledger export
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Ledger file name (CSV export of the spreadsheet)
    #[serde(default = "default_main_file")]
    pub main_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            main_file: default_main_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_main_file() -> String {
    "finances.csv".to_string()
}

/// Scoring settings
///
/// Category-name prefixes that identify brokerage accounts among
/// saving rows. Matching is case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Prefixes of tax-advantaged equity accounts (e.g. "PEA")
    #[serde(default = "default_tax_advantaged_prefixes")]
    pub tax_advantaged_prefixes: Vec<String>,
    /// Prefixes of standard brokerage accounts (e.g. "CTO")
    #[serde(default = "default_standard_brokerage_prefixes")]
    pub standard_brokerage_prefixes: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tax_advantaged_prefixes: default_tax_advantaged_prefixes(),
            standard_brokerage_prefixes: default_standard_brokerage_prefixes(),
        }
    }
}

fn default_tax_advantaged_prefixes() -> Vec<String> {
    vec!["PEA".to_string()]
}

fn default_standard_brokerage_prefixes() -> Vec<String> {
    vec!["CTO".to_string()]
}

/// Statistics settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatisticsConfig {
    /// Standard deviation estimator
    #[serde(default)]
    pub std_dev: StdDevMode,
}

/// Standard deviation estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StdDevMode {
    /// Divide by n - 1
    #[default]
    Sample,
    /// Divide by n
    Population,
}

impl std::str::FromStr for StdDevMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sample" => Ok(StdDevMode::Sample),
            "population" => Ok(StdDevMode::Population),
            _ => Err(format!("Invalid std-dev mode: {}", s)),
        }
    }
}

impl std::fmt::Display for StdDevMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StdDevMode::Sample => write!(f, "sample"),
            StdDevMode::Population => write!(f, "population"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Scoring settings
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Statistics settings
    #[serde(default)]
    pub statistics: StatisticsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::IoError)?;

        let config = Self::from_yaml(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|_| ConfigError::InvalidYaml)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.data.main_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "data.main_file".to_string(),
            });
        }

        let prefixes = self.scoring.tax_advantaged_prefixes.iter()
            .chain(self.scoring.standard_brokerage_prefixes.iter());
        for prefix in prefixes {
            if prefix.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "scoring".to_string(),
                    reason: "Brokerage prefixes must not be empty strings".to_string(),
                });
            }
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the ledger file
    pub fn ledger_path(&self) -> PathBuf {
        self.data.path.join(&self.data.main_file)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.data.main_file, "finances.csv");
        assert_eq!(config.scoring.tax_advantaged_prefixes, vec!["PEA".to_string()]);
        assert_eq!(config.scoring.standard_brokerage_prefixes, vec!["CTO".to_string()]);
        assert_eq!(config.statistics.std_dev, StdDevMode::Sample);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.statistics.std_dev, StdDevMode::Sample);
    }

    #[test]
    fn test_invalid_port() {
        let config = Config::from_yaml("server:\n  port: 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), error::ConfigErrorCode::InvalidValue);
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let config = Config::from_yaml("scoring:\n  tax_advantaged_prefixes: [\"\"]\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = Config::from_yaml("logging:\n  level: loud\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [unclosed").unwrap_err();
        assert_eq!(err.code(), error::ConfigErrorCode::InvalidYaml);
    }

    #[test]
    fn test_std_dev_mode_from_str() {
        assert_eq!("sample".parse::<StdDevMode>().unwrap(), StdDevMode::Sample);
        assert_eq!("Population".parse::<StdDevMode>().unwrap(), StdDevMode::Population);
        assert!("median".parse::<StdDevMode>().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(PathBuf::from("/nonexistent/finboard.yaml")).unwrap_err();
        assert_eq!(err.code(), error::ConfigErrorCode::FileNotFound);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data:\n  path: /srv/ledger\n  main_file: budget.csv").unwrap();

        let config = Config::load(file.path().to_path_buf()).unwrap();
        assert_eq!(config.ledger_path(), PathBuf::from("/srv/ledger/budget.csv"));
    }
}
