//! Persistent settings stored as `config.yaml` in the data directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use modalbox_core::PromptOptions;

/// Error types for config file operations
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error (permission denied, missing directory, etc.)
    Io(String),
    /// Invalid YAML
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log level for both crates (debug, info, warn, error)
    pub log_level: String,
    /// Worker-thread wait limit in milliseconds; absent means unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_timeout_ms: Option<u64>,
    /// Report interrupted waits instead of treating them as no action
    pub report_interruption: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            wait_timeout_ms: None,
            report_interruption: false,
        }
    }
}

impl AppConfig {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.yaml")
    }

    /// Load the config. A missing file yields the defaults.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            ConfigError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_saphyr::from_str(&content).map_err(|e| {
            ConfigError::Parse(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load the config, falling back to defaults on any failure.
    pub fn load_or_default(data_dir: &Path) -> Self {
        Self::load(data_dir).unwrap_or_default()
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        let yaml = serde_saphyr::to_string(self)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize config: {}", e)))?;

        std::fs::create_dir_all(data_dir)
            .map_err(|e| ConfigError::Io(format!("Failed to create data directory: {}", e)))?;
        std::fs::write(Self::path(data_dir), yaml)
            .map_err(|e| ConfigError::Io(format!("Failed to write config: {}", e)))
    }

    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            wait_timeout: self.wait_timeout_ms.map(Duration::from_millis),
            report_interruption: self.report_interruption,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.prompt_options(), PromptOptions::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(AppConfig::path(dir.path()), "wait_timeout_ms: 250\n").unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.prompt_options().wait_timeout,
            Some(Duration::from_millis(250))
        );
        assert!(!config.report_interruption);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data");
        let config = AppConfig {
            log_level: "debug".to_string(),
            wait_timeout_ms: Some(1500),
            report_interruption: true,
        };
        config.save(&nested).unwrap();
        assert_eq!(AppConfig::load(&nested).unwrap(), config);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = tempdir().unwrap();
        std::fs::write(AppConfig::path(dir.path()), "wait_timeout_ms: [not, a, number]\n")
            .unwrap();

        assert!(matches!(
            AppConfig::load(dir.path()),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(AppConfig::load_or_default(dir.path()), AppConfig::default());
    }
}
