use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const APP_NAME: &str = "Velto";
pub const APP_TAGLINE: &str = "Verzoek. Betaal. Klaar.";

/// Keys the application persists under. Wizard snapshots are namespaced by
/// [`WIZARD_PROGRESS_PREFIX`] and never collide with these.
pub mod storage_keys {
    pub const USER: &str = "velto-user";
}

pub const WIZARD_PROGRESS_PREFIX: &str = "velto-wizard:";

const DEFAULT_AUTO_SAVE_DELAY_MS: u64 = 1000;
const DEFAULT_LOG_FILTER: &str = "velto=info";
const LOG_FILE_NAME: &str = "velto.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WizardVariant {
    #[default]
    Default,
    Compact,
    Minimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub auto_save: bool,
    pub auto_save_delay_ms: u64,
    pub show_progress: bool,
    pub show_step_numbers: bool,
    pub allow_back_navigation: bool,
    pub variant: WizardVariant,
}

impl WizardConfig {
    pub fn auto_save_delay(&self) -> Duration {
        Duration::from_millis(self.auto_save_delay_ms)
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            auto_save: true,
            auto_save_delay_ms: DEFAULT_AUTO_SAVE_DELAY_MS,
            show_progress: true,
            show_step_numbers: true,
            allow_back_navigation: true,
            variant: WizardVariant::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_data_dir)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub wizard: WizardConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_yaml(&fs::read_to_string(path)?),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log
            .file
            .clone()
            .unwrap_or_else(|| self.storage.resolved_dir().join(LOG_FILE_NAME))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("velto")
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, WizardVariant};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn defaults_match_wizard_behaviour() {
        let config = AppConfig::default();
        assert!(config.wizard.auto_save);
        assert_eq!(config.wizard.auto_save_delay(), Duration::from_millis(1000));
        assert!(config.wizard.show_progress);
        assert!(config.wizard.show_step_numbers);
        assert!(config.wizard.allow_back_navigation);
        assert_eq!(config.wizard.variant, WizardVariant::Default);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let raw = "wizard:\n  auto_save_delay_ms: 250\n  variant: minimal\nstorage:\n  dir: /tmp/velto\n";
        let config = AppConfig::from_yaml(raw).expect("parse");

        assert_eq!(config.wizard.auto_save_delay(), Duration::from_millis(250));
        assert_eq!(config.wizard.variant, WizardVariant::Minimal);
        assert!(config.wizard.show_progress);
        assert_eq!(config.storage.resolved_dir(), PathBuf::from("/tmp/velto"));
        assert_eq!(config.log_file(), PathBuf::from("/tmp/velto/velto.log"));
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::from_yaml("  \n").expect("parse"), AppConfig::default());
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(AppConfig::from_yaml("wizard:\n  variant: fancy\n").is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.yaml");
        assert!(AppConfig::load(Some(&missing)).is_err());
        assert_eq!(AppConfig::load(None).expect("defaults"), AppConfig::default());
    }
}
