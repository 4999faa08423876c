use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::errors::{FeedError, Result};

/// Top-level configuration read from `.taskfeed/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub taskfeed: TaskfeedSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load the configuration from `{taskfeed_dir}/config.toml`.
    pub fn load(taskfeed_dir: &Path) -> Result<Self> {
        let config_path = taskfeed_dir.join("config.toml");
        if !config_path.exists() {
            return Err(FeedError::InvalidConfig {
                detail: "config.toml not found. Run 'taskfeed init' first.".into(),
            });
        }
        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| FeedError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.taskfeed.format_version > CURRENT_FORMAT_VERSION {
            return Err(FeedError::FormatVersionTooNew {
                project_version: config.taskfeed.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }

        if config.store.data_dir.trim().is_empty() {
            return Err(FeedError::InvalidConfig {
                detail: "[store] data_dir cannot be empty".into(),
            });
        }

        Ok(config)
    }

    /// Export directory, resolved against the `.taskfeed` directory
    /// when relative.
    pub fn data_dir(&self, taskfeed_dir: &Path) -> PathBuf {
        let configured = Path::new(&self.store.data_dir);
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            taskfeed_dir.join(configured)
        }
    }
}

/// Current format version supported by this build.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// The `[taskfeed]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskfeedSection {
    pub version: String,
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
}

fn default_format_version() -> u32 {
    1
}

/// The `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// The `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Any `tracing` filter directive, e.g. `warn` or `taskfeed=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
