//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Derive database and log locations from one data directory.
//! - Apply environment overrides before validation.
//!
//! # Invariants
//! - `data_dir` and `log.log_dir` are absolute.
//! - `log.level` is one of `trace|debug|info|warn|error`.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "tagtodo.sqlite3";
pub const LOG_DIR_NAME: &str = "logs";
pub const ENV_LOG_LEVEL: &str = "TAGTODO_LOG_LEVEL";
pub const ENV_SEED_EXAMPLES: &str = "TAGTODO_SEED_EXAMPLES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeDataDir(PathBuf),
    InvalidLogLevel(String),
    InvalidFlag { name: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDataDir(path) => write!(
                f,
                "data_dir must be an absolute path, got `{}`",
                path.display()
            ),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::InvalidFlag { name, value } => {
                write!(f, "`{name}` must be 1|true|yes|0|false|no, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Logging backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: &'static str,
    pub log_dir: PathBuf,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub log: LogConfig,
    /// Append the example tasks when the first load finds nothing.
    pub seed_examples: bool,
}

impl AppConfig {
    /// Defaults rooted at `data_dir`, without environment overrides.
    pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(data_dir));
        }
        Ok(Self {
            log: LogConfig {
                level: default_log_level(),
                log_dir: data_dir.join(LOG_DIR_NAME),
            },
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            data_dir,
            seed_examples: true,
        })
    }

    /// Defaults rooted at `data_dir`, then `TAGTODO_*` environment overrides.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_data_dir(data_dir)?;
        config.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from a variable lookup (the environment in
    /// production, a map in tests).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log.level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(flag) = lookup(ENV_SEED_EXAMPLES) {
            self.seed_examples = parse_flag(ENV_SEED_EXAMPLES, &flag)?;
        }
        Ok(self)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_LOG_LEVEL, ENV_SEED_EXAMPLES};
    use std::collections::HashMap;

    fn data_dir() -> std::path::PathBuf {
        std::env::temp_dir().join("tagtodo-config-test")
    }

    #[test]
    fn paths_derive_from_data_dir() {
        let config = AppConfig::from_data_dir(data_dir()).unwrap();
        assert_eq!(config.db_path(), data_dir().join("tagtodo.sqlite3"));
        assert_eq!(config.log.log_dir, data_dir().join("logs"));
        assert!(config.seed_examples);
    }

    #[test]
    fn relative_data_dir_is_rejected() {
        let err = AppConfig::from_data_dir("relative/dir").unwrap_err();
        assert!(matches!(err, ConfigError::RelativeDataDir(_)));
    }

    #[test]
    fn overrides_normalize_level_and_flags() {
        let vars = HashMap::from([
            (ENV_LOG_LEVEL, "WARNING".to_string()),
            (ENV_SEED_EXAMPLES, "no".to_string()),
        ]);
        let config = AppConfig::from_data_dir(data_dir())
            .unwrap()
            .with_overrides(|name| vars.get(name).cloned())
            .unwrap();
        assert_eq!(config.log.level, "warn");
        assert!(!config.seed_examples);
    }

    #[test]
    fn bad_override_values_fail() {
        let vars = HashMap::from([(ENV_SEED_EXAMPLES, "maybe".to_string())]);
        let err = AppConfig::from_data_dir(data_dir())
            .unwrap()
            .with_overrides(|name| vars.get(name).cloned())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { .. }));
    }
}
