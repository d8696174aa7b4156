//! Runtime configuration for the core and its hosts.
//!
//! # Responsibility
//! - Hold logging, storage and summarizer settings in one value.
//! - Overlay `QUICKNOTE_*` environment variables on the defaults.
//!
//! # Invariants
//! - Defaults reproduce reference behavior (1500 ms summary delay).
//! - Malformed values are rejected, never silently replaced.

use crate::logging::default_log_level;
use crate::summarize::DEFAULT_SUMMARY_DELAY;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_LOG_LEVEL: &str = "QUICKNOTE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "QUICKNOTE_LOG_DIR";
pub const ENV_DB_PATH: &str = "QUICKNOTE_DB_PATH";
pub const ENV_SUMMARY_DELAY_MS: &str = "QUICKNOTE_SUMMARY_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings shared by the CLI and embedding hosts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rotated log files. `None` disables file logs.
    pub log_dir: Option<PathBuf>,
    /// SQLite database file. `None` selects an in-memory database.
    pub database_path: Option<PathBuf>,
    pub summary_delay_ms: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            database_path: None,
            summary_delay_ms: u64::try_from(DEFAULT_SUMMARY_DELAY.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl CoreConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlays values returned by `lookup` for each `QUICKNOTE_*` key.
    ///
    /// Blank values are treated as unset.
    pub fn overlay(
        mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key| lookup(key).filter(|value: &String| !value.trim().is_empty());

        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.log_level = level.trim().to_string();
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(path) = get(ENV_DB_PATH) {
            self.database_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(delay) = get(ENV_SUMMARY_DELAY_MS) {
            self.summary_delay_ms =
                delay
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_SUMMARY_DELAY_MS,
                        value: delay.clone(),
                    })?;
        }
        Ok(self)
    }

    pub fn summary_delay(&self) -> Duration {
        Duration::from_millis(self.summary_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DB_PATH, ENV_SUMMARY_DELAY_MS};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (*key, (*value).to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_reference_summary_delay() {
        let config = CoreConfig::default();
        assert_eq!(config.summary_delay(), Duration::from_millis(1500));
        assert!(config.database_path.is_none());
    }

    #[test]
    fn overlay_applies_values_and_skips_blanks() {
        let config = CoreConfig::default()
            .overlay(lookup_from(&[
                (ENV_DB_PATH, " /tmp/notes.db "),
                (ENV_SUMMARY_DELAY_MS, ""),
            ]))
            .unwrap();
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/notes.db")));
        assert_eq!(config.summary_delay_ms, 1500);
    }

    #[test]
    fn overlay_rejects_non_numeric_delay() {
        let err = CoreConfig::default()
            .overlay(lookup_from(&[(ENV_SUMMARY_DELAY_MS, "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_SUMMARY_DELAY_MS,
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn config_deserializes_with_partial_fields() {
        let config: CoreConfig =
            serde_json::from_str(r#"{"summary_delay_ms": 0, "log_level": "warn"}"#).unwrap();
        assert_eq!(config.summary_delay(), Duration::ZERO);
        assert_eq!(config.log_level, "warn");
        assert!(config.log_dir.is_none());
    }
}
