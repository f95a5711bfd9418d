//! Saver configuration.
//!
//! Stored as TOML. Missing keys fall back to their defaults, so an empty
//! file is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference output buffer size for streamed local writes.
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024;

/// How a document is written to a local filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalWriteStrategy {
    /// Stream into a sibling temp file, then rename it over the target.
    #[default]
    AtomicReplace,
    /// Create or truncate the target and stream straight into it.
    ///
    /// A file created by a failed save is removed, but an existing file is
    /// left truncated.
    InPlace,
}

impl LocalWriteStrategy {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AtomicReplace => "atomic-replace",
            Self::InPlace => "in-place",
        }
    }
}

/// Settings for [`DocumentSaver`](crate::DocumentSaver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaverConfig {
    /// Output buffer size in bytes for local writes.
    pub buffer_size: usize,

    pub local_strategy: LocalWriteStrategy,

    /// Retain previous contents when overwriting managed resources.
    pub keep_history: bool,

    /// Log local I/O failures without showing them to the user.
    pub silent_io_errors: bool,

    /// How often the modal wait polls for progress and cancellation.
    pub poll_interval_ms: u64,
}

impl Default for SaverConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            local_strategy: LocalWriteStrategy::default(),
            keep_history: true,
            silent_io_errors: false,
            poll_interval_ms: 50,
        }
    }
}

/// Failure to read or parse a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl SaverConfig {
    /// Load from the default path, falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "Loaded saver config");
        Ok(config)
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be positive".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Default config file location.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "docsave", "docsave")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = SaverConfig::default();
        assert_eq!(config.buffer_size, 16384);
        assert_eq!(config.local_strategy, LocalWriteStrategy::AtomicReplace);
        assert!(config.keep_history);
        assert!(!config.silent_io_errors);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SaverConfig::from_toml("local_strategy = \"in-place\"\n").unwrap();
        assert_eq!(config.local_strategy, LocalWriteStrategy::InPlace);
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SaverConfig::from_toml("buffer_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SaverConfig::from_toml("local_strategy = \"sideways\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = SaverConfig {
            keep_history: false,
            silent_io_errors: true,
            ..SaverConfig::default()
        };
        fs::write(&path, config.to_toml()).unwrap();

        assert_eq!(SaverConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = SaverConfig::load_from(Path::new("/nonexistent/docsave.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
