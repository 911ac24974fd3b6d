//! Configuration loading and the typed session config.
//!
//! Hosts normally embed a small YAML block (or file) controlling how
//! recording behaves. This module defines the strongly-typed struct
//! mirroring that YAML and a loader for it. Every field has a default
//! matching the recorder's plain behavior: full snapshots, unbounded
//! history, the stock archive file name.

use std::num::NonZeroU32;
use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Recording session configuration.
///
/// All fields have defaults, so an empty mapping is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Store finalized timelines as one full snapshot followed by
    /// per-step overlays instead of full snapshots throughout.
    #[serde(default)]
    pub compact_overlays: bool,

    /// Cap on snapshots retained per tracked entity; the most recent
    /// ones win. Unset means unbounded. Zero is rejected at parse time
    /// (a recorder that retains nothing records nothing).
    #[serde(default)]
    pub history_limit: Option<NonZeroU32>,

    /// Base name of each region's archive file.
    #[serde(default = "default_archive_file_name")]
    pub archive_file_name: String,
}

impl SessionConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            compact_overlays: false,
            history_limit: None,
            archive_file_name: default_archive_file_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_archive_file_name() -> String {
    vestige_archive::DEFAULT_FILE_NAME.to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_plain_recording() {
        let config = SessionConfig::default();
        assert!(!config.compact_overlays);
        assert_eq!(config.history_limit, None);
        assert_eq!(config.archive_file_name, "vestige.dat");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
compact_overlays: true
history_limit: 600
archive_file_name: "remnants.dat"
"#;
        let config = SessionConfig::parse(yaml).unwrap();
        assert!(config.compact_overlays);
        assert_eq!(config.history_limit, NonZeroU32::new(600));
        assert_eq!(config.archive_file_name, "remnants.dat");
    }

    #[test]
    fn parse_partial_yaml_fills_defaults() {
        let yaml = "compact_overlays: true\n";
        let config = SessionConfig::parse(yaml).unwrap();
        assert!(config.compact_overlays);
        assert_eq!(config.history_limit, None);
        assert_eq!(config.archive_file_name, "vestige.dat");
    }

    #[test]
    fn parse_empty_mapping_is_all_defaults() {
        let config = SessionConfig::parse("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        assert!(SessionConfig::parse("history_limit: 0\n").is_err());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(SessionConfig::parse("compact_overlays: [oops\n").is_err());
    }

    #[test]
    fn from_file_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.yaml");
        std::fs::write(&path, "history_limit: 32\n").unwrap();

        let config = SessionConfig::from_file(&path).unwrap();
        assert_eq!(config.history_limit, NonZeroU32::new(32));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SessionConfig::from_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
