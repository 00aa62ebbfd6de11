//! Engine configuration, loaded from a TOML file.
//!
//! Every field has a default, so a missing file or an empty table yields
//! a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::outbox::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding local snapshots.
    pub data_dir: PathBuf,
    /// File holding the persisted player identity.
    pub identity_file: PathBuf,
    pub outbox: OutboxConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboxConfig {
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("dawnquest-data");
        Self {
            identity_file: data_dir.join("player_id"),
            data_dir,
            outbox: OutboxConfig::default(),
        }
    }
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_backoff_ms: 250,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),
}

impl EngineConfig {
    /// Load from `path`, falling back to defaults when the file is
    /// absent. A present-but-malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        Ok(toml::from_str(&contents)?)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.outbox.retry_attempts,
            backoff: Duration::from_millis(self.outbox.retry_backoff_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_file_default_fills() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/tmp/dq\"\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/dq"));
        assert_eq!(config.outbox, OutboxConfig::default());
    }

    #[test]
    fn test_outbox_table_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[outbox]\nretry_attempts = 7\nretry_backoff_ms = 10\n",
        )
        .unwrap();

        let config = EngineConfig::load(&path).unwrap();
        let policy = config.retry_policy();
        assert_eq!(policy.attempts, 7);
        assert_eq!(policy.backoff, Duration::from_millis(10));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = [oops").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
