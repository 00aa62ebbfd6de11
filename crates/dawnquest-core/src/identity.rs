//! Persisted anonymous player identity.
//!
//! A player is a UUID stored in a plain text file. First run mints one;
//! later runs read it back. An unreadable or malformed file is replaced
//! with a fresh identity rather than refusing to start.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity file io failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the identity at `path`, minting and persisting a new one when
/// the file is missing or does not hold a UUID.
pub fn load_or_create(path: &Path) -> Result<PlayerId, IdentityError> {
    if let Ok(contents) = std::fs::read_to_string(path) {
        let trimmed = contents.trim();
        if Uuid::parse_str(trimmed).is_ok() {
            return Ok(PlayerId(trimmed.to_string()));
        }
        tracing::warn!(?path, "identity file is malformed, minting a new one");
    }

    let player = PlayerId::new_random();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, player.as_str())?;
    Ok(player)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_mints_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("player_id");

        let first = load_or_create(&path).unwrap();
        let second = load_or_create(&path).unwrap();
        assert_eq!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player_id");
        let id = Uuid::new_v4();
        std::fs::write(&path, format!("  {id}\n")).unwrap();

        let player = load_or_create(&path).unwrap();
        assert_eq!(player.as_str(), id.to_string());
    }

    #[test]
    fn test_garbage_file_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player_id");
        std::fs::write(&path, "not-a-uuid").unwrap();

        let player = load_or_create(&path).unwrap();
        assert!(Uuid::parse_str(player.as_str()).is_ok());
        // The replacement is durable.
        assert_eq!(load_or_create(&path).unwrap(), player);
    }
}
