//! Snapshot stores: where serialized state documents live.
//!
//! Both the on-disk store and the in-memory test double speak the same
//! [`SnapshotStore`] trait, so the reconciler and the outbox never know
//! which one they are talking to. Snapshots are JSON so older and newer
//! schemas can read each other (see the serde defaults on `GameState`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::identity::PlayerId;
use crate::state::GameState;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A keyed snapshot store. `load` returning `Ok(None)` means "no
/// snapshot for this player", which is not an error.
pub trait SnapshotStore: Send + Sync {
    fn load(&self, player: &PlayerId) -> Result<Option<GameState>, StoreError>;
    fn save(&self, player: &PlayerId, state: &GameState) -> Result<(), StoreError>;
}

/// One JSON file per player under a data directory.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, player: &PlayerId) -> PathBuf {
        self.dir.join(format!("{player}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, player: &PlayerId) -> Result<Option<GameState>, StoreError> {
        let bytes = match std::fs::read(self.path(player)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, player: &PlayerId, state: &GameState) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec_pretty(state)?;
        std::fs::write(self.path(player), json)?;
        Ok(())
    }
}

/// In-memory store with failure injection, standing in for the remote
/// backend in tests and the headless harness.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: Mutex<HashMap<String, String>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Raw stored JSON, for asserting on what actually got written.
    pub fn raw(&self, player: &PlayerId) -> Option<String> {
        self.snapshots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(player.as_str())
            .cloned()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, player: &PlayerId) -> Result<Option<GameState>, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected load failure".into()));
        }
        let snapshots = self.snapshots.lock().unwrap_or_else(|e| e.into_inner());
        match snapshots.get(player.as_str()) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, player: &PlayerId, state: &GameState) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected save failure".into()));
        }
        let json = serde_json::to_string(state)?;
        self.snapshots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(player.as_str().to_string(), json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("saves"));
        let player = PlayerId::new_random();

        assert!(store.load(&player).unwrap().is_none());

        let mut state = GameState::default();
        state.bonus_xp = 75;
        store.save(&player, &state).unwrap();
        let back = store.load(&player).unwrap().unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_file_store_isolates_players() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let a = PlayerId::new_random();
        let b = PlayerId::new_random();

        store.save(&a, &GameState::default()).unwrap();
        assert!(store.load(&b).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let player = PlayerId::new_random();
        std::fs::write(dir.path().join(format!("{player}.json")), b"{nope").unwrap();
        assert!(matches!(store.load(&player), Err(StoreError::Serde(_))));
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let store = MemorySnapshotStore::new();
        let player = PlayerId::new_random();

        store.fail_saves(true);
        assert!(store.save(&player, &GameState::default()).is_err());
        store.fail_saves(false);
        store.save(&player, &GameState::default()).unwrap();

        store.fail_loads(true);
        assert!(store.load(&player).is_err());
        store.fail_loads(false);
        assert!(store.load(&player).unwrap().is_some());
    }
}
