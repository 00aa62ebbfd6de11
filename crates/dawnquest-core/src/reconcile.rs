//! Session-open reconciliation between the local and remote stores.
//!
//! Precedence is fixed: a readable remote snapshot wins outright and is
//! written through to the local store; otherwise a local snapshot is
//! promoted and pushed back to the remote as a repair; otherwise the
//! session starts fresh. Write-through failures are logged and ignored,
//! the session still opens.

use serde::{Deserialize, Serialize};

use crate::identity::PlayerId;
use crate::persistence::SnapshotStore;
use crate::state::{GameState, STATE_VERSION};

/// Which side supplied the snapshot the session opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    Remote,
    LocalRepair,
    Fresh,
}

fn stamp(mut state: GameState) -> GameState {
    state.version = STATE_VERSION;
    state
}

pub fn reconcile(
    local: &dyn SnapshotStore,
    remote: &dyn SnapshotStore,
    player: &PlayerId,
) -> (GameState, LoadSource) {
    match remote.load(player) {
        Ok(Some(state)) => {
            let state = stamp(state);
            if let Err(err) = local.save(player, &state) {
                tracing::warn!(player = %player, %err, "local write-through failed");
            }
            return (state, LoadSource::Remote);
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(player = %player, %err, "remote load failed, trying local");
        }
    }

    match local.load(player) {
        Ok(Some(state)) => {
            let state = stamp(state);
            if let Err(err) = remote.save(player, &state) {
                tracing::warn!(player = %player, %err, "remote repair failed");
            }
            (state, LoadSource::LocalRepair)
        }
        Ok(None) => (GameState::default(), LoadSource::Fresh),
        Err(err) => {
            tracing::warn!(player = %player, %err, "local load failed, starting fresh");
            (GameState::default(), LoadSource::Fresh)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySnapshotStore;

    fn state_with_bonus(bonus_xp: u32) -> GameState {
        GameState {
            bonus_xp,
            ..GameState::default()
        }
    }

    #[test]
    fn test_remote_wins_and_writes_through() {
        let local = MemorySnapshotStore::new();
        let remote = MemorySnapshotStore::new();
        let player = PlayerId::new_random();
        local.save(&player, &state_with_bonus(1)).unwrap();
        remote.save(&player, &state_with_bonus(2)).unwrap();

        let (state, source) = reconcile(&local, &remote, &player);
        assert_eq!(source, LoadSource::Remote);
        assert_eq!(state.bonus_xp, 2);
        // The local copy now mirrors the remote.
        assert_eq!(local.load(&player).unwrap().unwrap().bonus_xp, 2);
    }

    #[test]
    fn test_local_repairs_missing_remote() {
        let local = MemorySnapshotStore::new();
        let remote = MemorySnapshotStore::new();
        let player = PlayerId::new_random();
        local.save(&player, &state_with_bonus(7)).unwrap();

        let (state, source) = reconcile(&local, &remote, &player);
        assert_eq!(source, LoadSource::LocalRepair);
        assert_eq!(state.bonus_xp, 7);
        assert_eq!(remote.load(&player).unwrap().unwrap().bonus_xp, 7);
    }

    #[test]
    fn test_remote_outage_falls_back_to_local() {
        let local = MemorySnapshotStore::new();
        let remote = MemorySnapshotStore::new();
        let player = PlayerId::new_random();
        local.save(&player, &state_with_bonus(3)).unwrap();
        remote.save(&player, &state_with_bonus(9)).unwrap();
        remote.fail_loads(true);

        let (state, source) = reconcile(&local, &remote, &player);
        assert_eq!(source, LoadSource::LocalRepair);
        assert_eq!(state.bonus_xp, 3);
    }

    #[test]
    fn test_both_empty_starts_fresh() {
        let local = MemorySnapshotStore::new();
        let remote = MemorySnapshotStore::new();
        let player = PlayerId::new_random();

        let (state, source) = reconcile(&local, &remote, &player);
        assert_eq!(source, LoadSource::Fresh);
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn test_repair_failure_still_opens_session() {
        let local = MemorySnapshotStore::new();
        let remote = MemorySnapshotStore::new();
        let player = PlayerId::new_random();
        local.save(&player, &state_with_bonus(4)).unwrap();
        remote.fail_loads(true);
        remote.fail_saves(true);

        let (state, source) = reconcile(&local, &remote, &player);
        assert_eq!(source, LoadSource::LocalRepair);
        assert_eq!(state.bonus_xp, 4);
    }

    #[test]
    fn test_unreadable_local_starts_fresh() {
        let local = MemorySnapshotStore::new();
        let remote = MemorySnapshotStore::new();
        let player = PlayerId::new_random();
        local.save(&player, &state_with_bonus(6)).unwrap();
        local.fail_loads(true);

        let (state, source) = reconcile(&local, &remote, &player);
        assert_eq!(source, LoadSource::Fresh);
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn test_loaded_snapshot_is_stamped_with_current_version() {
        let local = MemorySnapshotStore::new();
        let remote = MemorySnapshotStore::new();
        let player = PlayerId::new_random();
        let mut old = state_with_bonus(0);
        old.version = 0;
        remote.save(&player, &old).unwrap();

        let (state, _) = reconcile(&local, &remote, &player);
        assert_eq!(state.version, STATE_VERSION);
    }
}
