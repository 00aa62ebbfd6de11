//! Write-behind outbox: async persistence decoupled from the game loop.
//!
//! Every accepted snapshot is queued here; a background task drains the
//! queue, coalescing bursts down to the latest snapshot, then writes the
//! local store first and the remote store with retries. Remote failures
//! never surface to the caller; the local copy is the durability floor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::identity::PlayerId;
use crate::persistence::SnapshotStore;
use crate::state::GameState;

/// Remote write retry knobs.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(250),
        }
    }
}

enum Msg {
    Write(GameState),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer. Cheap to clone via the sender.
pub struct Outbox {
    tx: mpsc::UnboundedSender<Msg>,
}

impl Outbox {
    /// Start the writer task. Must be called from within a tokio runtime.
    pub fn spawn(
        player: PlayerId,
        local: Arc<dyn SnapshotStore>,
        remote: Arc<dyn SnapshotStore>,
        policy: RetryPolicy,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(writer_loop(player, local, remote, policy, rx));
        Self { tx }
    }

    /// Queue a snapshot for writing. Never blocks; if the writer task is
    /// gone the snapshot is dropped silently (process shutdown).
    pub fn submit(&self, state: GameState) {
        let _ = self.tx.send(Msg::Write(state));
    }

    /// Resolve once everything queued before this call has been written.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Msg::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

async fn writer_loop(
    player: PlayerId,
    local: Arc<dyn SnapshotStore>,
    remote: Arc<dyn SnapshotStore>,
    policy: RetryPolicy,
    mut rx: mpsc::UnboundedReceiver<Msg>,
) {
    while let Some(first) = rx.recv().await {
        let mut latest = None;
        let mut acks = Vec::new();
        let mut pending = Some(first);
        // Coalesce the burst: only the newest snapshot matters.
        loop {
            match pending.take() {
                Some(Msg::Write(state)) => latest = Some(state),
                Some(Msg::Flush(ack)) => acks.push(ack),
                None => {}
            }
            match rx.try_recv() {
                Ok(msg) => pending = Some(msg),
                Err(_) => break,
            }
        }

        if let Some(state) = latest {
            if let Err(err) = local.save(&player, &state) {
                tracing::warn!(player = %player, %err, "local snapshot write failed");
            }
            save_remote_with_retry(&player, remote.as_ref(), &state, policy).await;
        }

        for ack in acks {
            let _ = ack.send(());
        }
    }
}

async fn save_remote_with_retry(
    player: &PlayerId,
    remote: &dyn SnapshotStore,
    state: &GameState,
    policy: RetryPolicy,
) {
    for attempt in 1..=policy.attempts.max(1) {
        match remote.save(player, state) {
            Ok(()) => return,
            Err(err) => {
                tracing::warn!(player = %player, %err, attempt, "remote snapshot write failed");
                if attempt < policy.attempts {
                    tokio::time::sleep(policy.backoff * attempt).await;
                }
            }
        }
    }
    // Dropped for now; the next snapshot supersedes this one anyway.
    tracing::warn!(player = %player, "remote snapshot dropped after retries");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySnapshotStore;

    fn quick_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 2,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_flush_waits_for_writes() {
        let local = Arc::new(MemorySnapshotStore::new());
        let remote = Arc::new(MemorySnapshotStore::new());
        let player = PlayerId::new_random();
        let outbox = Outbox::spawn(player.clone(), local.clone(), remote.clone(), quick_retry());

        let mut state = GameState::default();
        state.bonus_xp = 42;
        outbox.submit(state);
        outbox.flush().await;

        assert_eq!(local.load(&player).unwrap().unwrap().bonus_xp, 42);
        assert_eq!(remote.load(&player).unwrap().unwrap().bonus_xp, 42);
    }

    #[tokio::test]
    async fn test_burst_coalesces_to_latest() {
        let local = Arc::new(MemorySnapshotStore::new());
        let remote = Arc::new(MemorySnapshotStore::new());
        let player = PlayerId::new_random();
        let outbox = Outbox::spawn(player.clone(), local.clone(), remote.clone(), quick_retry());

        for bonus_xp in 1..=50 {
            let mut state = GameState::default();
            state.bonus_xp = bonus_xp;
            outbox.submit(state);
        }
        outbox.flush().await;

        assert_eq!(local.load(&player).unwrap().unwrap().bonus_xp, 50);
        assert_eq!(remote.load(&player).unwrap().unwrap().bonus_xp, 50);
    }

    #[tokio::test]
    async fn test_remote_recovers_on_retry() {
        let local = Arc::new(MemorySnapshotStore::new());
        let remote = Arc::new(MemorySnapshotStore::new());
        let player = PlayerId::new_random();
        let outbox = Outbox::spawn(
            player.clone(),
            local.clone(),
            remote.clone(),
            RetryPolicy {
                attempts: 5,
                backoff: Duration::from_millis(5),
            },
        );

        remote.fail_saves(true);
        let handle = {
            let remote = remote.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(8)).await;
                remote.fail_saves(false);
            })
        };

        outbox.submit(GameState::default());
        outbox.flush().await;
        handle.await.unwrap();

        assert!(remote.load(&player).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_flush_without_writes_resolves() {
        let local = Arc::new(MemorySnapshotStore::new());
        let remote = Arc::new(MemorySnapshotStore::new());
        let outbox = Outbox::spawn(PlayerId::new_random(), local, remote, quick_retry());
        outbox.flush().await;
    }
}
