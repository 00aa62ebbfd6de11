//! The engine: state ownership, command application, memoized views.
//!
//! Derived views (attributes, progression, penalty ledger) are pure
//! functions of the state document. They are recomputed once per applied
//! command and cached, so reads between mutations are free and always
//! consistent with each other.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use dawnquest_logic::attributes::{derive_attributes, AttributeReport};
use dawnquest_logic::class::find_class;
use dawnquest_logic::penalties::{ledger, PenaltyLedger};
use dawnquest_logic::progression::{aggregate, ProgressionReport};
use dawnquest_logic::reminders::{scan, Reminder};

use crate::command::{reduce, Command, CommandError};
use crate::identity::PlayerId;
use crate::outbox::{Outbox, RetryPolicy};
use crate::persistence::SnapshotStore;
use crate::reconcile::{reconcile, LoadSource};
use crate::state::GameState;

/// Memoized views over one state snapshot.
#[derive(Debug, Clone)]
pub struct Derived {
    pub attributes: AttributeReport,
    pub progression: ProgressionReport,
    pub penalties: PenaltyLedger,
}

impl Derived {
    fn compute(state: &GameState) -> Self {
        let class = state.class_id.as_deref().and_then(find_class);
        let attributes = derive_attributes(
            &state.tasks,
            &state.habits,
            &state.quests,
            &state.goals,
            &state.initial_attributes,
            class,
        );
        let progression = aggregate(
            &state.tasks,
            &state.habits,
            &state.quests,
            &state.goals,
            &state.purchases,
            state.bonus_xp,
            &attributes,
        );
        let penalties = ledger(&state.tasks, &state.habits);
        Self {
            attributes,
            progression,
            penalties,
        }
    }
}

/// One player session. Loads via the reconciler, applies commands, and
/// hands every accepted snapshot to the write-behind outbox.
pub struct GameEngine {
    player: PlayerId,
    state: GameState,
    revision: u64,
    derived: Derived,
    outbox: Outbox,
    source: LoadSource,
}

impl GameEngine {
    /// Reconcile local and remote snapshots and start the outbox writer.
    /// Must be called from within a tokio runtime.
    pub fn load(
        player: PlayerId,
        local: Arc<dyn SnapshotStore>,
        remote: Arc<dyn SnapshotStore>,
        retry: RetryPolicy,
    ) -> Self {
        let (state, source) = reconcile(local.as_ref(), remote.as_ref(), &player);
        tracing::info!(player = %player, ?source, "session loaded");
        let derived = Derived::compute(&state);
        let outbox = Outbox::spawn(player.clone(), local, remote, retry);
        Self {
            player,
            state,
            revision: 0,
            derived,
            outbox,
            source,
        }
    }

    /// Apply one command. On success the snapshot is replaced wholesale,
    /// views are recomputed, and the new snapshot is queued for writing.
    pub fn apply(&mut self, command: &Command) -> Result<Vec<String>, CommandError> {
        let (next, notices) = reduce(&self.state, command, Utc::now())?;
        self.state = next;
        self.revision += 1;
        self.derived = Derived::compute(&self.state);
        self.outbox.submit(self.state.clone());
        tracing::debug!(player = %self.player, revision = self.revision, "command applied");
        Ok(notices)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn attributes(&self) -> &AttributeReport {
        &self.derived.attributes
    }

    pub fn progression(&self) -> &ProgressionReport {
        &self.derived.progression
    }

    pub fn penalties(&self) -> &PenaltyLedger {
        &self.derived.penalties
    }

    /// Where the loaded snapshot came from.
    pub fn load_source(&self) -> LoadSource {
        self.source
    }

    /// Number of commands accepted this session.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn reminders(&self, today: NaiveDate) -> Vec<Reminder> {
        scan(&self.state.goals, &self.state.events, today)
    }

    /// Wait until every queued snapshot has been written out.
    pub async fn flush(&self) {
        self.outbox.flush().await;
    }
}
