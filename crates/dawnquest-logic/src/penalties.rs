//! Active/resolved penalty ledger derived from failure states.
//!
//! A penalty is the textual consequence tied to a failed task or habit.
//! It stays active until resolved; resolved entries are kept visible for
//! history and may be reopened (un-resolving is an explicit, legal
//! transition — it corrects mistaken resolutions). Shielded failures —
//! those that consumed a protection charge — are still recorded as failed
//! but appear in neither list.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::habits::{BadHabit, HabitStatus};
use crate::tasks::{DailyTask, TaskState};

/// Penalty bookkeeping for a single failure occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyState {
    /// Failure recorded, penance not yet served.
    Outstanding,
    /// Penance served; kept for history and reopenable.
    Resolved,
    /// A protection charge absorbed this failure. Never enters the
    /// active ledger.
    Shielded,
}

/// Where a ledger entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltySource {
    Task { difficulty: Difficulty },
    Habit,
}

/// One row of the penalty ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyEntry {
    pub id: String,
    pub name: String,
    /// The user-authored consequence text.
    pub sentence: String,
    pub source: PenaltySource,
}

/// The derived ledger: unresolved debts plus served history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PenaltyLedger {
    pub active: Vec<PenaltyEntry>,
    pub resolved: Vec<PenaltyEntry>,
}

/// Derive the full ledger from current task and habit failure states.
pub fn ledger(tasks: &[DailyTask], habits: &[BadHabit]) -> PenaltyLedger {
    let mut out = PenaltyLedger::default();

    for task in tasks {
        if let TaskState::Failed(penalty) = task.state {
            let entry = PenaltyEntry {
                id: task.id.clone(),
                name: task.name.clone(),
                sentence: task.penalty.clone(),
                source: PenaltySource::Task {
                    difficulty: task.difficulty,
                },
            };
            match penalty {
                PenaltyState::Outstanding => out.active.push(entry),
                PenaltyState::Resolved => out.resolved.push(entry),
                PenaltyState::Shielded => {}
            }
        }
    }

    for habit in habits {
        if let HabitStatus::Failed(penalty) = habit.status {
            let entry = PenaltyEntry {
                id: habit.id.clone(),
                name: habit.name.clone(),
                sentence: habit.penalty.clone(),
                source: PenaltySource::Habit,
            };
            match penalty {
                PenaltyState::Outstanding => out.active.push(entry),
                PenaltyState::Resolved => out.resolved.push(entry),
                PenaltyState::Shielded => {}
            }
        }
    }

    out
}
