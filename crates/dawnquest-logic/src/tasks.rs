//! Daily tasks with an explicit lifecycle state machine.
//!
//! A task moves `Pending → Completed | Failed`; failure carries its own
//! penalty bookkeeping (see [`PenaltyState`]). Reopening a completed or
//! failed task back to pending is an explicit transition, not a side
//! effect of flag juggling.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::penalties::PenaltyState;

/// One-shot tasks are checked off; progress tasks accumulate toward a
/// numeric target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    OneShot,
    Progress {
        target: f64,
        progress: f64,
        unit: String,
    },
}

/// Task lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Completed,
    Failed(PenaltyState),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: String,
    pub name: String,
    pub kind: TaskKind,
    pub state: TaskState,
    pub difficulty: Difficulty,
    /// User-authored consequence text, charged on failure.
    pub penalty: String,
}

impl DailyTask {
    pub fn is_pending(&self) -> bool {
        self.state == TaskState::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    pub fn is_one_shot(&self) -> bool {
        matches!(self.kind, TaskKind::OneShot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_predicates() {
        let mut task = DailyTask {
            id: "t".into(),
            name: "morning run".into(),
            kind: TaskKind::OneShot,
            state: TaskState::Pending,
            difficulty: Difficulty::Normal,
            penalty: "cold shower".into(),
        };
        assert!(task.is_pending());
        task.state = TaskState::Completed;
        assert!(task.is_completed());
        task.state = TaskState::Failed(PenaltyState::Outstanding);
        assert!(!task.is_pending() && !task.is_completed());
    }
}
