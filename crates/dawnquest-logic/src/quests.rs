//! One-off quests with a reopenable completion toggle.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    /// Toggle, not one-way: a completed quest can be reopened.
    pub completed: bool,
}
