//! Bad habits tracked by daily resistance status.
//!
//! Each habit has a fixed per-habit reward for resisting it (habits have
//! no difficulty tier) and a penalty text charged on failure. The daily
//! status resets to pending only through an explicit reset — nothing in
//! this core is time-driven.

use serde::{Deserialize, Serialize};

use crate::penalties::PenaltyState;

/// Default resistance rewards for a newly created habit.
pub const DEFAULT_RESIST_XP: u32 = 20;
pub const DEFAULT_RESIST_COINS: u32 = 5;

/// Today's status for a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    Pending,
    Resisted,
    Failed(PenaltyState),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadHabit {
    pub id: String,
    pub name: String,
    /// The user's containment plan for this habit.
    pub strategy: String,
    pub reward_xp: u32,
    pub reward_coins: u32,
    pub penalty: String,
    pub status: HabitStatus,
}

impl BadHabit {
    pub fn is_resisted(&self) -> bool {
        self.status == HabitStatus::Resisted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_through_reset() {
        let mut habit = BadHabit {
            id: "h".into(),
            name: "doomscrolling".into(),
            strategy: "phone stays in the drawer".into(),
            reward_xp: DEFAULT_RESIST_XP,
            reward_coins: DEFAULT_RESIST_COINS,
            penalty: "donate 5 coins".into(),
            status: HabitStatus::Pending,
        };
        habit.status = HabitStatus::Resisted;
        assert!(habit.is_resisted());
        habit.status = HabitStatus::Pending;
        assert!(!habit.is_resisted());
    }
}
