//! Base reward values, difficulty scaling, and failure fines.
//!
//! Rewards scale base values by the difficulty multiplier, rounding
//! half-up to the nearest integer. Goals pay a flat reward — they have no
//! difficulty tier. Failure fines are a flat coin deduction: scaled by
//! tier for tasks, fixed for habits. Everything here is deterministic and
//! never negative.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// Base values per entity kind: (xp, coins, attribute xp).
pub const TASK_BASE_XP: u32 = 15;
pub const TASK_BASE_COINS: u32 = 10;
pub const TASK_ATTR_XP: u32 = 40;

pub const QUEST_BASE_XP: u32 = 30;
pub const QUEST_BASE_COINS: u32 = 20;
pub const QUEST_ATTR_XP: u32 = 100;

pub const GOAL_XP: u32 = 100;
pub const GOAL_COINS: u32 = 30;
pub const GOAL_ATTR_XP: u32 = 200;

/// Base coin fine charged for a failure.
pub const FAILURE_FINE: u32 = 5;

/// Which reward table a completion draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Task,
    Quest,
    Goal,
}

/// XP and coins awarded for one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u32,
    pub coins: u32,
}

/// Scale a base value by a tier multiplier, rounding half-up.
fn scale(base: u32, difficulty: Difficulty) -> u32 {
    (base as f64 * difficulty.multiplier()).round() as u32
}

/// Reward for completing an entity of the given kind at the given tier.
/// The tier is ignored for goals.
pub fn reward(kind: RewardKind, difficulty: Difficulty) -> Reward {
    match kind {
        RewardKind::Task => Reward {
            xp: scale(TASK_BASE_XP, difficulty),
            coins: scale(TASK_BASE_COINS, difficulty),
        },
        RewardKind::Quest => Reward {
            xp: scale(QUEST_BASE_XP, difficulty),
            coins: scale(QUEST_BASE_COINS, difficulty),
        },
        RewardKind::Goal => Reward {
            xp: GOAL_XP,
            coins: GOAL_COINS,
        },
    }
}

/// Coin fine for a failed task, scaled by its tier.
pub fn task_failure_fine(difficulty: Difficulty) -> u32 {
    scale(FAILURE_FINE, difficulty)
}

/// Coin fine for a failed habit. Habits have no tiers; the fine is flat.
pub fn habit_failure_fine() -> u32 {
    FAILURE_FINE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_reward_per_tier() {
        assert_eq!(reward(RewardKind::Task, Difficulty::VeryEasy).xp, 8); // 7.5 rounds up
        assert_eq!(reward(RewardKind::Task, Difficulty::Easy).xp, 11); // 11.25 rounds down
        assert_eq!(reward(RewardKind::Task, Difficulty::Normal).xp, 15);
        assert_eq!(reward(RewardKind::Task, Difficulty::Hard).xp, 19); // 18.75 rounds up
        assert_eq!(reward(RewardKind::Task, Difficulty::Epic).xp, 23); // 22.5 rounds up
    }

    #[test]
    fn test_task_coins_per_tier() {
        assert_eq!(reward(RewardKind::Task, Difficulty::VeryEasy).coins, 5);
        assert_eq!(reward(RewardKind::Task, Difficulty::Hard).coins, 13); // 12.5 rounds up
        assert_eq!(reward(RewardKind::Task, Difficulty::Epic).coins, 15);
    }

    #[test]
    fn test_goal_reward_ignores_tier() {
        for tier in Difficulty::ALL {
            assert_eq!(
                reward(RewardKind::Goal, tier),
                Reward {
                    xp: GOAL_XP,
                    coins: GOAL_COINS
                }
            );
        }
    }

    #[test]
    fn test_xp_monotonic_across_tiers() {
        for kind in [RewardKind::Task, RewardKind::Quest] {
            let xs: Vec<u32> = Difficulty::ALL.iter().map(|d| reward(kind, *d).xp).collect();
            for pair in xs.windows(2) {
                assert!(pair[0] <= pair[1]);
            }
        }
    }

    #[test]
    fn test_failure_fines() {
        assert_eq!(task_failure_fine(Difficulty::Normal), 5);
        assert_eq!(task_failure_fine(Difficulty::Epic), 8); // 7.5 rounds up
        assert_eq!(task_failure_fine(Difficulty::VeryEasy), 3); // 2.5 rounds up
        assert_eq!(habit_failure_fine(), 5);
    }
}
