//! The game-state document: single source of truth for every entity.
//!
//! A snapshot is the whole serialized `GameState`. Every field carries a
//! serde default so a snapshot written by an older schema deserializes
//! with default-fill — the merge policy is "shallow override with
//! default-fill", never field-level conflict resolution.

use serde::{Deserialize, Serialize};

use dawnquest_logic::class::AttributeSet;
use dawnquest_logic::events::ScheduledEvent;
use dawnquest_logic::goals::Goal;
use dawnquest_logic::habits::BadHabit;
use dawnquest_logic::quests::Quest;
use dawnquest_logic::shop::{InventoryEntry, ItemCategory, ItemEffect, Purchase, ShopItem};
use dawnquest_logic::tasks::{DailyTask, TaskState};

/// Current snapshot schema version. Snapshots are stamped with this on
/// load regardless of what they were written with.
pub const STATE_VERSION: u32 = 1;

/// Presentation-only screen selector, persisted so the UI reopens where
/// the user left off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Journey,
    Missions,
    Habits,
    Penalties,
    Shop,
    Events,
    Inventory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionsTab {
    Dailies,
    Quests,
    Goals,
}

/// The aggregate root. All entities are owned here and addressed by id
/// within their collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub version: u32,
    pub screen: Screen,
    pub missions_tab: MissionsTab,
    pub tasks: Vec<DailyTask>,
    pub habits: Vec<BadHabit>,
    pub quests: Vec<Quest>,
    pub goals: Vec<Goal>,
    pub events: Vec<ScheduledEvent>,
    pub shop_items: Vec<ShopItem>,
    pub purchases: Vec<Purchase>,
    pub inventory: Vec<InventoryEntry>,
    /// Active class id, or `None` for unclassed.
    pub class_id: Option<String>,
    pub initial_attributes: AttributeSet,
    /// XP pool fed by converted penalties.
    pub bonus_xp: u32,
    /// The single outstanding protection charge. Never stacks.
    pub protection_active: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            screen: Screen::Journey,
            missions_tab: MissionsTab::Dailies,
            tasks: Vec::new(),
            habits: Vec::new(),
            quests: Vec::new(),
            goals: Vec::new(),
            events: Vec::new(),
            shop_items: default_shop_stock(),
            purchases: Vec::new(),
            inventory: Vec::new(),
            class_id: None,
            initial_attributes: AttributeSet::default(),
            bonus_xp: 0,
            protection_active: false,
        }
    }
}

impl GameState {
    pub fn task(&self, id: &str) -> Option<&DailyTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut DailyTask> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn habit_mut(&mut self, id: &str) -> Option<&mut BadHabit> {
        self.habits.iter_mut().find(|h| h.id == id)
    }

    pub fn quest_mut(&mut self, id: &str) -> Option<&mut Quest> {
        self.quests.iter_mut().find(|q| q.id == id)
    }

    pub fn goal_mut(&mut self, id: &str) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == id)
    }

    pub fn event_mut(&mut self, id: &str) -> Option<&mut ScheduledEvent> {
        self.events.iter_mut().find(|e| e.id == id)
    }

    pub fn shop_item(&self, id: &str) -> Option<&ShopItem> {
        self.shop_items.iter().find(|i| i.id == id)
    }

    /// At most one epic-tier task may be pending at a time.
    pub fn has_pending_epic(&self) -> bool {
        self.tasks.iter().any(|t| {
            t.difficulty == dawnquest_logic::difficulty::Difficulty::Epic
                && t.state == TaskState::Pending
        })
    }
}

/// The default shop stock a fresh hero starts with.
pub fn default_shop_stock() -> Vec<ShopItem> {
    vec![
        ShopItem {
            id: "seal-of-absolution".into(),
            name: "Seal of Absolution".into(),
            description: "Annuls one active penance.".into(),
            cost: 40,
            category: ItemCategory::Relief,
            effect: Some(ItemEffect::RemovePenalty),
        },
        ShopItem {
            id: "alchemy-of-atonement".into(),
            name: "Alchemy of Atonement".into(),
            description: "Converts one failure into 25 points of XP.".into(),
            cost: 60,
            category: ItemCategory::Relief,
            effect: Some(ItemEffect::ConvertPenaltyToXp),
        },
        ShopItem {
            id: "cloak-of-providence".into(),
            name: "Cloak of Providence".into(),
            description: "Grants immunity to your next failure.".into(),
            cost: 50,
            category: ItemCategory::Relief,
            effect: Some(ItemEffect::TemporaryProtection),
        },
        ShopItem {
            id: "small-indulgence".into(),
            name: "Small Indulgence".into(),
            description: "A mundane reward for your discipline.".into(),
            cost: 15,
            category: ItemCategory::Reward,
            effect: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = GameState::default();
        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.shop_items.len(), 4);
        assert!(state.class_id.is_none());
        assert!(!state.protection_active);
    }

    #[test]
    fn test_partial_snapshot_default_fills() {
        // A snapshot missing most fields still loads, taking defaults.
        let state: GameState = serde_json::from_str(r#"{"bonus_xp": 10}"#).unwrap();
        assert_eq!(state.bonus_xp, 10);
        assert_eq!(state.shop_items.len(), 4);
        assert_eq!(state.screen, Screen::Journey);
        assert_eq!(state.initial_attributes.force, 1);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = GameState::default();
        state.bonus_xp = 25;
        state.protection_active = true;
        state.class_id = Some("mage".into());
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        // Forward compatibility the other way: a newer writer's extra
        // fields must not break an older reader.
        let state: GameState =
            serde_json::from_str(r#"{"bonus_xp": 5, "future_field": {"x": 1}}"#).unwrap();
        assert_eq!(state.bonus_xp, 5);
    }
}
