//! Shop items, purchases, and consumable inventory entries.
//!
//! A purchase captures the price at purchase time — editing an item's
//! cost later never rewrites past purchases, keeping the spend history
//! auditable. Inventory entries are uniquely identified owned instances,
//! consumable exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// A mundane self-reward with no mechanical effect.
    Reward,
    /// Penalty relief of some kind.
    Relief,
}

/// Mechanical effect of a relief item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemEffect {
    /// Resolves one targeted active penalty.
    RemovePenalty,
    /// Resolves one targeted active penalty and credits bonus XP.
    ConvertPenaltyToXp,
    /// Arms the single protection charge; the next failure is shielded.
    TemporaryProtection,
}

/// Bonus XP credited when a penalty is converted instead of served.
pub const CONVERT_PENALTY_BONUS_XP: u32 = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub category: ItemCategory,
    pub effect: Option<ItemEffect>,
}

/// An entry in the spend ledger. `price` is frozen at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub item_id: String,
    pub price: u32,
    pub at: DateTime<Utc>,
}

/// A uniquely identified, owned instance of a purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: String,
    pub item_id: String,
}
