//! Five-tier difficulty table with reward multipliers.
//!
//! Multipliers are monotonically increasing from [`Difficulty::VeryEasy`]
//! to [`Difficulty::Epic`]. The name/label/icon triple is presentation
//! metadata carried alongside the multiplier so the UI layer never needs
//! its own tier table.

use serde::{Deserialize, Serialize};

/// Difficulty tier of a task or quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Normal,
    Hard,
    Epic,
}

impl Difficulty {
    /// All tiers, ordered from lowest to highest multiplier.
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Epic,
    ];

    /// Reward multiplier applied to base XP and coin values.
    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::VeryEasy => 0.5,
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
            Difficulty::Epic => 1.5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Epic => "Epic",
        }
    }

    /// Short flavor label shown next to the entity name.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Trivial",
            Difficulty::Easy => "Simple",
            Difficulty::Normal => "Standard",
            Difficulty::Hard => "Risky",
            Difficulty::Epic => "Legendary",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "🌱",
            Difficulty::Easy => "⚔️",
            Difficulty::Normal => "📜",
            Difficulty::Hard => "🔥",
            Difficulty::Epic => "👑",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Normal
    }
}
