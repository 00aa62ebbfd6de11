//! Attribute set, hero classes, and favored-attribute bonuses.
//!
//! Attributes are long-horizon stats derived from cumulative activity —
//! never directly settable by the user. A hero may hold at most one class
//! at a time; each class favors two attributes, granting them a flat
//! [`CLASS_BONUS`].

use serde::{Deserialize, Serialize};

/// Flat bonus added to each of a class's two favored attributes.
pub const CLASS_BONUS: u32 = 2;

/// The four hero attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Force,
    Discipline,
    Consistency,
    Agility,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Force,
        Attribute::Discipline,
        Attribute::Consistency,
        Attribute::Agility,
    ];
}

/// Seed values for the four attributes. Derived attribute values never
/// fall below these seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    pub force: u32,
    pub discipline: u32,
    pub consistency: u32,
    pub agility: u32,
}

impl AttributeSet {
    pub fn get(&self, attr: Attribute) -> u32 {
        match attr {
            Attribute::Force => self.force,
            Attribute::Discipline => self.discipline,
            Attribute::Consistency => self.consistency,
            Attribute::Agility => self.agility,
        }
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self {
            force: 1,
            discipline: 1,
            consistency: 1,
            agility: 1,
        }
    }
}

/// A hero class: static config, not persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub favored: [Attribute; 2],
}

impl ClassDefinition {
    pub fn favors(&self, attr: Attribute) -> bool {
        self.favored.contains(&attr)
    }
}

/// The built-in class roster.
pub const CLASSES: [ClassDefinition; 3] = [
    ClassDefinition {
        id: "warrior",
        name: "Warrior",
        description: "Specialist in physical force and absolute consistency.",
        icon: "⚔️",
        favored: [Attribute::Force, Attribute::Consistency],
    },
    ClassDefinition {
        id: "mage",
        name: "Mage",
        description: "Master of mental discipline and agility of thought.",
        icon: "🔮",
        favored: [Attribute::Discipline, Attribute::Agility],
    },
    ClassDefinition {
        id: "hunter",
        name: "Hunter",
        description: "Balance between agility of action and the discipline of the hunt.",
        icon: "🏹",
        favored: [Attribute::Agility, Attribute::Discipline],
    },
];

/// Look up a class by id. Unknown ids yield `None` ("unclassed").
pub fn find_class(id: &str) -> Option<&'static ClassDefinition> {
    CLASSES.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_ids_unique() {
        for (i, a) in CLASSES.iter().enumerate() {
            for b in &CLASSES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_find_class() {
        assert_eq!(find_class("warrior").unwrap().name, "Warrior");
        assert!(find_class("bard").is_none());
    }

    #[test]
    fn test_every_class_favors_two_attributes() {
        for class in &CLASSES {
            assert_ne!(class.favored[0], class.favored[1]);
        }
    }

    #[test]
    fn test_default_seeds() {
        let seeds = AttributeSet::default();
        for attr in Attribute::ALL {
            assert_eq!(seeds.get(attr), 1);
        }
    }
}
