use campaign_common::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Player character, non-player character, or creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    #[default]
    Pc,
    Npc,
    Creature,
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for Abilities {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl Abilities {
    /// Modifier for a score: `(score - 10) / 2`, rounded toward negative infinity.
    pub fn modifier(score: i32) -> i32 {
        (score - 10).div_euclid(2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: RecordId,
    pub name: String,
    pub kind: CharacterKind,
    pub level: u32,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub abilities: Abilities,
    #[serde(default)]
    pub notes: String,
}

impl Character {
    pub fn new(name: impl Into<String>, kind: CharacterKind) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            kind,
            level: 1,
            race: String::new(),
            class: None,
            abilities: Abilities::default(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Characters appearing in the scene, in the order they were linked.
    #[serde(default)]
    pub characters: Vec<RecordId>,
    #[serde(default)]
    pub notes: String,
}

impl Scene {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            description: String::new(),
            characters: Vec::new(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: RecordId,
    pub title: String,
    pub date: DateTime<Utc>,
    /// Scenes played in this session, in running order.
    #[serde(default)]
    pub scenes: Vec<RecordId>,
    #[serde(default)]
    pub notes: String,
    /// Planned session rather than one already played.
    #[serde(default)]
    pub is_preparation: bool,
}

impl Session {
    pub fn new(title: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            date,
            scenes: Vec::new(),
            notes: String::new(),
            is_preparation: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankKind {
    Names,
    Races,
    Classes,
    Professions,
    Weapons,
    Armors,
    Trinkets,
    Factions,
    Locations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankEntry {
    pub id: RecordId,
    pub value: String,
}

/// A list of reusable values (names, races, ...) of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBank {
    pub kind: BankKind,
    #[serde(default)]
    pub entries: Vec<BankEntry>,
}

impl DataBank {
    pub fn new(kind: BankKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }
}
