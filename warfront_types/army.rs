use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{common::Resources, defense::DefenseId, errors::GameError};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitId {
    Militia,
    Riflemen,
    Scouts,
    Marksmen,
    Transport,
    LightTank,
    HeavyTank,
    AntiArmor,
    Spy,
}

impl UnitId {
    pub const ALL: [UnitId; 9] = [
        UnitId::Militia,
        UnitId::Riflemen,
        UnitId::Scouts,
        UnitId::Marksmen,
        UnitId::Transport,
        UnitId::LightTank,
        UnitId::HeavyTank,
        UnitId::AntiArmor,
        UnitId::Spy,
    ];

    /// Stable key used by persisted records.
    pub fn key(&self) -> &'static str {
        match self {
            UnitId::Militia => "militia",
            UnitId::Riflemen => "riflemen",
            UnitId::Scouts => "scouts",
            UnitId::Marksmen => "marksmen",
            UnitId::Transport => "transport",
            UnitId::LightTank => "light_tank",
            UnitId::HeavyTank => "heavy_tank",
            UnitId::AntiArmor => "anti_armor",
            UnitId::Spy => "spy",
        }
    }

    pub fn definition(&self) -> &'static UnitDefinition {
        &UNITS[*self as usize]
    }

    pub fn category(&self) -> Category {
        self.definition().category
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UnitId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitId::ALL
            .into_iter()
            .find(|id| id.key() == s)
            .ok_or_else(|| GameError::UnknownUnit(s.to_string()))
    }
}

/// Broad family of a unit or defensive structure. Weak-to entries can target a
/// whole category instead of a single id.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Infantry,
    Ranged,
    Recon,
    Logistics,
    Armored,
    Special,
    Fortification,
    Turret,
    Trap,
    Artillery,
    Shield,
}

/// Anything that can stand on one side of a fight.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatKey {
    Unit(UnitId),
    Defense(DefenseId),
}

impl CombatKey {
    pub fn category(&self) -> Category {
        match self {
            CombatKey::Unit(id) => id.category(),
            CombatKey::Defense(id) => id.category(),
        }
    }

    pub fn counters(&self, other: &CombatKey) -> bool {
        match self {
            CombatKey::Unit(id) => id.definition().counters_key(other),
            CombatKey::Defense(id) => id.definition().counters_key(other),
        }
    }

    pub fn is_weak_to(&self, other: &CombatKey) -> bool {
        match self {
            CombatKey::Unit(id) => id.definition().is_weak_to(other),
            CombatKey::Defense(id) => id.definition().is_weak_to(other),
        }
    }

    /// Every unit and defense in the catalog.
    pub fn all() -> impl Iterator<Item = CombatKey> {
        UnitId::ALL
            .into_iter()
            .map(CombatKey::Unit)
            .chain(DefenseId::ALL.into_iter().map(CombatKey::Defense))
    }
}

impl fmt::Display for CombatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatKey::Unit(id) => write!(f, "{id}"),
            CombatKey::Defense(id) => write!(f, "{id}"),
        }
    }
}

/// Entry of a `counters` or `weak_to` list.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Unit(UnitId),
    Defense(DefenseId),
    Category(Category),
}

impl Target {
    pub fn matches(&self, key: &CombatKey) -> bool {
        match (self, key) {
            (Target::Unit(a), CombatKey::Unit(b)) => a == b,
            (Target::Defense(a), CombatKey::Defense(b)) => a == b,
            (Target::Category(c), key) => *c == key.category(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnitDefinition {
    pub id: UnitId,
    pub name: &'static str,
    pub tier: u8,
    pub category: Category,
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    pub initiative: u32,
    pub speed: f64,
    pub carry_capacity: u32,
    /// Weight of a single unit in the PvP power score.
    pub power_weight: u32,
    pub cost: Resources,
    pub upkeep: Resources,
    pub train_time_secs: u32,
    pub counters: &'static [Target],
    pub weak_to: &'static [Target],
}

impl UnitDefinition {
    pub fn counters_key(&self, key: &CombatKey) -> bool {
        self.counters.iter().any(|t| t.matches(key))
    }

    pub fn is_weak_to(&self, key: &CombatKey) -> bool {
        self.weak_to.iter().any(|t| t.matches(key))
    }
}

pub fn units_by_tier(tier: u8) -> impl Iterator<Item = &'static UnitDefinition> {
    UNITS.iter().filter(move |u| u.tier == tier)
}

pub fn units_by_category(category: Category) -> impl Iterator<Item = &'static UnitDefinition> {
    UNITS.iter().filter(move |u| u.category == category)
}

/// Indexed by `UnitId as usize`.
pub static UNITS: [UnitDefinition; 9] = [
    UnitDefinition {
        id: UnitId::Militia,
        name: "Militia",
        tier: 1,
        category: Category::Infantry,
        attack: 2,
        defense: 3,
        health: 10,
        initiative: 5,
        speed: 1.0,
        carry_capacity: 10,
        power_weight: 5,
        cost: Resources::new(50, 20, 0),
        upkeep: Resources::new(1, 0, 0),
        train_time_secs: 30,
        counters: &[],
        weak_to: &[Target::Unit(UnitId::Riflemen), Target::Category(Category::Armored)],
    },
    UnitDefinition {
        id: UnitId::Riflemen,
        name: "Riflemen",
        tier: 1,
        category: Category::Infantry,
        attack: 5,
        defense: 4,
        health: 20,
        initiative: 10,
        speed: 1.0,
        carry_capacity: 20,
        power_weight: 10,
        cost: Resources::new(100, 50, 0),
        upkeep: Resources::new(1, 0, 0),
        train_time_secs: 60,
        counters: &[Target::Unit(UnitId::Militia), Target::Unit(UnitId::Scouts)],
        weak_to: &[Target::Unit(UnitId::Marksmen), Target::Category(Category::Armored)],
    },
    UnitDefinition {
        id: UnitId::Scouts,
        name: "Scouts",
        tier: 1,
        category: Category::Recon,
        attack: 3,
        defense: 2,
        health: 12,
        initiative: 25,
        speed: 2.0,
        carry_capacity: 15,
        power_weight: 8,
        cost: Resources::new(80, 30, 10),
        upkeep: Resources::new(1, 0, 0),
        train_time_secs: 45,
        counters: &[Target::Unit(UnitId::Transport), Target::Unit(UnitId::Marksmen)],
        weak_to: &[Target::Unit(UnitId::Riflemen), Target::Category(Category::Turret)],
    },
    UnitDefinition {
        id: UnitId::Marksmen,
        name: "Marksmen",
        tier: 2,
        category: Category::Ranged,
        attack: 8,
        defense: 3,
        health: 15,
        initiative: 15,
        speed: 1.0,
        carry_capacity: 10,
        power_weight: 15,
        cost: Resources::new(150, 60, 0),
        upkeep: Resources::new(1, 0, 0),
        train_time_secs: 90,
        counters: &[
            Target::Unit(UnitId::Riflemen),
            Target::Unit(UnitId::Militia),
            Target::Unit(UnitId::AntiArmor),
        ],
        weak_to: &[
            Target::Unit(UnitId::Scouts),
            Target::Unit(UnitId::LightTank),
            Target::Category(Category::Fortification),
        ],
    },
    UnitDefinition {
        id: UnitId::Transport,
        name: "Transport",
        tier: 2,
        category: Category::Logistics,
        attack: 1,
        defense: 6,
        health: 40,
        initiative: 6,
        speed: 1.5,
        carry_capacity: 200,
        power_weight: 12,
        cost: Resources::new(200, 150, 50),
        upkeep: Resources::new(1, 1, 1),
        train_time_secs: 120,
        counters: &[],
        weak_to: &[
            Target::Unit(UnitId::Scouts),
            Target::Unit(UnitId::AntiArmor),
            Target::Category(Category::Trap),
        ],
    },
    UnitDefinition {
        id: UnitId::LightTank,
        name: "Light Tank",
        tier: 2,
        category: Category::Armored,
        attack: 12,
        defense: 10,
        health: 60,
        initiative: 12,
        speed: 1.8,
        carry_capacity: 40,
        power_weight: 40,
        cost: Resources::new(500, 400, 200),
        upkeep: Resources::new(3, 2, 2),
        train_time_secs: 240,
        counters: &[
            Target::Unit(UnitId::Marksmen),
            Target::Unit(UnitId::Militia),
            Target::Unit(UnitId::Riflemen),
        ],
        weak_to: &[
            Target::Unit(UnitId::AntiArmor),
            Target::Unit(UnitId::HeavyTank),
            Target::Category(Category::Artillery),
        ],
    },
    UnitDefinition {
        id: UnitId::HeavyTank,
        name: "Heavy Tank",
        tier: 3,
        category: Category::Armored,
        attack: 20,
        defense: 18,
        health: 100,
        initiative: 8,
        speed: 1.2,
        carry_capacity: 50,
        power_weight: 80,
        cost: Resources::new(800, 600, 400),
        upkeep: Resources::new(5, 3, 3),
        train_time_secs: 300,
        counters: &[
            Target::Unit(UnitId::LightTank),
            Target::Unit(UnitId::Riflemen),
            Target::Category(Category::Fortification),
        ],
        weak_to: &[
            Target::Unit(UnitId::AntiArmor),
            Target::Category(Category::Artillery),
            Target::Category(Category::Shield),
        ],
    },
    UnitDefinition {
        id: UnitId::AntiArmor,
        name: "Anti-Armor Infantry",
        tier: 3,
        category: Category::Infantry,
        attack: 15,
        defense: 10,
        health: 30,
        initiative: 15,
        speed: 1.0,
        carry_capacity: 10,
        power_weight: 35,
        cost: Resources::new(600, 400, 200),
        upkeep: Resources::new(4, 2, 2),
        train_time_secs: 240,
        counters: &[Target::Category(Category::Armored)],
        weak_to: &[
            Target::Unit(UnitId::Riflemen),
            Target::Unit(UnitId::Marksmen),
            Target::Category(Category::Turret),
        ],
    },
    UnitDefinition {
        id: UnitId::Spy,
        name: "Spy",
        tier: 2,
        category: Category::Special,
        attack: 1,
        defense: 1,
        health: 5,
        initiative: 50,
        speed: 2.0,
        carry_capacity: 0,
        power_weight: 20,
        cost: Resources::new(500, 100, 50),
        upkeep: Resources::new(3, 0, 1),
        train_time_secs: 300,
        counters: &[],
        weak_to: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_table_is_indexed_by_id() {
        for id in UnitId::ALL {
            assert_eq!(id.definition().id, id);
        }
    }

    #[test]
    fn test_unit_id_parse_round_trips_keys() {
        for id in UnitId::ALL {
            assert_eq!(id.key().parse::<UnitId>().unwrap(), id);
        }
        assert!(matches!(
            "dragon".parse::<UnitId>(),
            Err(GameError::UnknownUnit(k)) if k == "dragon"
        ));
    }

    #[test]
    fn test_category_target_matches_every_member() {
        let armored = Target::Category(Category::Armored);
        assert!(armored.matches(&CombatKey::Unit(UnitId::LightTank)));
        assert!(armored.matches(&CombatKey::Unit(UnitId::HeavyTank)));
        assert!(!armored.matches(&CombatKey::Unit(UnitId::Riflemen)));
    }

    #[test]
    fn test_units_by_tier_and_category() {
        let tier_one: Vec<UnitId> = units_by_tier(1).map(|u| u.id).collect();
        assert_eq!(
            tier_one,
            vec![UnitId::Militia, UnitId::Riflemen, UnitId::Scouts]
        );
        assert_eq!(units_by_category(Category::Armored).count(), 2);
    }

    #[test]
    fn test_serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&UnitId::LightTank).unwrap();
        assert_eq!(json, "\"light_tank\"");
    }
}
