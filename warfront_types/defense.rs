use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    army::{Category, CombatKey, Target, UnitId},
    common::Resources,
    errors::GameError,
};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseId {
    ReinforcedWall,
    MachineGunTurret,
    ElectricTrap,
    AntiVehicleTurret,
    FortifiedBunker,
    AntiTankCannon,
    PlasmaTurret,
    EnergyShield,
}

impl DefenseId {
    pub const ALL: [DefenseId; 8] = [
        DefenseId::ReinforcedWall,
        DefenseId::MachineGunTurret,
        DefenseId::ElectricTrap,
        DefenseId::AntiVehicleTurret,
        DefenseId::FortifiedBunker,
        DefenseId::AntiTankCannon,
        DefenseId::PlasmaTurret,
        DefenseId::EnergyShield,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DefenseId::ReinforcedWall => "reinforced_wall",
            DefenseId::MachineGunTurret => "machine_gun_turret",
            DefenseId::ElectricTrap => "electric_trap",
            DefenseId::AntiVehicleTurret => "anti_vehicle_turret",
            DefenseId::FortifiedBunker => "fortified_bunker",
            DefenseId::AntiTankCannon => "anti_tank_cannon",
            DefenseId::PlasmaTurret => "plasma_turret",
            DefenseId::EnergyShield => "energy_shield",
        }
    }

    pub fn definition(&self) -> &'static DefenseDefinition {
        &DEFENSES[*self as usize]
    }

    pub fn category(&self) -> Category {
        self.definition().category
    }
}

impl fmt::Display for DefenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DefenseId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DefenseId::ALL
            .into_iter()
            .find(|id| id.key() == s)
            .ok_or_else(|| GameError::UnknownDefense(s.to_string()))
    }
}

/// Stationary structure built in a city. Fights only on the defending side
/// and never takes losses.
#[derive(Debug, Clone)]
pub struct DefenseDefinition {
    pub id: DefenseId,
    pub name: &'static str,
    pub tier: u8,
    pub category: Category,
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    /// Defense workshop level needed to build it.
    pub required_workshop_level: u8,
    pub cost: Resources,
    pub upkeep: Resources,
    pub build_time_secs: u32,
    pub counters: &'static [Target],
    pub weak_to: &'static [Target],
}

impl DefenseDefinition {
    pub fn counters_key(&self, key: &CombatKey) -> bool {
        self.counters.iter().any(|t| t.matches(key))
    }

    pub fn is_weak_to(&self, key: &CombatKey) -> bool {
        self.weak_to.iter().any(|t| t.matches(key))
    }

    pub fn is_unlocked(&self, workshop_level: u8) -> bool {
        workshop_level >= self.required_workshop_level
    }
}

pub fn defenses_by_tier(tier: u8) -> impl Iterator<Item = &'static DefenseDefinition> {
    DEFENSES.iter().filter(move |d| d.tier == tier)
}

pub fn defenses_by_category(
    category: Category,
) -> impl Iterator<Item = &'static DefenseDefinition> {
    DEFENSES.iter().filter(move |d| d.category == category)
}

/// Defenses a city can build with the given workshop level.
pub fn unlocked_defenses(workshop_level: u8) -> impl Iterator<Item = &'static DefenseDefinition> {
    DEFENSES.iter().filter(move |d| d.is_unlocked(workshop_level))
}

/// Indexed by `DefenseId as usize`.
pub static DEFENSES: [DefenseDefinition; 8] = [
    DefenseDefinition {
        id: DefenseId::ReinforcedWall,
        name: "Reinforced Wall",
        tier: 1,
        category: Category::Fortification,
        attack: 0,
        defense: 15,
        health: 500,
        required_workshop_level: 1,
        cost: Resources::new(100, 150, 0),
        upkeep: Resources::new(0, 1, 0),
        build_time_secs: 120,
        counters: &[Target::Unit(UnitId::Militia), Target::Unit(UnitId::Scouts)],
        weak_to: &[Target::Unit(UnitId::AntiArmor), Target::Unit(UnitId::HeavyTank)],
    },
    DefenseDefinition {
        id: DefenseId::MachineGunTurret,
        name: "Machine Gun Turret",
        tier: 1,
        category: Category::Turret,
        attack: 8,
        defense: 5,
        health: 200,
        required_workshop_level: 1,
        cost: Resources::new(200, 100, 50),
        upkeep: Resources::new(2, 1, 1),
        build_time_secs: 180,
        counters: &[
            Target::Unit(UnitId::Militia),
            Target::Unit(UnitId::Riflemen),
            Target::Unit(UnitId::Scouts),
        ],
        weak_to: &[Target::Unit(UnitId::LightTank), Target::Unit(UnitId::HeavyTank)],
    },
    DefenseDefinition {
        id: DefenseId::ElectricTrap,
        name: "Electric Trap",
        tier: 2,
        category: Category::Trap,
        attack: 5,
        defense: 0,
        health: 100,
        required_workshop_level: 3,
        cost: Resources::new(150, 80, 0),
        upkeep: Resources::new(1, 0, 0),
        build_time_secs: 150,
        counters: &[Target::Unit(UnitId::Scouts), Target::Unit(UnitId::Transport)],
        weak_to: &[Target::Unit(UnitId::Marksmen)],
    },
    DefenseDefinition {
        id: DefenseId::AntiVehicleTurret,
        name: "Anti-Vehicle Turret",
        tier: 2,
        category: Category::Turret,
        attack: 15,
        defense: 8,
        health: 300,
        required_workshop_level: 3,
        cost: Resources::new(300, 200, 150),
        upkeep: Resources::new(3, 2, 2),
        build_time_secs: 240,
        counters: &[Target::Unit(UnitId::LightTank), Target::Unit(UnitId::Transport)],
        weak_to: &[Target::Unit(UnitId::Riflemen), Target::Unit(UnitId::Militia)],
    },
    DefenseDefinition {
        id: DefenseId::FortifiedBunker,
        name: "Fortified Bunker",
        tier: 3,
        category: Category::Fortification,
        attack: 10,
        defense: 25,
        health: 1000,
        required_workshop_level: 5,
        cost: Resources::new(500, 400, 200),
        upkeep: Resources::new(5, 3, 1),
        build_time_secs: 360,
        counters: &[
            Target::Unit(UnitId::Riflemen),
            Target::Unit(UnitId::Scouts),
            Target::Unit(UnitId::Militia),
            Target::Unit(UnitId::LightTank),
        ],
        weak_to: &[Target::Unit(UnitId::HeavyTank), Target::Unit(UnitId::AntiArmor)],
    },
    DefenseDefinition {
        id: DefenseId::AntiTankCannon,
        name: "Anti-Tank Cannon",
        tier: 3,
        category: Category::Artillery,
        attack: 25,
        defense: 5,
        health: 400,
        required_workshop_level: 5,
        cost: Resources::new(600, 450, 300),
        upkeep: Resources::new(6, 4, 3),
        build_time_secs: 420,
        counters: &[Target::Unit(UnitId::HeavyTank), Target::Unit(UnitId::LightTank)],
        weak_to: &[Target::Unit(UnitId::Scouts), Target::Unit(UnitId::Riflemen)],
    },
    DefenseDefinition {
        id: DefenseId::PlasmaTurret,
        name: "Plasma Turret",
        tier: 4,
        category: Category::Turret,
        attack: 20,
        defense: 12,
        health: 500,
        required_workshop_level: 8,
        cost: Resources::new(800, 500, 0),
        upkeep: Resources::new(8, 4, 0),
        build_time_secs: 480,
        counters: &[
            Target::Unit(UnitId::Militia),
            Target::Unit(UnitId::Riflemen),
            Target::Unit(UnitId::Scouts),
            Target::Unit(UnitId::LightTank),
            Target::Unit(UnitId::Marksmen),
        ],
        weak_to: &[],
    },
    DefenseDefinition {
        id: DefenseId::EnergyShield,
        name: "Energy Shield",
        tier: 4,
        category: Category::Shield,
        attack: 0,
        defense: 30,
        health: 800,
        required_workshop_level: 10,
        cost: Resources::new(1000, 600, 0),
        upkeep: Resources::new(10, 5, 0),
        build_time_secs: 600,
        counters: &[
            Target::Unit(UnitId::HeavyTank),
            Target::Unit(UnitId::LightTank),
            Target::Unit(UnitId::AntiArmor),
        ],
        weak_to: &[Target::Unit(UnitId::Riflemen), Target::Unit(UnitId::Scouts)],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defense_table_is_indexed_by_id() {
        for id in DefenseId::ALL {
            assert_eq!(id.definition().id, id);
        }
    }

    #[test]
    fn test_unlocked_defenses_by_workshop_level() {
        assert_eq!(unlocked_defenses(0).count(), 0);
        assert_eq!(unlocked_defenses(1).count(), 2);
        assert_eq!(unlocked_defenses(5).count(), 6);
        assert_eq!(unlocked_defenses(10).count(), 8);
    }

    #[test]
    fn test_lookup_by_tier_and_category() {
        assert_eq!(defenses_by_tier(4).count(), 2);
        let turrets: Vec<DefenseId> = defenses_by_category(Category::Turret)
            .map(|d| d.id)
            .collect();
        assert_eq!(
            turrets,
            vec![
                DefenseId::MachineGunTurret,
                DefenseId::AntiVehicleTurret,
                DefenseId::PlasmaTurret
            ]
        );
    }

    #[test]
    fn test_unknown_defense_key() {
        assert!(matches!(
            "moat".parse::<DefenseId>(),
            Err(GameError::UnknownDefense(_))
        ));
        assert_eq!(
            "plasma_turret".parse::<DefenseId>().unwrap(),
            DefenseId::PlasmaTurret
        );
    }
}
