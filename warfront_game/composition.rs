use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use warfront_types::{
    army::{CombatKey, UnitId},
    defense::DefenseId,
};

/// Unit quantities of one side of a fight. Keys are unique and zero
/// quantities are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmyComposition(BTreeMap<UnitId, u32>);

impl ArmyComposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves persisted `(unit_key, quantity)` stacks, summing duplicates.
    /// Unknown keys are a data integrity gap: they are logged and skipped so a
    /// single corrupt record never blocks a resolution.
    pub fn from_stacks<'a, I>(stacks: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut composition = Self::new();
        for (key, quantity) in stacks {
            match key.parse::<UnitId>() {
                Ok(unit) => composition.add(unit, quantity),
                Err(_) => warn!(unit_key = %key, quantity, "Unknown unit key, contributes no strength"),
            }
        }
        composition
    }

    /// Adds units, saturating at `u32::MAX`.
    pub fn add(&mut self, unit: UnitId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let current = self.0.entry(unit).or_insert(0);
        *current = current.saturating_add(quantity);
    }

    /// Removes up to `quantity` units and returns how many were removed.
    pub fn remove(&mut self, unit: UnitId, quantity: u32) -> u32 {
        let Some(current) = self.0.get_mut(&unit) else {
            return 0;
        };
        let removed = quantity.min(*current);
        *current -= removed;
        if *current == 0 {
            self.0.remove(&unit);
        }
        removed
    }

    pub fn get(&self, unit: UnitId) -> u32 {
        self.0.get(&unit).copied().unwrap_or(0)
    }

    pub fn contains(&self, other: &ArmyComposition) -> bool {
        other.iter().all(|(unit, qty)| self.get(unit) >= qty)
    }

    pub fn merge(&mut self, other: &ArmyComposition) {
        for (unit, quantity) in other.iter() {
            self.add(unit, quantity);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, u32)> + '_ {
        self.0.iter().map(|(unit, qty)| (*unit, *qty))
    }

    pub fn units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.0.keys().copied()
    }

    pub fn total_units(&self) -> u64 {
        self.0.values().map(|q| *q as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys this army presents to the opposing side's counter lookup.
    pub fn combat_keys(&self) -> impl Iterator<Item = CombatKey> + '_ {
        self.units().map(CombatKey::Unit)
    }

    /// Scales every stack, flooring each quantity.
    pub fn scaled(&self, factor: f64) -> ArmyComposition {
        let mut scaled = ArmyComposition::new();
        for (unit, qty) in self.iter() {
            scaled.add(unit, (qty as f64 * factor).floor() as u32);
        }
        scaled
    }
}

impl FromIterator<(UnitId, u32)> for ArmyComposition {
    fn from_iter<T: IntoIterator<Item = (UnitId, u32)>>(iter: T) -> Self {
        let mut composition = ArmyComposition::new();
        for (unit, quantity) in iter {
            composition.add(unit, quantity);
        }
        composition
    }
}

/// Built defensive structures of a city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseComposition(BTreeMap<DefenseId, u32>);

impl DefenseComposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stacks<'a, I>(stacks: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut composition = Self::new();
        for (key, quantity) in stacks {
            match key.parse::<DefenseId>() {
                Ok(defense) => composition.add(defense, quantity),
                Err(_) => warn!(defense_key = %key, quantity, "Unknown defense key, contributes no strength"),
            }
        }
        composition
    }

    pub fn add(&mut self, defense: DefenseId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let current = self.0.entry(defense).or_insert(0);
        *current = current.saturating_add(quantity);
    }

    pub fn get(&self, defense: DefenseId) -> u32 {
        self.0.get(&defense).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DefenseId, u32)> + '_ {
        self.0.iter().map(|(d, qty)| (*d, *qty))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn combat_keys(&self) -> impl Iterator<Item = CombatKey> + '_ {
        self.0.keys().copied().map(CombatKey::Defense)
    }
}

impl FromIterator<(DefenseId, u32)> for DefenseComposition {
    fn from_iter<T: IntoIterator<Item = (DefenseId, u32)>>(iter: T) -> Self {
        let mut composition = DefenseComposition::new();
        for (defense, quantity) in iter {
            composition.add(defense, quantity);
        }
        composition
    }
}
