use serde::{Deserialize, Serialize};

use warfront_types::{army::CombatKey, battle::Formation};

use crate::{
    balance::CombatBalance,
    composition::{ArmyComposition, DefenseComposition},
    counters::counter_multiplier,
};

/// Inputs of a single resolution, built once from persisted snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatContext {
    pub attacker: ArmyComposition,
    #[serde(default)]
    pub defender: ArmyComposition,
    #[serde(default)]
    pub defenses: DefenseComposition,
    #[serde(default)]
    pub attacker_tech_bonus: f64,
    #[serde(default)]
    pub defender_tech_bonus: f64,
    #[serde(default)]
    pub walls_bonus: f64,
    #[serde(default)]
    pub formation: Formation,
    #[serde(default)]
    pub is_weak_target_attack: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmyStrength {
    pub attacker: f64,
    pub defender: f64,
}

/// Scalar strength of both sides. Walls are not applied here; the round
/// simulator applies them so they show up in every round log.
pub fn army_strength(ctx: &CombatContext, balance: &CombatBalance) -> ArmyStrength {
    let formation = balance.formation(ctx.formation);

    let defending_keys: Vec<CombatKey> = ctx
        .defender
        .combat_keys()
        .chain(ctx.defenses.combat_keys())
        .collect();
    let attacking_keys: Vec<CombatKey> = ctx.attacker.combat_keys().collect();

    let attacker_base: f64 = ctx
        .attacker
        .iter()
        .map(|(unit, qty)| {
            let base = unit.definition().attack as f64 * qty as f64;
            base * counter_multiplier(
                CombatKey::Unit(unit),
                defending_keys.iter().copied(),
                balance,
            )
        })
        .sum();

    let garrison: f64 = ctx
        .defender
        .iter()
        .map(|(unit, qty)| {
            let base = unit.definition().defense as f64 * qty as f64;
            base * counter_multiplier(
                CombatKey::Unit(unit),
                attacking_keys.iter().copied(),
                balance,
            )
        })
        .sum();

    let structures: f64 = ctx
        .defenses
        .iter()
        .map(|(defense, qty)| {
            let base = defense.definition().defense as f64 * qty as f64;
            base * counter_multiplier(
                CombatKey::Defense(defense),
                attacking_keys.iter().copied(),
                balance,
            )
        })
        .sum();

    let attacker = attacker_base * (1.0 + ctx.attacker_tech_bonus) * formation.attacker;
    let defender = (garrison + structures) * (1.0 + ctx.defender_tech_bonus) * formation.defender;

    ArmyStrength {
        attacker: attacker.max(0.0),
        defender: defender.max(0.0),
    }
}

/// Defender multiplier bonus from the walls level, capped.
pub fn walls_bonus(level: u8, balance: &CombatBalance) -> f64 {
    (level as f64 * balance.walls_bonus_per_level).min(balance.walls_bonus_cap)
}

/// Fractional bonus from completed research levels.
pub fn tech_bonus<I>(levels: I, balance: &CombatBalance) -> f64
where
    I: IntoIterator<Item = u8>,
{
    levels
        .into_iter()
        .map(|level| level as f64 * balance.tech_bonus_per_level)
        .sum()
}
