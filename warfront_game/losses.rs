use std::collections::BTreeMap;

use warfront_types::{army::UnitId, battle::AttackType, common::Resources};

use crate::{balance::LootBalance, composition::ArmyComposition};

/// Fraction of a side's strength lost, in `[0, 1]`. An army that started with
/// no strength loses nothing.
pub fn loss_rate(strength_lost: f64, total_strength: f64) -> f64 {
    if total_strength <= 0.0 {
        return 0.0;
    }
    (strength_lost / total_strength).clamp(0.0, 1.0)
}

/// Applies the same loss rate to every stack: `floor(quantity * rate)`.
/// Losses are strength-proportional, not counter-proportional.
pub fn calculate_losses(army: &ArmyComposition, rate: f64) -> BTreeMap<UnitId, u32> {
    let rate = rate.clamp(0.0, 1.0);
    army.iter()
        .map(|(unit, qty)| {
            let lost = (qty as f64 * rate).floor() as u32;
            (unit, lost.min(qty))
        })
        .collect()
}

/// Resources taken from the defender on an attacker victory, before any PvP
/// reward scaling.
pub fn calculate_loot(defender: &Resources, attack_type: AttackType, balance: &LootBalance) -> Resources {
    *defender * balance.percentage(attack_type)
}

/// Stacks left after subtracting losses.
pub fn survivors(army: &ArmyComposition, losses: &BTreeMap<UnitId, u32>) -> ArmyComposition {
    army.iter()
        .map(|(unit, qty)| (unit, qty.saturating_sub(losses.get(&unit).copied().unwrap_or(0))))
        .collect()
}
