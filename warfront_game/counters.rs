use std::collections::BTreeSet;

use warfront_types::{army::CombatKey, errors::GameError};

use crate::balance::CombatBalance;

/// Multiplier applied to `subject` when facing the given opposing keys.
///
/// Starts at 1.0 and, for each distinct opposing key, adds the weighted
/// counter bonus when `subject` counters it and the weighted weak penalty
/// when `subject` is weak to it. Matchups accumulate additively and the
/// result is not normalized by the opposing army size, nor clamped.
pub fn counter_multiplier<I>(subject: CombatKey, opposing: I, balance: &CombatBalance) -> f64
where
    I: IntoIterator<Item = CombatKey>,
{
    let distinct: BTreeSet<CombatKey> = opposing.into_iter().collect();

    distinct.iter().fold(1.0, |multiplier, key| {
        let mut m = multiplier;
        if subject.counters(key) {
            m += balance.counter_step();
        }
        if subject.is_weak_to(key) {
            m += balance.weak_step();
        }
        m
    })
}

/// Rejects catalog entries that both counter and are weak to the same key.
pub fn validate_catalog() -> Result<(), GameError> {
    for subject in CombatKey::all() {
        if let Some(target) = CombatKey::all().find(|t| subject.counters(t) && subject.is_weak_to(t)) {
            return Err(GameError::ContradictoryMatchup { subject, target });
        }
    }
    Ok(())
}
