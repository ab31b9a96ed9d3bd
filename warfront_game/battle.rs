use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use warfront_types::{
    army::UnitId,
    battle::{AttackType, BattleOutcome, Formation},
    common::Resources,
};

use crate::{
    balance::{BalanceConfig, CombatBalance},
    losses::{calculate_loot, calculate_losses, loss_rate},
    pvp::apply_reward_scaling,
    strength::{army_strength, ArmyStrength, CombatContext},
};

/// One attrition round. Reported strengths are clamped at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundLog {
    pub round: u32,
    pub attacker_strength_before: f64,
    pub defender_strength_before: f64,
    pub attacker_strength_after: f64,
    pub defender_strength_after: f64,
    pub attacker_damage: f64,
    pub defender_damage: f64,
    pub formation: Formation,
    pub walls_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub rounds: Vec<RoundLog>,
    pub outcome: BattleOutcome,
    pub final_attacker_strength: f64,
    pub final_defender_strength: f64,
}

/// Runs the bounded attrition loop.
///
/// Both sides deal `round_damage_ratio` of their pre-round strength at the
/// same time. The loop stops as soon as one side is at or below zero, or at
/// `max_rounds`. The winner is decided on the unclamped values.
pub fn simulate_combat(
    attacker_strength: f64,
    defender_strength: f64,
    walls_bonus: f64,
    formation: Formation,
    balance: &CombatBalance,
) -> SimulationResult {
    let mut att = attacker_strength;
    let mut def = defender_strength * (1.0 + walls_bonus);
    let mut rounds = Vec::new();
    let mut round = 0;

    while att > 0.0 && def > 0.0 && round < balance.max_rounds {
        round += 1;

        let attacker_damage = att * balance.round_damage_ratio;
        let defender_damage = def * balance.round_damage_ratio;
        let (att_before, def_before) = (att, def);

        def -= attacker_damage;
        att -= defender_damage;

        rounds.push(RoundLog {
            round,
            attacker_strength_before: att_before.max(0.0),
            defender_strength_before: def_before.max(0.0),
            attacker_strength_after: att.max(0.0),
            defender_strength_after: def.max(0.0),
            attacker_damage,
            defender_damage,
            formation,
            walls_bonus,
        });
    }

    let outcome = if att > def {
        BattleOutcome::AttackerVictory
    } else if def > att {
        BattleOutcome::DefenderVictory
    } else {
        BattleOutcome::Draw
    };

    SimulationResult {
        rounds,
        outcome,
        final_attacker_strength: att.max(0.0),
        final_defender_strength: def.max(0.0),
    }
}

/// Terminal record of a resolved fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub rounds: Vec<RoundLog>,
    pub outcome: BattleOutcome,
    pub initial_attacker_strength: f64,
    pub initial_defender_strength: f64,
    pub final_attacker_strength: f64,
    pub final_defender_strength: f64,
    pub attacker_losses: BTreeMap<UnitId, u32>,
    pub defender_losses: BTreeMap<UnitId, u32>,
    pub loot: Resources,
}

/// A fight between an attacking army and a defending city, ready to resolve.
pub struct Battle<'a> {
    context: &'a CombatContext,
    attack_type: AttackType,
    balance: &'a BalanceConfig,
}

impl<'a> Battle<'a> {
    pub fn new(context: &'a CombatContext, attack_type: AttackType, balance: &'a BalanceConfig) -> Self {
        Self {
            context,
            attack_type,
            balance,
        }
    }

    pub fn strength(&self) -> ArmyStrength {
        army_strength(self.context, &self.balance.combat)
    }

    /// Runs the whole pipeline: strength, rounds, losses and loot. Loot is
    /// scaled by `reward_multiplier` and never exceeds what the defender holds.
    pub fn calculate_battle(&self, defender_resources: &Resources, reward_multiplier: f64) -> CombatOutcome {
        let strength = self.strength();
        let sim = simulate_combat(
            strength.attacker,
            strength.defender,
            self.context.walls_bonus,
            self.context.formation,
            &self.balance.combat,
        );

        let attacker_rate = loss_rate(
            strength.attacker - sim.final_attacker_strength,
            strength.attacker,
        );
        let walled_defender = strength.defender * (1.0 + self.context.walls_bonus);
        let defender_rate = loss_rate(
            walled_defender - sim.final_defender_strength,
            walled_defender,
        );

        let loot = if sim.outcome == BattleOutcome::AttackerVictory {
            let base = calculate_loot(defender_resources, self.attack_type, &self.balance.loot);
            let scaled = apply_reward_scaling(&base, reward_multiplier);
            Resources::new(
                scaled.gold.min(defender_resources.gold),
                scaled.metal.min(defender_resources.metal),
                scaled.fuel.min(defender_resources.fuel),
            )
        } else {
            Resources::default()
        };

        CombatOutcome {
            outcome: sim.outcome,
            initial_attacker_strength: strength.attacker,
            initial_defender_strength: strength.defender,
            final_attacker_strength: sim.final_attacker_strength,
            final_defender_strength: sim.final_defender_strength,
            attacker_losses: calculate_losses(&self.context.attacker, attacker_rate),
            defender_losses: calculate_losses(&self.context.defender, defender_rate),
            rounds: sim.rounds,
            loot,
        }
    }
}
