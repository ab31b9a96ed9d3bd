use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warfront_types::battle::{BattleOutcome, Formation};

use crate::{
    battle::{CombatOutcome, RoundLog},
    strength::CombatContext,
};

/// Audit trail of a resolved fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseReport {
    pub attack_id: Uuid,
    pub outcome: BattleOutcome,
    pub combat_rounds: u32,
    pub rounds: Vec<RoundLog>,
    pub initial_attacker_strength: f64,
    pub initial_defender_strength: f64,
    pub final_attacker_strength: f64,
    pub final_defender_strength: f64,
    pub walls_bonus: f64,
    pub attacker_tech_bonus: f64,
    pub defender_tech_bonus: f64,
    pub formation: Formation,
    /// The attacker paid the weak-target penalty for this fight.
    #[serde(default)]
    pub is_weak_target_attack: bool,
    pub created_at: DateTime<Utc>,
}

impl DefenseReport {
    pub fn new(attack_id: Uuid, ctx: &CombatContext, outcome: &CombatOutcome) -> Self {
        Self {
            attack_id,
            outcome: outcome.outcome,
            combat_rounds: outcome.rounds.len() as u32,
            rounds: outcome.rounds.clone(),
            initial_attacker_strength: outcome.initial_attacker_strength,
            initial_defender_strength: outcome.initial_defender_strength,
            final_attacker_strength: outcome.final_attacker_strength,
            final_defender_strength: outcome.final_defender_strength,
            walls_bonus: ctx.walls_bonus,
            attacker_tech_bonus: ctx.attacker_tech_bonus,
            defender_tech_bonus: ctx.defender_tech_bonus,
            formation: ctx.formation,
            is_weak_target_attack: ctx.is_weak_target_attack,
            created_at: Utc::now(),
        }
    }
}
