//! Offline battle scenarios.
//!
//! A scenario is a [`CombatContext`] plus what the live resolver would read
//! from the defending city:
//!
//! ```json
//! {
//!   "attack_type": "raid",
//!   "attacker": { "heavy_tank": 50 },
//!   "defender": { "militia": 20 },
//!   "defenses": { "reinforced_wall": 2 },
//!   "walls_level": 10,
//!   "formation": "wedge",
//!   "defender_resources": { "gold": 10000, "metal": 5000, "fuel": 3000 }
//! }
//! ```
use serde::{Deserialize, Serialize};

use warfront_game::{
    balance::BalanceConfig,
    battle::{Battle, CombatOutcome},
    strength::{CombatContext, walls_bonus},
};
use warfront_types::{battle::AttackType, common::Resources};

fn default_reward_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub attack_type: AttackType,
    #[serde(flatten)]
    pub context: CombatContext,
    /// Overrides `walls_bonus` when present.
    #[serde(default)]
    pub walls_level: Option<u8>,
    #[serde(default)]
    pub defender_resources: Resources,
    #[serde(default = "default_reward_multiplier")]
    pub reward_multiplier: f64,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub attack_type: AttackType,
    pub walls_bonus: f64,
    #[serde(flatten)]
    pub outcome: CombatOutcome,
}

impl Scenario {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn run(mut self, balance: &BalanceConfig) -> SimulationReport {
        if let Some(level) = self.walls_level {
            self.context.walls_bonus = walls_bonus(level, &balance.combat);
        }
        let outcome = Battle::new(&self.context, self.attack_type, balance)
            .calculate_battle(&self.defender_resources, self.reward_multiplier);

        SimulationReport {
            attack_type: self.attack_type,
            walls_bonus: self.context.walls_bonus,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warfront_types::{army::UnitId, battle::BattleOutcome, battle::Formation};

    #[test]
    fn test_scenario_runs_a_raid() {
        let raw = r#"{
            "attack_type": "raid",
            "attacker": { "heavy_tank": 50 },
            "defender": { "militia": 20 },
            "formation": "wedge",
            "defender_resources": { "gold": 10000, "metal": 5000, "fuel": 3000 }
        }"#;
        let scenario = Scenario::from_json(raw).unwrap();
        assert_eq!(scenario.context.formation, Formation::Wedge);
        assert_eq!(scenario.reward_multiplier, 1.0);

        let report = scenario.run(&BalanceConfig::default());
        assert_eq!(report.outcome.outcome, BattleOutcome::AttackerVictory);
        assert_eq!(report.outcome.loot, Resources::new(2000, 1000, 600));
        assert_eq!(report.outcome.defender_losses[&UnitId::Militia], 20);
    }

    #[test]
    fn test_walls_level_sets_bonus() {
        let raw = r#"{
            "attack_type": "siege",
            "attacker": { "riflemen": 10 },
            "walls_level": 30
        }"#;
        let report = Scenario::from_json(raw).unwrap().run(&BalanceConfig::default());
        assert_eq!(report.walls_bonus, 2.0);
        assert_eq!(report.outcome.outcome, BattleOutcome::AttackerVictory);
        // no defender, no resources: nothing to take
        assert_eq!(report.outcome.loot, Resources::default());
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let raw = r#"{ "attack_type": "raid", "attacker": { "dragon": 1 } }"#;
        assert!(Scenario::from_json(raw).is_err());
    }
}
