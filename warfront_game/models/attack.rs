use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use warfront_types::{
    army::UnitId,
    battle::{AttackStatus, AttackType, BattleOutcome, Formation},
    common::Resources,
    errors::GameError,
};

use crate::composition::ArmyComposition;

/// One stack of units sent with an attack. The unit key is kept as stored;
/// it is resolved through [`ArmyComposition::from_stacks`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackWave {
    pub id: Uuid,
    pub unit_key: String,
    pub quantity: u32,
    /// Set once the attack is resolved.
    pub survivors: Option<u32>,
}

impl AttackWave {
    pub fn new(unit: UnitId, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit_key: unit.key().to_string(),
            quantity,
            survivors: None,
        }
    }
}

/// Values fixed at launch time and read back at resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackMetadata {
    pub formation: Formation,
    pub speed_factor: f64,
    pub power_ratio: f64,
    pub is_weak_target: bool,
    pub reward_multiplier: f64,
    pub cost_paid: Resources,
}

impl Default for AttackMetadata {
    fn default() -> Self {
        Self {
            formation: Formation::Line,
            speed_factor: 1.0,
            power_ratio: 1.0,
            is_weak_target: false,
            reward_multiplier: 1.0,
            cost_paid: Resources::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub id: Uuid,
    pub attacker_player_id: Uuid,
    pub attacker_city_id: Uuid,
    pub defender_player_id: Uuid,
    pub defender_city_id: Uuid,
    pub attack_type: AttackType,
    pub status: AttackStatus,
    pub waves: Vec<AttackWave>,
    pub metadata: AttackMetadata,
    pub departed_at: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub outcome: Option<BattleOutcome>,
    pub loot: Resources,
    pub attacker_losses: BTreeMap<UnitId, u32>,
    pub defender_losses: BTreeMap<UnitId, u32>,
}

impl Attack {
    /// Units sent, aggregated over waves.
    pub fn composition(&self) -> ArmyComposition {
        ArmyComposition::from_stacks(self.waves.iter().map(|w| (w.unit_key.as_str(), w.quantity)))
    }

    /// Units still alive, aggregated over waves.
    pub fn survivors(&self) -> ArmyComposition {
        ArmyComposition::from_stacks(
            self.waves
                .iter()
                .map(|w| (w.unit_key.as_str(), w.survivors.unwrap_or(w.quantity))),
        )
    }

    /// Writes survivors back onto the waves, consuming per-unit losses wave
    /// by wave.
    pub fn apply_losses(&mut self, losses: &BTreeMap<UnitId, u32>) {
        let mut remaining = losses.clone();
        for wave in self.waves.iter_mut() {
            let lost = match wave.unit_key.parse::<UnitId>() {
                Ok(unit) => {
                    let left = remaining.entry(unit).or_insert(0);
                    let lost = (*left).min(wave.quantity);
                    *left -= lost;
                    lost
                }
                Err(_) => 0,
            };
            wave.survivors = Some(wave.quantity - lost);
        }
        self.attacker_losses = losses.clone();
    }

    pub fn ensure_status(&self, expected: AttackStatus) -> Result<(), GameError> {
        if self.status != expected {
            return Err(GameError::InvalidAttackStatus {
                attack_id: self.id,
                expected,
                actual: self.status,
            });
        }
        Ok(())
    }
}
