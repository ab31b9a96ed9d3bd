use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use warfront_types::{
    army::UnitId, battle::BattleOutcome, common::Resources, espionage::MissionType,
};

/// Side effects of a resolution, handed to an external dispatcher once the
/// surrounding transaction has committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResolutionEvent {
    AttackResolved {
        attack_id: Uuid,
        attacker_player_id: Uuid,
        defender_player_id: Uuid,
        outcome: BattleOutcome,
        loot: Resources,
        attacker_losses: BTreeMap<UnitId, u32>,
        defender_losses: BTreeMap<UnitId, u32>,
    },
    ArmyReturned {
        attack_id: Uuid,
        player_id: Uuid,
        city_id: Uuid,
        loot: Resources,
    },
    SpyMissionCompleted {
        mission_id: Uuid,
        spy_player_id: Uuid,
        mission_type: MissionType,
        success: bool,
        spies_lost: u32,
    },
    SpyMissionDetected {
        mission_id: Uuid,
        target_player_id: Uuid,
        target_city_id: Uuid,
    },
}

impl ResolutionEvent {
    /// Player the event is addressed to.
    pub fn recipient(&self) -> Uuid {
        match self {
            ResolutionEvent::AttackResolved {
                defender_player_id, ..
            } => *defender_player_id,
            ResolutionEvent::ArmyReturned { player_id, .. } => *player_id,
            ResolutionEvent::SpyMissionCompleted { spy_player_id, .. } => *spy_player_id,
            ResolutionEvent::SpyMissionDetected {
                target_player_id, ..
            } => *target_player_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResolutionEvent::AttackResolved { .. } => "attack_resolved",
            ResolutionEvent::ArmyReturned { .. } => "army_returned",
            ResolutionEvent::SpyMissionCompleted { .. } => "spy_mission_completed",
            ResolutionEvent::SpyMissionDetected { .. } => "spy_mission_detected",
        }
    }
}
