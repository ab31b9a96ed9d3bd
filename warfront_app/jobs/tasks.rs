use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warfront_game::composition::ArmyComposition;
use warfront_types::common::Resources;

/// An attack reached its target and waits to be resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackArrivalTask {
    pub attack_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackTask {
    pub attack_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmyReturnTask {
    pub attack_id: Uuid,
    pub destination_player_id: Uuid,
    pub destination_city_id: Uuid,
    pub from_city_id: Uuid,
    pub units: ArmyComposition,
    pub resources: Resources,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpyMissionTask {
    pub mission_id: Uuid,
}
