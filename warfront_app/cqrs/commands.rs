use uuid::Uuid;

use warfront_game::composition::ArmyComposition;
use warfront_types::{
    battle::{AttackType, Formation},
    espionage::MissionType,
};

use crate::cqrs::Command;

#[derive(Debug, Clone)]
pub struct LaunchAttack {
    pub attack_id: Uuid,
    pub player_id: Uuid,
    pub origin_city_id: Uuid,
    pub target_city_id: Uuid,
    pub attack_type: AttackType,
    pub units: ArmyComposition,
    pub formation: Formation,
    /// Defaults to 1.0.
    pub speed_factor: Option<f64>,
}

impl Command for LaunchAttack {}

#[derive(Debug, Clone)]
pub struct CancelAttack {
    pub player_id: Uuid,
    pub attack_id: Uuid,
}

impl Command for CancelAttack {}

#[derive(Debug, Clone)]
pub struct LaunchSpyMission {
    pub mission_id: Uuid,
    pub player_id: Uuid,
    pub spy_city_id: Uuid,
    pub target_city_id: Uuid,
    pub spy_count: u32,
    pub mission_type: MissionType,
}

impl Command for LaunchSpyMission {}
