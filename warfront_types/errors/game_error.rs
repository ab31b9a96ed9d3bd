use thiserror::Error;
use uuid::Uuid;

use crate::{army::CombatKey, battle::AttackStatus, espionage::MissionStatus};

/// Errors for domain logic (game rules).
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Not enough resources")]
    NotEnoughResources,

    #[error("Not enough units available to deploy")]
    NotEnoughUnits,

    #[error("No units selected to deploy")]
    NoUnitsSelected,

    #[error("Unknown unit {0}")]
    UnknownUnit(String),

    #[error("Unknown defense {0}")]
    UnknownDefense(String),

    #[error("City {city_id} not owned by player {player_id}")]
    CityNotOwned { city_id: Uuid, player_id: Uuid },

    #[error("Attack {attack_id} not owned by player {player_id}")]
    AttackNotOwned { attack_id: Uuid, player_id: Uuid },

    #[error("Cannot attack your own city")]
    CannotTargetOwnCity,

    #[error("Attack {attack_id} is {actual:?}, expected {expected:?}")]
    InvalidAttackStatus {
        attack_id: Uuid,
        expected: AttackStatus,
        actual: AttackStatus,
    },

    #[error("Spy mission {mission_id} is {actual:?}, expected {expected:?}")]
    InvalidMissionStatus {
        mission_id: Uuid,
        expected: MissionStatus,
        actual: MissionStatus,
    },

    #[error("Invalid spy count {count}: must be between 1 and {max}")]
    InvalidSpyCount { count: u32, max: u32 },

    #[error("Invalid speed factor {0}: must be between 0.5 and 2.0")]
    InvalidSpeedFactor(f64),

    #[error("{subject} both counters and is weak to {target}")]
    ContradictoryMatchup { subject: CombatKey, target: CombatKey },
}
