use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warfront_types::{
    errors::GameError,
    espionage::{MissionStatus, MissionType},
};

use crate::espionage::{IntelData, SpyMissionOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpyMission {
    pub id: Uuid,
    pub spy_player_id: Uuid,
    pub spy_city_id: Uuid,
    pub target_player_id: Uuid,
    pub target_city_id: Uuid,
    pub spy_count: u32,
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub departed_at: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub success_rate: Option<f64>,
    pub detected: bool,
    pub spies_lost: u32,
    pub intel: Option<IntelData>,
}

impl SpyMission {
    pub fn ensure_traveling(&self) -> Result<(), GameError> {
        if self.status != MissionStatus::Traveling {
            return Err(GameError::InvalidMissionStatus {
                mission_id: self.id,
                expected: MissionStatus::Traveling,
                actual: self.status,
            });
        }
        Ok(())
    }

    /// Records the outcome and moves to the matching terminal state.
    pub fn complete(&mut self, outcome: &SpyMissionOutcome) {
        self.status = if outcome.success {
            MissionStatus::Completed
        } else {
            MissionStatus::Failed
        };
        self.success_rate = Some(outcome.success_rate);
        self.detected = outcome.detected;
        self.spies_lost = outcome.spies_lost;
        self.intel = outcome.intel.clone();
    }

    pub fn surviving_spies(&self) -> u32 {
        self.spy_count.saturating_sub(self.spies_lost)
    }
}
