use uuid::Uuid;

use warfront_game::models::spy_mission::SpyMission;
use warfront_types::{errors::ApplicationError, espionage::MissionStatus};

#[async_trait::async_trait]
pub trait SpyMissionRepository: Send + Sync {
    async fn add(&self, mission: &SpyMission) -> Result<(), ApplicationError>;

    async fn get_by_id(&self, id: Uuid) -> Result<SpyMission, ApplicationError>;

    async fn save(&self, mission: &SpyMission) -> Result<(), ApplicationError>;

    /// Moves the mission from `from` to `to` only if it is currently in
    /// `from`. Returns `false` when another worker got there first.
    /// Must be atomic with respect to concurrent callers.
    async fn transition_status(
        &self,
        id: Uuid,
        from: MissionStatus,
        to: MissionStatus,
    ) -> Result<bool, ApplicationError>;
}
