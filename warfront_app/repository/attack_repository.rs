use uuid::Uuid;

use warfront_game::models::attack::Attack;
use warfront_types::{battle::AttackStatus, errors::ApplicationError};

#[async_trait::async_trait]
pub trait AttackRepository: Send + Sync {
    async fn add(&self, attack: &Attack) -> Result<(), ApplicationError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Attack, ApplicationError>;

    /// Persists the whole record, waves included.
    async fn save(&self, attack: &Attack) -> Result<(), ApplicationError>;

    /// Moves the attack from `from` to `to` only if it is currently in `from`.
    /// Returns `false` when another worker got there first.
    /// Must be atomic with respect to concurrent callers.
    async fn transition_status(
        &self,
        id: Uuid,
        from: AttackStatus,
        to: AttackStatus,
    ) -> Result<bool, ApplicationError>;

    /// Attacks launched by a player, any status.
    async fn list_by_player_id(&self, player_id: Uuid) -> Result<Vec<Attack>, ApplicationError>;
}
