use std::collections::BTreeMap;
use uuid::Uuid;

use warfront_types::{errors::ApplicationError, research::TechName};

#[async_trait::async_trait]
pub trait ResearchRepository: Send + Sync {
    /// Completed research levels of a player. Techs never researched are absent.
    async fn levels(&self, player_id: Uuid) -> Result<BTreeMap<TechName, u8>, ApplicationError>;
}
