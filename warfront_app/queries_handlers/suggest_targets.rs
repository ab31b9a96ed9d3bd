use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use warfront_game::pvp::{SuggestedTarget, suggest_targets};
use warfront_types::errors::ApplicationError;

use crate::{
    config::Config,
    cqrs::{QueryHandler, queries::SuggestTargets},
    power::PlayerPowerService,
    uow::UnitOfWork,
};

/// Ranks the candidate players by how fair a fight against them would be.
pub struct SuggestTargetsQueryHandler {
    power: Arc<PlayerPowerService>,
}

impl SuggestTargetsQueryHandler {
    pub fn new(power: Arc<PlayerPowerService>) -> Self {
        Self { power }
    }
}

#[async_trait::async_trait]
impl QueryHandler<SuggestTargets> for SuggestTargetsQueryHandler {
    async fn handle(
        &self,
        query: SuggestTargets,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<Vec<SuggestedTarget>, ApplicationError> {
        let attacker_power = self
            .power
            .get_player_power(uow, query.player_id, false)
            .await?;

        let mut candidates: Vec<(Uuid, u64)> = Vec::with_capacity(query.candidate_player_ids.len());
        for candidate in query.candidate_player_ids {
            if candidate == query.player_id || candidates.iter().any(|(id, _)| *id == candidate) {
                continue;
            }
            let power = self.power.get_player_power(uow, candidate, false).await?;
            candidates.push((candidate, power));
        }

        let mut targets = suggest_targets(attacker_power, candidates, &config.balance.pvp);
        targets.truncate(query.limit);
        debug!(player_id = %query.player_id, count = targets.len(), "Suggested targets");
        Ok(targets)
    }
}
