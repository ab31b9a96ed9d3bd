use std::sync::Arc;

use warfront_game::models::report::DefenseReport;
use warfront_types::errors::{ApplicationError, GameError};

use crate::{
    config::Config,
    cqrs::{QueryHandler, queries::GetDefenseReport},
    uow::UnitOfWork,
};

pub struct GetDefenseReportQueryHandler {}

impl Default for GetDefenseReportQueryHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GetDefenseReportQueryHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl QueryHandler<GetDefenseReport> for GetDefenseReportQueryHandler {
    async fn handle(
        &self,
        query: GetDefenseReport,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<DefenseReport, ApplicationError> {
        let attack = uow.attacks().get_by_id(query.attack_id).await?;
        if attack.attacker_player_id != query.player_id
            && attack.defender_player_id != query.player_id
        {
            return Err(GameError::AttackNotOwned {
                attack_id: attack.id,
                player_id: query.player_id,
            }
            .into());
        }
        uow.reports().get_defense_report(attack.id).await
    }
}
