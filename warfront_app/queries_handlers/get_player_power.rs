use std::sync::Arc;

use warfront_game::pvp::PowerBreakdown;
use warfront_types::errors::ApplicationError;

use crate::{
    config::Config,
    cqrs::{QueryHandler, queries::GetPlayerPower},
    power::PlayerPowerService,
    uow::UnitOfWork,
};

/// Always recomputes, so the breakdown is exact. The cached total is
/// refreshed as a side effect.
pub struct GetPlayerPowerQueryHandler {
    power: Arc<PlayerPowerService>,
}

impl GetPlayerPowerQueryHandler {
    pub fn new(power: Arc<PlayerPowerService>) -> Self {
        Self { power }
    }
}

#[async_trait::async_trait]
impl QueryHandler<GetPlayerPower> for GetPlayerPowerQueryHandler {
    async fn handle(
        &self,
        query: GetPlayerPower,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<PowerBreakdown, ApplicationError> {
        self.power.power_breakdown(uow, query.player_id).await
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use warfront_game::test_utils::{CityFactoryOptions, city_factory};
    use warfront_types::{Result, army::UnitId, common::Resources};

    use super::*;
    use crate::test_utils::tests::MockUnitOfWork;

    #[tokio::test]
    async fn test_breakdown_over_all_cities() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());
        let power = Arc::new(PlayerPowerService::from_config(&config));

        let player_id = Uuid::new_v4();
        let mut first = city_factory(CityFactoryOptions {
            player_id: Some(player_id),
            ..Default::default()
        });
        first.garrison.add(UnitId::Riflemen, 10);
        let second = city_factory(CityFactoryOptions {
            player_id: Some(player_id),
            resources: Some(Resources::new(1000, 1000, 1000)),
            ..Default::default()
        });
        mock.cities.insert(&first);
        mock.cities.insert(&second);

        let breakdown = GetPlayerPowerQueryHandler::new(power.clone())
            .handle(GetPlayerPower { player_id }, &uow, &config)
            .await?;

        assert_eq!(breakdown.city_count, 2);
        assert_eq!(breakdown.cities, 2000);
        assert_eq!(breakdown.units, 100);
        assert_eq!(breakdown.resources, 100);
        assert_eq!(breakdown.total, 2200);
        assert_eq!(power.get_player_power(&uow, player_id, false).await?, 2200);
        Ok(())
    }
}
