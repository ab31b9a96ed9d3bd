use async_trait::async_trait;
use tracing::{info, instrument};

use warfront_game::events::ResolutionEvent;
use warfront_types::errors::ApplicationError;

use crate::jobs::{
    Job,
    handler::{JobHandler, JobHandlerContext},
    tasks::ArmyReturnTask,
};

pub struct ArmyReturnJobHandler {
    payload: ArmyReturnTask,
}

impl ArmyReturnJobHandler {
    pub fn new(payload: ArmyReturnTask) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl JobHandler for ArmyReturnJobHandler {
    #[instrument(skip_all, fields(
        task_type = "ArmyReturn",
        attack_id = %self.payload.attack_id,
        city_id = %self.payload.destination_city_id
    ))]
    async fn handle<'ctx, 'a>(
        &'ctx self,
        ctx: &'ctx JobHandlerContext<'a>,
        _job: &'ctx Job,
    ) -> Result<(), ApplicationError> {
        info!("Execute ArmyReturn Job");

        let city_repo = ctx.uow.cities();
        let mut city = city_repo.get_by_id(self.payload.destination_city_id).await?;

        city.garrison.merge(&self.payload.units);
        city.store(&self.payload.resources);
        city_repo.save(&city).await?;

        ctx.stale_power.mark(&[self.payload.destination_player_id]);

        ctx.events.push(ResolutionEvent::ArmyReturned {
            attack_id: self.payload.attack_id,
            player_id: self.payload.destination_player_id,
            city_id: city.id,
            loot: self.payload.resources,
        });

        info!(
            units = self.payload.units.total_units(),
            resources = ?self.payload.resources,
            "Army returned home."
        );
        Ok(())
    }
}
