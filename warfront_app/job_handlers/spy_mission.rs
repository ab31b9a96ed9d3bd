use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Mutex;
use tracing::{info, instrument};

use warfront_game::{
    espionage::{SpyTarget, resolve_spy_mission},
    events::ResolutionEvent,
};
use warfront_types::{army::UnitId, errors::ApplicationError, espionage::MissionStatus};

use crate::{
    job_handlers::helpers::transition_mission,
    jobs::{
        Job,
        handler::{JobHandler, JobHandlerContext},
        tasks::SpyMissionTask,
    },
};

/// Resolves a spy mission once the spies reach their target.
pub struct SpyMissionJobHandler {
    payload: SpyMissionTask,
    rng: Mutex<StdRng>,
}

impl SpyMissionJobHandler {
    pub fn new(payload: SpyMissionTask) -> Self {
        Self::with_rng(payload, StdRng::from_entropy())
    }

    /// Uses the given random source, for reproducible resolutions.
    pub fn with_rng(payload: SpyMissionTask, rng: StdRng) -> Self {
        Self {
            payload,
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl JobHandler for SpyMissionJobHandler {
    #[instrument(skip_all, fields(
        task_type = "SpyMission",
        mission_id = %self.payload.mission_id
    ))]
    async fn handle<'ctx, 'a>(
        &'ctx self,
        ctx: &'ctx JobHandlerContext<'a>,
        _job: &'ctx Job,
    ) -> Result<(), ApplicationError> {
        info!("Execute SpyMission Job");

        let mission_repo = ctx.uow.spy_missions();
        let city_repo = ctx.uow.cities();

        let mut mission = mission_repo.get_by_id(self.payload.mission_id).await?;
        mission.ensure_traveling()?;

        let target = city_repo.get_by_id(mission.target_city_id).await?;

        let outcome = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| ApplicationError::Unknown(e.to_string()))?;
            resolve_spy_mission(
                &mut *rng,
                mission.spy_count,
                mission.mission_type,
                SpyTarget {
                    counter_intel_level: target.counter_intel_level(),
                    resources: &target.resources,
                    garrison: &target.garrison,
                },
                &ctx.config.balance.espionage,
            )
        };

        mission.complete(&outcome);
        // Claim before writing anything so a concurrent run cannot return the
        // same spies twice.
        transition_mission(
            &ctx.uow,
            mission.id,
            MissionStatus::Traveling,
            mission.status,
        )
        .await?;
        mission_repo.save(&mission).await?;

        let survivors = mission.surviving_spies();
        if survivors > 0 {
            let mut origin = city_repo.get_by_id(mission.spy_city_id).await?;
            origin.garrison.add(UnitId::Spy, survivors);
            city_repo.save(&origin).await?;
        }

        ctx.events.push(ResolutionEvent::SpyMissionCompleted {
            mission_id: mission.id,
            spy_player_id: mission.spy_player_id,
            mission_type: mission.mission_type,
            success: outcome.success,
            spies_lost: outcome.spies_lost,
        });
        if outcome.detected {
            ctx.events.push(ResolutionEvent::SpyMissionDetected {
                mission_id: mission.id,
                target_player_id: mission.target_player_id,
                target_city_id: mission.target_city_id,
            });
        }

        info!(
            success = outcome.success,
            detected = outcome.detected,
            success_rate = outcome.success_rate,
            spies_lost = outcome.spies_lost,
            "Spy mission resolved."
        );
        Ok(())
    }
}
