use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use warfront_game::{composition::ArmyComposition, models::spy_mission::SpyMission};
use warfront_types::{
    army::UnitId,
    errors::{ApplicationError, GameError},
    espionage::MissionStatus,
};

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::LaunchSpyMission},
    jobs::{Job, JobPayload, tasks::SpyMissionTask},
    uow::UnitOfWork,
};

/// Spies move twice as fast as armies.
const SPY_TRAVEL_TIME_FACTOR: f64 = 0.5;

pub struct LaunchSpyMissionCommandHandler {}

impl Default for LaunchSpyMissionCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchSpyMissionCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<LaunchSpyMission> for LaunchSpyMissionCommandHandler {
    async fn handle(
        &self,
        command: LaunchSpyMission,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<(), ApplicationError> {
        let max_spies = config.balance.espionage.max_spies;
        if command.spy_count == 0 || command.spy_count > max_spies {
            return Err(GameError::InvalidSpyCount {
                count: command.spy_count,
                max: max_spies,
            }
            .into());
        }

        let city_repo = uow.cities();
        let mut origin = city_repo.get_by_id(command.spy_city_id).await?;
        if origin.player_id != command.player_id {
            return Err(GameError::CityNotOwned {
                city_id: origin.id,
                player_id: command.player_id,
            }
            .into());
        }
        let target = city_repo.get_by_id(command.target_city_id).await?;
        if target.player_id == command.player_id {
            return Err(GameError::CannotTargetOwnCity.into());
        }

        let spies: ArmyComposition = [(UnitId::Spy, command.spy_count)].into_iter().collect();
        origin.deploy(&spies)?;
        city_repo.save(&origin).await?;

        let army_travel = origin
            .position
            .calculate_travel_time_secs(&target.position, config.army_speed);
        let travel_time_secs = (army_travel as f64 * SPY_TRAVEL_TIME_FACTOR).ceil() as i64;

        let departed_at = Utc::now();
        let mission = SpyMission {
            id: command.mission_id,
            spy_player_id: command.player_id,
            spy_city_id: origin.id,
            target_player_id: target.player_id,
            target_city_id: target.id,
            spy_count: command.spy_count,
            mission_type: command.mission_type,
            status: MissionStatus::Traveling,
            departed_at,
            arrival_time: departed_at + Duration::seconds(travel_time_secs),
            success_rate: None,
            detected: false,
            spies_lost: 0,
            intel: None,
        };
        uow.spy_missions().add(&mission).await?;

        let payload = JobPayload::new(
            "SpyMission",
            serde_json::to_value(&SpyMissionTask {
                mission_id: mission.id,
            })?,
        );
        let job = Job::with_deadline(command.player_id, origin.id, payload, mission.arrival_time);
        uow.jobs().add(&job).await?;

        info!(
            mission_id = %mission.id,
            mission_type = ?mission.mission_type,
            spy_count = mission.spy_count,
            arrival_at = %mission.arrival_time,
            "Spy mission launched."
        );
        Ok(())
    }
}
