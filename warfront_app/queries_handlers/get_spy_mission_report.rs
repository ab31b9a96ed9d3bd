use chrono::Utc;
use std::sync::Arc;

use warfront_game::espionage::apply_intel_decay;
use warfront_types::errors::{ApplicationError, DbError};

use crate::{
    config::Config,
    cqrs::{
        QueryHandler,
        queries::{GetSpyMissionReport, SpyMissionReport},
    },
    uow::UnitOfWork,
};

/// Reads a mission report with decay applied. The stored mission is never
/// touched; decay only shapes what is returned.
pub struct GetSpyMissionReportQueryHandler {}

impl Default for GetSpyMissionReportQueryHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GetSpyMissionReportQueryHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl QueryHandler<GetSpyMissionReport> for GetSpyMissionReportQueryHandler {
    async fn handle(
        &self,
        query: GetSpyMissionReport,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<SpyMissionReport, ApplicationError> {
        let mission = uow.spy_missions().get_by_id(query.mission_id).await?;
        // Other players' missions do not exist as far as the caller knows.
        if mission.spy_player_id != query.player_id {
            return Err(DbError::SpyMissionNotFound(query.mission_id).into());
        }

        let mut report = SpyMissionReport {
            mission_id: mission.id,
            target_city_id: mission.target_city_id,
            mission_type: mission.mission_type,
            status: mission.status,
            spy_count: mission.spy_count,
            spies_lost: mission.spies_lost,
            detected: mission.detected,
            arrival_time: mission.arrival_time,
            age_hours: 0,
            success_rate: mission.success_rate,
            effective_success_rate: None,
            is_stale: false,
            intel: None,
        };

        if let Some(success_rate) = mission.success_rate {
            let decayed = apply_intel_decay(
                success_rate,
                mission.intel.as_ref(),
                mission.arrival_time,
                Utc::now(),
                &config.balance.espionage,
            );
            report.age_hours = decayed.age_hours;
            report.effective_success_rate = Some(decayed.effective_success_rate);
            report.is_stale = decayed.is_stale;
            report.intel = decayed.intel;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;
    use warfront_game::{
        espionage::IntelData,
        test_utils::{SpyMissionFactoryOptions, spy_mission_factory},
    };
    use warfront_types::{Result, common::Resources, espionage::MissionStatus};

    use super::*;
    use crate::test_utils::tests::MockUnitOfWork;

    fn completed_mission(hours_ago: i64) -> warfront_game::models::spy_mission::SpyMission {
        let mut mission = spy_mission_factory(SpyMissionFactoryOptions {
            status: Some(MissionStatus::Completed),
            ..Default::default()
        });
        mission.arrival_time = Utc::now() - Duration::hours(hours_ago) - Duration::minutes(1);
        mission.success_rate = Some(0.8);
        mission.intel = Some(IntelData {
            resources: Some(Resources::new(900, 900, 900)),
            units: None,
        });
        mission
    }

    #[tokio::test]
    async fn test_stale_report_hides_intel_but_keeps_record() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());

        let mission = completed_mission(30);
        mock.spy_missions.insert(&mission);

        let report = GetSpyMissionReportQueryHandler::new()
            .handle(
                GetSpyMissionReport {
                    player_id: mission.spy_player_id,
                    mission_id: mission.id,
                },
                &uow,
                &config,
            )
            .await?;

        assert!(report.is_stale);
        assert!(report.intel.is_none());
        assert_eq!(report.age_hours, 30);
        assert_eq!(report.success_rate, Some(0.8));

        let stored = mock.spy_missions.get(mission.id).unwrap();
        assert_eq!(stored.intel, mission.intel);
        Ok(())
    }

    #[tokio::test]
    async fn test_fresh_report_decays_by_blocks() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());

        let mission = completed_mission(7);
        mock.spy_missions.insert(&mission);

        let report = GetSpyMissionReportQueryHandler::new()
            .handle(
                GetSpyMissionReport {
                    player_id: mission.spy_player_id,
                    mission_id: mission.id,
                },
                &uow,
                &config,
            )
            .await?;

        assert!(!report.is_stale);
        assert!(report.intel.is_some());
        let rate = report.effective_success_rate.unwrap();
        assert!((rate - 0.8 * 0.8).abs() < 1e-9);
        Ok(())
    }

    #[tokio::test]
    async fn test_report_of_another_player_is_not_found() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());

        let mission = completed_mission(1);
        mock.spy_missions.insert(&mission);

        let result = GetSpyMissionReportQueryHandler::new()
            .handle(
                GetSpyMissionReport {
                    player_id: Uuid::new_v4(),
                    mission_id: mission.id,
                },
                &uow,
                &config,
            )
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Db(DbError::SpyMissionNotFound(_)))
        ));
        Ok(())
    }
}
