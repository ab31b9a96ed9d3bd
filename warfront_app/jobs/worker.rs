use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time};
use tracing::{debug, error, info, instrument};

use warfront_types::errors::ApplicationError;

use crate::{
    config::Config,
    events::{EventDispatcher, dispatch_events},
    jobs::{
        Job,
        handler::{JobHandlerContext, JobRegistry},
    },
    power::PlayerPowerService,
    uow::UnitOfWorkProvider,
};

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const BATCH_SIZE: i64 = 10;

/// Responsible for polling and executing due jobs, one transaction per job.
pub struct JobWorker {
    uow_provider: Arc<dyn UnitOfWorkProvider>,
    registry: Arc<dyn JobRegistry>,
    config: Arc<Config>,
    power: Arc<PlayerPowerService>,
    dispatcher: Arc<dyn EventDispatcher>,
}

impl JobWorker {
    pub fn new(
        uow_provider: Arc<dyn UnitOfWorkProvider>,
        registry: Arc<dyn JobRegistry>,
        config: Arc<Config>,
        power: Arc<PlayerPowerService>,
        dispatcher: Arc<dyn EventDispatcher>,
    ) -> Self {
        Self {
            uow_provider,
            registry,
            config,
            power,
            dispatcher,
        }
    }

    /// Run worker loop inside a tokio task.
    pub fn run(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = time::interval(POLL_INTERVAL);
            info!("Job worker started.");

            loop {
                interval.tick().await;
                if let Err(e) = self.process_due_jobs().await {
                    error!(error = %e, "Error while processing jobs");
                }
            }
        })
    }

    /// Locks the next batch of due jobs and runs them. Returns how many jobs
    /// were picked up.
    pub async fn process_due_jobs(&self) -> Result<usize, ApplicationError> {
        let due_jobs = {
            let uow = self.uow_provider.begin().await?;
            match uow.jobs().find_and_lock_due_jobs(BATCH_SIZE).await {
                Ok(jobs) => {
                    uow.commit().await?;
                    jobs
                }
                Err(e) => {
                    uow.rollback().await?;
                    return Err(e);
                }
            }
        };
        if due_jobs.is_empty() {
            return Ok(0);
        }
        debug!(count = due_jobs.len(), "Found jobs to be executed.");

        for job in &due_jobs {
            if let Err(e) = self.process_job(job).await {
                error!(job_id = %job.id, task_type = %job.task.task_type, error = %e, "Job has failed");
            }
        }
        Ok(due_jobs.len())
    }

    /// Runs one job in its own transaction. On failure everything the handler
    /// wrote is rolled back and the job is marked failed; retrying is left to
    /// whoever schedules jobs.
    #[instrument(skip_all, fields(job_id = %job.id, task_type = %job.task.task_type))]
    pub async fn process_job(&self, job: &Job) -> Result<(), ApplicationError> {
        let handler = match self.registry.get_handler(&job.task.task_type, &job.task.data) {
            Ok(handler) => handler,
            Err(e) => {
                self.mark_as_failed(job, &e).await?;
                return Err(e);
            }
        };

        let uow = self.uow_provider.begin().await?;
        let ctx = JobHandlerContext::new(uow, self.config.clone(), self.power.clone());

        let result = handler.handle(&ctx, job).await;
        let JobHandlerContext {
            uow,
            events,
            stale_power,
            ..
        } = ctx;

        match result {
            Ok(()) => {
                if let Err(e) = uow.jobs().mark_as_completed(job.id).await {
                    uow.rollback().await?;
                    return Err(e);
                }
                uow.commit().await?;
                self.power.invalidate_all(&stale_power.take());
                dispatch_events(self.dispatcher.as_ref(), events.take()).await;
                Ok(())
            }
            Err(e) => {
                uow.rollback().await?;
                self.mark_as_failed(job, &e).await?;
                Err(e)
            }
        }
    }

    async fn mark_as_failed(&self, job: &Job, cause: &ApplicationError) -> Result<(), ApplicationError> {
        let uow = self.uow_provider.begin().await?;
        uow.jobs().mark_as_failed(job.id, &cause.to_string()).await?;
        uow.commit().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;
    use warfront_game::{
        events::ResolutionEvent,
        models::attack::AttackWave,
        pvp::calculate_player_power,
        test_utils::{AttackFactoryOptions, CityFactoryOptions, attack_factory, city_factory},
    };
    use warfront_types::{
        Result,
        army::UnitId,
        battle::{AttackStatus, BattleOutcome},
        common::Resources,
        map::Position,
    };

    use super::*;
    use crate::{
        job_registry::AppJobRegistry,
        jobs::{
            JobPayload, JobStatus,
            tasks::{ArmyReturnTask, AttackArrivalTask, AttackTask},
        },
        uow::UnitOfWork,
        repository::JobRepository,
        test_utils::tests::{
            MockUnitOfWork, MockUnitOfWorkProvider, RecordingEventDispatcher, setup_test_job,
        },
    };

    fn worker(mock: &MockUnitOfWork, dispatcher: &RecordingEventDispatcher) -> JobWorker {
        let config = Config::default();
        let power = Arc::new(PlayerPowerService::from_config(&config));
        worker_with_power(mock, dispatcher, power)
    }

    fn worker_with_power(
        mock: &MockUnitOfWork,
        dispatcher: &RecordingEventDispatcher,
        power: Arc<PlayerPowerService>,
    ) -> JobWorker {
        JobWorker::new(
            Arc::new(MockUnitOfWorkProvider::with_uow(mock.clone())),
            Arc::new(AppJobRegistry::new()),
            Arc::new(Config::default()),
            power,
            Arc::new(dispatcher.clone()),
        )
    }

    #[tokio::test]
    async fn test_arrival_then_resolution_across_two_passes() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let dispatcher = RecordingEventDispatcher::new();

        let attacker = city_factory(CityFactoryOptions {
            position: Some(Position::new(0, 0)),
            ..Default::default()
        });
        let defender = city_factory(CityFactoryOptions {
            position: Some(Position::new(3, 4)),
            resources: Some(Resources::new(1000, 1000, 1000)),
            garrison: Some([(UnitId::Militia, 5)].into_iter().collect()),
            ..Default::default()
        });
        let attack = attack_factory(AttackFactoryOptions {
            attacker: Some(attacker.clone()),
            defender: Some(defender.clone()),
            waves: Some(vec![AttackWave::new(UnitId::HeavyTank, 40)]),
            ..Default::default()
        });
        mock.cities.insert(&attacker);
        mock.cities.insert(&defender);
        mock.attacks.insert(&attack);

        // Deadline already passed.
        let arrival = setup_test_job(
            "AttackArrival",
            &AttackArrivalTask {
                attack_id: attack.id,
            },
        );
        mock.jobs.add(&arrival).await?;

        let worker = worker(&mock, &dispatcher);

        assert_eq!(worker.process_due_jobs().await?, 1);
        assert_eq!(mock.attacks.get(attack.id).unwrap().status, AttackStatus::Arrived);
        assert!(dispatcher.events().is_empty());

        assert_eq!(worker.process_due_jobs().await?, 1);
        let resolved = mock.attacks.get(attack.id).unwrap();
        assert_eq!(resolved.status, AttackStatus::Completed);
        assert_eq!(resolved.outcome, Some(BattleOutcome::AttackerVictory));

        let events = dispatcher.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            ResolutionEvent::AttackResolved { attack_id, .. } if attack_id == attack.id
        ));

        let jobs = mock.jobs.all();
        let completed = jobs.iter().filter(|j| j.status == JobStatus::Completed).count();
        assert_eq!(completed, 2);
        // The army is on its way home and not due yet.
        let pending: Vec<&Job> = jobs.iter().filter(|j| j.status == JobStatus::Pending).collect();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].task.task_type, "ArmyReturn");

        assert_eq!(worker.process_due_jobs().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_task_is_marked_failed() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let dispatcher = RecordingEventDispatcher::new();

        let job = Job::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            0,
            JobPayload::new("Teleport", json!({})),
        );
        mock.jobs.add(&job).await?;

        assert_eq!(worker(&mock, &dispatcher).process_due_jobs().await?, 1);
        assert_eq!(mock.jobs.get_by_id(job.id).await?.status, JobStatus::Failed);
        assert_eq!(dispatcher.attempts(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_handler_marks_job_failed_without_events() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let dispatcher = RecordingEventDispatcher::new();

        // The attack does not exist.
        let job = setup_test_job(
            "AttackArrival",
            &AttackArrivalTask {
                attack_id: Uuid::new_v4(),
            },
        );
        mock.jobs.add(&job).await?;

        let worker = worker(&mock, &dispatcher);
        assert_eq!(worker.process_due_jobs().await?, 1);
        assert_eq!(mock.jobs.get_by_id(job.id).await?.status, JobStatus::Failed);
        assert_eq!(dispatcher.attempts(), 0);
        assert_eq!(worker.process_due_jobs().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_power_is_invalidated_after_resolution_commits() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let dispatcher = RecordingEventDispatcher::new();
        let config = Config::default();
        let power = Arc::new(PlayerPowerService::from_config(&config));
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());

        let mut attacker = city_factory(CityFactoryOptions {
            position: Some(Position::new(0, 0)),
            ..Default::default()
        });
        let defender = city_factory(CityFactoryOptions {
            position: Some(Position::new(3, 4)),
            resources: Some(Resources::new(1000, 1000, 1000)),
            garrison: Some([(UnitId::Militia, 5)].into_iter().collect()),
            ..Default::default()
        });
        let attack = attack_factory(AttackFactoryOptions {
            attacker: Some(attacker.clone()),
            defender: Some(defender.clone()),
            status: Some(AttackStatus::Arrived),
            waves: Some(vec![AttackWave::new(UnitId::HeavyTank, 40)]),
            ..Default::default()
        });
        mock.cities.insert(&attacker);
        mock.cities.insert(&defender);
        mock.attacks.insert(&attack);

        let defender_before = power.get_player_power(&uow, defender.player_id, false).await?;
        power.get_player_power(&uow, attacker.player_id, false).await?;

        // Trained at home while the army was away.
        attacker.garrison.add(UnitId::Riflemen, 10);
        mock.cities.insert(&attacker);

        let job = setup_test_job("Attack", &AttackTask { attack_id: attack.id });
        mock.jobs.add(&job).await?;

        let worker = worker_with_power(&mock, &dispatcher, power.clone());
        assert_eq!(worker.process_due_jobs().await?, 1);
        assert_eq!(mock.attacks.get(attack.id).unwrap().status, AttackStatus::Completed);

        let balance = &config.balance.pvp;
        let defender_after =
            calculate_player_power(&[mock.cities.get(defender.id).unwrap()], balance).total;
        let attacker_after =
            calculate_player_power(&[mock.cities.get(attacker.id).unwrap()], balance).total;
        assert!(defender_after < defender_before);
        assert_eq!(
            power.get_player_power(&uow, defender.player_id, false).await?,
            defender_after
        );
        assert_eq!(
            power.get_player_power(&uow, attacker.player_id, false).await?,
            attacker_after
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_power_is_invalidated_after_army_return_commits() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let dispatcher = RecordingEventDispatcher::new();
        let config = Config::default();
        let power = Arc::new(PlayerPowerService::from_config(&config));
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());

        let home = city_factory(CityFactoryOptions::default());
        mock.cities.insert(&home);
        let before = power.get_player_power(&uow, home.player_id, false).await?;

        let task = ArmyReturnTask {
            attack_id: Uuid::new_v4(),
            destination_player_id: home.player_id,
            destination_city_id: home.id,
            from_city_id: Uuid::new_v4(),
            units: [(UnitId::HeavyTank, 10)].into_iter().collect(),
            resources: Resources::new(200, 0, 0),
        };
        mock.jobs.add(&setup_test_job("ArmyReturn", &task)).await?;

        let worker = worker_with_power(&mock, &dispatcher, power.clone());
        assert_eq!(worker.process_due_jobs().await?, 1);

        // 10 heavy tanks at 80 and 200 gold at 0.05
        assert_eq!(
            power.get_player_power(&uow, home.player_id, false).await?,
            before + 810
        );
        Ok(())
    }
}
