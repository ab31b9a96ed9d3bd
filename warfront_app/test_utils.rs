#[cfg(any(test, feature = "test-utils"))]
#[cfg(not(tarpaulin_include))]
pub mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use std::{
        collections::{BTreeMap, HashMap},
        sync::{Arc, Mutex},
    };
    use uuid::Uuid;

    use warfront_game::{
        events::ResolutionEvent,
        models::{attack::Attack, city::City, report::DefenseReport, spy_mission::SpyMission},
    };
    use warfront_types::{
        battle::AttackStatus,
        errors::{AppError, ApplicationError, DbError},
        espionage::MissionStatus,
        research::TechName,
    };

    use crate::{
        config::Config,
        events::EventDispatcher,
        jobs::{Job, JobPayload, JobStatus, handler::JobHandlerContext},
        power::PlayerPowerService,
        repository::{
            AttackRepository, CityRepository, JobRepository, ReportRepository,
            ResearchRepository, SpyMissionRepository,
        },
        uow::{UnitOfWork, UnitOfWorkProvider},
    };

    #[derive(Default, Clone)]
    pub struct MockJobRepository {
        jobs: Arc<Mutex<Vec<Job>>>,
    }

    impl MockJobRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn all(&self) -> Vec<Job> {
            self.jobs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JobRepository for MockJobRepository {
        async fn add(&self, job: &Job) -> Result<(), ApplicationError> {
            self.jobs.lock().unwrap().push(job.clone());
            Ok(())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Job, ApplicationError> {
            self.jobs
                .lock()
                .unwrap()
                .iter()
                .find(|j| j.id == id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::JobNotFound(id)))
        }

        async fn list_by_player_id(&self, id: Uuid) -> Result<Vec<Job>, ApplicationError> {
            Ok(self
                .jobs
                .lock()
                .unwrap()
                .iter()
                .filter(|j| j.player_id == id)
                .cloned()
                .collect())
        }

        async fn find_and_lock_due_jobs(&self, limit: i64) -> Result<Vec<Job>, ApplicationError> {
            let now = Utc::now();
            let mut jobs = self.jobs.lock().unwrap();
            let mut due = Vec::new();
            for job in jobs.iter_mut() {
                if due.len() as i64 >= limit {
                    break;
                }
                if job.is_due(now) {
                    job.status = JobStatus::Processing;
                    job.updated_at = now;
                    due.push(job.clone());
                }
            }
            Ok(due)
        }

        async fn mark_as_completed(&self, job_id: Uuid) -> Result<(), ApplicationError> {
            self.set_status(job_id, JobStatus::Completed)
        }

        async fn mark_as_failed(
            &self,
            job_id: Uuid,
            _error_message: &str,
        ) -> Result<(), ApplicationError> {
            self.set_status(job_id, JobStatus::Failed)
        }
    }

    impl MockJobRepository {
        fn set_status(&self, job_id: Uuid, status: JobStatus) -> Result<(), ApplicationError> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs
                .iter_mut()
                .find(|j| j.id == job_id)
                .ok_or_else(|| ApplicationError::Db(DbError::JobNotFound(job_id)))?;
            job.status = status;
            job.updated_at = Utc::now();
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockAttackRepository {
        attacks: Arc<Mutex<HashMap<Uuid, Attack>>>,
    }

    impl MockAttackRepository {
        pub fn insert(&self, item: &Attack) {
            self.attacks.lock().unwrap().insert(item.id, item.clone());
        }

        pub fn get(&self, id: Uuid) -> Option<Attack> {
            self.attacks.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl AttackRepository for MockAttackRepository {
        async fn add(&self, attack: &Attack) -> Result<(), ApplicationError> {
            self.attacks.lock().unwrap().insert(attack.id, attack.clone());
            Ok(())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Attack, ApplicationError> {
            self.attacks
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::AttackNotFound(id)))
        }

        async fn save(&self, attack: &Attack) -> Result<(), ApplicationError> {
            self.attacks.lock().unwrap().insert(attack.id, attack.clone());
            Ok(())
        }

        async fn transition_status(
            &self,
            id: Uuid,
            from: AttackStatus,
            to: AttackStatus,
        ) -> Result<bool, ApplicationError> {
            let mut attacks = self.attacks.lock().unwrap();
            let attack = attacks
                .get_mut(&id)
                .ok_or_else(|| ApplicationError::Db(DbError::AttackNotFound(id)))?;
            if attack.status != from {
                return Ok(false);
            }
            attack.status = to;
            Ok(true)
        }

        async fn list_by_player_id(&self, player_id: Uuid) -> Result<Vec<Attack>, ApplicationError> {
            Ok(self
                .attacks
                .lock()
                .unwrap()
                .values()
                .filter(|a| a.attacker_player_id == player_id)
                .cloned()
                .collect())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockCityRepository {
        cities: Arc<Mutex<HashMap<Uuid, City>>>,
    }

    impl MockCityRepository {
        pub fn insert(&self, item: &City) {
            self.cities.lock().unwrap().insert(item.id, item.clone());
        }

        pub fn get(&self, id: Uuid) -> Option<City> {
            self.cities.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl CityRepository for MockCityRepository {
        async fn get_by_id(&self, city_id: Uuid) -> Result<City, ApplicationError> {
            self.cities
                .lock()
                .unwrap()
                .get(&city_id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::CityNotFound(city_id)))
        }

        async fn list_by_player_id(&self, player_id: Uuid) -> Result<Vec<City>, ApplicationError> {
            Ok(self
                .cities
                .lock()
                .unwrap()
                .values()
                .filter(|c| c.player_id == player_id)
                .cloned()
                .collect())
        }

        async fn save(&self, city: &City) -> Result<(), ApplicationError> {
            self.cities.lock().unwrap().insert(city.id, city.clone());
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockSpyMissionRepository {
        missions: Arc<Mutex<HashMap<Uuid, SpyMission>>>,
    }

    impl MockSpyMissionRepository {
        pub fn insert(&self, item: &SpyMission) {
            self.missions.lock().unwrap().insert(item.id, item.clone());
        }

        pub fn get(&self, id: Uuid) -> Option<SpyMission> {
            self.missions.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl SpyMissionRepository for MockSpyMissionRepository {
        async fn add(&self, mission: &SpyMission) -> Result<(), ApplicationError> {
            self.missions.lock().unwrap().insert(mission.id, mission.clone());
            Ok(())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<SpyMission, ApplicationError> {
            self.missions
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::SpyMissionNotFound(id)))
        }

        async fn save(&self, mission: &SpyMission) -> Result<(), ApplicationError> {
            self.missions.lock().unwrap().insert(mission.id, mission.clone());
            Ok(())
        }

        async fn transition_status(
            &self,
            id: Uuid,
            from: MissionStatus,
            to: MissionStatus,
        ) -> Result<bool, ApplicationError> {
            let mut missions = self.missions.lock().unwrap();
            let mission = missions
                .get_mut(&id)
                .ok_or_else(|| ApplicationError::Db(DbError::SpyMissionNotFound(id)))?;
            if mission.status != from {
                return Ok(false);
            }
            mission.status = to;
            Ok(true)
        }
    }

    #[derive(Default, Clone)]
    pub struct MockResearchRepository {
        levels: Arc<Mutex<HashMap<Uuid, BTreeMap<TechName, u8>>>>,
    }

    impl MockResearchRepository {
        pub fn set_level(&self, player_id: Uuid, tech: TechName, level: u8) {
            self.levels
                .lock()
                .unwrap()
                .entry(player_id)
                .or_default()
                .insert(tech, level);
        }
    }

    #[async_trait]
    impl ResearchRepository for MockResearchRepository {
        async fn levels(&self, player_id: Uuid) -> Result<BTreeMap<TechName, u8>, ApplicationError> {
            Ok(self
                .levels
                .lock()
                .unwrap()
                .get(&player_id)
                .cloned()
                .unwrap_or_default())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockReportRepository {
        reports: Arc<Mutex<Vec<DefenseReport>>>,
    }

    impl MockReportRepository {
        pub fn count(&self) -> usize {
            self.reports.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ReportRepository for MockReportRepository {
        async fn add_defense_report(&self, report: &DefenseReport) -> Result<(), ApplicationError> {
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }

        async fn get_defense_report(&self, attack_id: Uuid) -> Result<DefenseReport, ApplicationError> {
            self.reports
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.attack_id == attack_id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::ReportNotFound(attack_id)))
        }
    }

    /// In-memory unit of work. Clones share the same repositories, so a
    /// provider handing out clones behaves like one database.
    #[derive(Default, Clone)]
    pub struct MockUnitOfWork {
        pub attacks: Arc<MockAttackRepository>,
        pub spy_missions: Arc<MockSpyMissionRepository>,
        pub cities: Arc<MockCityRepository>,
        pub research: Arc<MockResearchRepository>,
        pub reports: Arc<MockReportRepository>,
        pub jobs: Arc<MockJobRepository>,

        // Flags to check if commit/rollback was called
        committed: Arc<Mutex<bool>>,
        rolled_back: Arc<Mutex<bool>>,
    }

    impl MockUnitOfWork {
        pub fn new() -> Self {
            Default::default()
        }

        pub fn is_committed(&self) -> bool {
            *self.committed.lock().unwrap()
        }

        pub fn is_rolled_back(&self) -> bool {
            *self.rolled_back.lock().unwrap()
        }
    }

    #[async_trait]
    impl<'a> UnitOfWork<'a> for MockUnitOfWork {
        fn attacks(&self) -> Arc<dyn AttackRepository + 'a> {
            self.attacks.clone()
        }
        fn spy_missions(&self) -> Arc<dyn SpyMissionRepository + 'a> {
            self.spy_missions.clone()
        }
        fn cities(&self) -> Arc<dyn CityRepository + 'a> {
            self.cities.clone()
        }
        fn research(&self) -> Arc<dyn ResearchRepository + 'a> {
            self.research.clone()
        }
        fn reports(&self) -> Arc<dyn ReportRepository + 'a> {
            self.reports.clone()
        }
        fn jobs(&self) -> Arc<dyn JobRepository + 'a> {
            self.jobs.clone()
        }

        async fn commit(self: Box<Self>) -> Result<(), ApplicationError> {
            *self.committed.lock().unwrap() = true;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), ApplicationError> {
            *self.rolled_back.lock().unwrap() = true;
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockUnitOfWorkProvider {
        uow: MockUnitOfWork,
    }

    impl MockUnitOfWorkProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_uow(uow: MockUnitOfWork) -> Self {
            Self { uow }
        }
    }

    #[async_trait]
    impl UnitOfWorkProvider for MockUnitOfWorkProvider {
        async fn begin<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
            let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(self.uow.clone());
            Ok(uow)
        }
    }

    /// Keeps every delivered event. Events whose name is listed in
    /// `failing` are rejected instead.
    #[derive(Default, Clone)]
    pub struct RecordingEventDispatcher {
        events: Arc<Mutex<Vec<ResolutionEvent>>>,
        attempts: Arc<Mutex<usize>>,
        failing: Vec<&'static str>,
    }

    impl RecordingEventDispatcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_for(event_name: &'static str) -> Self {
            Self {
                failing: vec![event_name],
                ..Default::default()
            }
        }

        pub fn events(&self) -> Vec<ResolutionEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn attempts(&self) -> usize {
            *self.attempts.lock().unwrap()
        }
    }

    #[async_trait]
    impl EventDispatcher for RecordingEventDispatcher {
        async fn dispatch(&self, event: &ResolutionEvent) -> Result<(), ApplicationError> {
            *self.attempts.lock().unwrap() += 1;
            if self.failing.contains(&event.name()) {
                return Err(AppError::EventDispatch(event.name().to_string()).into());
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    /// Job context over `uow` with default config and an empty power cache.
    pub fn setup_job_context(uow: &MockUnitOfWork) -> JobHandlerContext<'static> {
        let config = Arc::new(Config::default());
        let power = Arc::new(PlayerPowerService::from_config(&config));
        JobHandlerContext::new(Box::new(uow.clone()), config, power)
    }

    /// A due job carrying `task`.
    pub fn setup_test_job<T: serde::Serialize>(task_type: &str, task: &T) -> Job {
        let payload = JobPayload::new(task_type, serde_json::to_value(task).unwrap());
        Job::new(Uuid::new_v4(), Uuid::new_v4(), 0, payload)
    }
}
