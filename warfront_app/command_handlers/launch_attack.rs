use chrono::{Duration, Utc};
use std::{collections::BTreeMap, sync::Arc};
use tracing::info;

use warfront_game::{
    models::attack::{Attack, AttackMetadata, AttackWave},
    pvp::{apply_attack_cost_scaling, attack_cost_modifier, reward_multiplier},
};
use warfront_types::{
    battle::AttackStatus,
    common::Resources,
    errors::{ApplicationError, GameError},
};

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::LaunchAttack},
    jobs::{Job, JobPayload, tasks::AttackArrivalTask},
    power::PlayerPowerService,
    uow::UnitOfWork,
};

const MIN_SPEED_FACTOR: f64 = 0.5;
const MAX_SPEED_FACTOR: f64 = 2.0;

pub struct LaunchAttackCommandHandler {
    power: Arc<PlayerPowerService>,
}

impl LaunchAttackCommandHandler {
    pub fn new(power: Arc<PlayerPowerService>) -> Self {
        Self { power }
    }
}

#[async_trait::async_trait]
impl CommandHandler<LaunchAttack> for LaunchAttackCommandHandler {
    async fn handle(
        &self,
        command: LaunchAttack,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<(), ApplicationError> {
        let speed_factor = command.speed_factor.unwrap_or(1.0);
        if !(MIN_SPEED_FACTOR..=MAX_SPEED_FACTOR).contains(&speed_factor) {
            return Err(GameError::InvalidSpeedFactor(speed_factor).into());
        }

        let city_repo = uow.cities();
        let mut origin = city_repo.get_by_id(command.origin_city_id).await?;
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

        origin.deploy(&command.units)?;

        let distance = origin.position.distance(&target.position);
        let travel_time_secs = origin
            .position
            .calculate_travel_time_secs(&target.position, config.army_speed * speed_factor);

        let pvp = &config.balance.pvp;
        let attacker_power = self.power.get_player_power(uow, command.player_id, false).await?;
        let defender_power = self.power.get_player_power(uow, target.player_id, false).await?;
        let modifier = attack_cost_modifier(attacker_power, defender_power, pvp);

        let fuel =
            (command.units.total_units() as f64 * distance as f64 * pvp.fuel_cost_per_unit_tile).ceil();
        let cost = apply_attack_cost_scaling(&Resources::new(0, 0, fuel as u32), &modifier);
        origin.spend(&cost)?;
        city_repo.save(&origin).await?;

        let departed_at = Utc::now();
        let attack = Attack {
            id: command.attack_id,
            attacker_player_id: command.player_id,
            attacker_city_id: origin.id,
            defender_player_id: target.player_id,
            defender_city_id: target.id,
            attack_type: command.attack_type,
            status: AttackStatus::Traveling,
            waves: command
                .units
                .iter()
                .map(|(unit, quantity)| AttackWave::new(unit, quantity))
                .collect(),
            metadata: AttackMetadata {
                formation: command.formation,
                speed_factor,
                power_ratio: modifier.power_ratio,
                is_weak_target: modifier.is_weak_target,
                reward_multiplier: reward_multiplier(modifier.power_ratio, pvp),
                cost_paid: cost,
            },
            departed_at,
            arrival_time: departed_at + Duration::seconds(travel_time_secs as i64),
            outcome: None,
            loot: Resources::default(),
            attacker_losses: BTreeMap::new(),
            defender_losses: BTreeMap::new(),
        };
        uow.attacks().add(&attack).await?;

        let payload = JobPayload::new(
            "AttackArrival",
            serde_json::to_value(&AttackArrivalTask {
                attack_id: attack.id,
            })?,
        );
        let job = Job::with_deadline(command.player_id, origin.id, payload, attack.arrival_time);
        uow.jobs().add(&job).await?;

        info!(
            attack_id = %attack.id,
            arrival_job_id = %job.id,
            arrival_at = %attack.arrival_time,
            distance,
            is_weak_target = modifier.is_weak_target,
            cost = ?cost,
            "Attack launched."
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;
    use uuid::Uuid;
    use warfront_game::{
        balance::PvpBalance,
        composition::ArmyComposition,
        models::city::City,
        test_utils::{CityFactoryOptions, city_factory},
    };
    use warfront_types::{
        Result,
        army::UnitId,
        battle::{AttackType, Formation},
        map::Position,
    };

    use super::*;
    use crate::{jobs::tasks::AttackArrivalTask, test_utils::tests::MockUnitOfWork};

    fn setup_cities(garrison: &[(UnitId, u32)], resources: Resources) -> (City, City) {
        let attacker = city_factory(CityFactoryOptions {
            position: Some(Position::new(0, 0)),
            garrison: Some(garrison.iter().copied().collect()),
            resources: Some(resources),
            ..Default::default()
        });
        let defender = city_factory(CityFactoryOptions {
            position: Some(Position::new(3, 4)),
            ..Default::default()
        });
        (attacker, defender)
    }

    fn launch(attacker: &City, defender: &City, units: &[(UnitId, u32)]) -> LaunchAttack {
        LaunchAttack {
            attack_id: Uuid::new_v4(),
            player_id: attacker.player_id,
            origin_city_id: attacker.id,
            target_city_id: defender.id,
            attack_type: AttackType::Raid,
            units: units.iter().copied().collect::<ArmyComposition>(),
            formation: Formation::Wedge,
            speed_factor: None,
        }
    }

    fn handler() -> LaunchAttackCommandHandler {
        LaunchAttackCommandHandler::new(Arc::new(PlayerPowerService::new(
            StdDuration::from_secs(300),
            PvpBalance::default(),
        )))
    }

    #[tokio::test]
    async fn test_launch_attack_deploys_units_and_schedules_arrival() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());

        let (attacker, defender) =
            setup_cities(&[(UnitId::Riflemen, 15)], Resources::new(0, 0, 1000));
        mock.cities.insert(&attacker);
        mock.cities.insert(&defender);

        let command = launch(&attacker, &defender, &[(UnitId::Riflemen, 10)]);
        let attack_id = command.attack_id;
        handler().handle(command, &uow, &config).await?;

        let origin = mock.cities.get(attacker.id).unwrap();
        assert_eq!(origin.garrison.get(UnitId::Riflemen), 5);
        // 10 units over 7 tiles at 0.1 fuel each
        assert_eq!(origin.resources, Resources::new(0, 0, 993));

        let attack = mock.attacks.get(attack_id).unwrap();
        assert_eq!(attack.status, AttackStatus::Traveling);
        assert_eq!(attack.composition().get(UnitId::Riflemen), 10);
        assert_eq!(attack.metadata.formation, Formation::Wedge);
        assert!(!attack.metadata.is_weak_target);
        assert_eq!(attack.metadata.reward_multiplier, 1.0);
        // 7 tiles at 2 tiles per hour
        assert_eq!((attack.arrival_time - attack.departed_at).num_seconds(), 12600);

        let jobs = mock.jobs.all();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].task.task_type, "AttackArrival");
        assert_eq!(jobs[0].completed_at, attack.arrival_time);
        let task: AttackArrivalTask = serde_json::from_value(jobs[0].task.data.clone())?;
        assert_eq!(task.attack_id, attack_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_weak_target_costs_more_and_pays_less() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());

        let (attacker, defender) = setup_cities(
            &[(UnitId::Riflemen, 10), (UnitId::HeavyTank, 20)],
            Resources::new(10000, 0, 1000),
        );
        mock.cities.insert(&attacker);
        mock.cities.insert(&defender);

        let command = launch(&attacker, &defender, &[(UnitId::Riflemen, 10)]);
        let attack_id = command.attack_id;
        handler().handle(command, &uow, &config).await?;

        let attack = mock.attacks.get(attack_id).unwrap();
        assert!(attack.metadata.is_weak_target);
        assert_eq!(attack.metadata.reward_multiplier, 0.5);
        assert_eq!(attack.metadata.cost_paid, Resources::new(5000, 0, 14));

        let origin = mock.cities.get(attacker.id).unwrap();
        assert_eq!(origin.resources, Resources::new(5000, 0, 986));
        Ok(())
    }

    #[tokio::test]
    async fn test_surcharge_without_gold_fails() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());

        let (attacker, defender) = setup_cities(
            &[(UnitId::HeavyTank, 30)],
            Resources::new(100, 0, 1000),
        );
        mock.cities.insert(&attacker);
        mock.cities.insert(&defender);

        let result = handler()
            .handle(launch(&attacker, &defender, &[(UnitId::HeavyTank, 5)]), &uow, &config)
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Game(GameError::NotEnoughResources))
        ));
        assert_eq!(mock.cities.get(attacker.id).unwrap(), attacker);
        assert!(mock.jobs.all().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_launch_preconditions() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());

        let (attacker, defender) =
            setup_cities(&[(UnitId::Riflemen, 5)], Resources::new(0, 0, 1000));
        let own_city = city_factory(CityFactoryOptions {
            player_id: Some(attacker.player_id),
            ..Default::default()
        });
        mock.cities.insert(&attacker);
        mock.cities.insert(&defender);
        mock.cities.insert(&own_city);

        let too_many = launch(&attacker, &defender, &[(UnitId::Riflemen, 6)]);
        assert!(matches!(
            handler().handle(too_many, &uow, &config).await,
            Err(ApplicationError::Game(GameError::NotEnoughUnits))
        ));

        let own = launch(&attacker, &own_city, &[(UnitId::Riflemen, 1)]);
        assert!(matches!(
            handler().handle(own, &uow, &config).await,
            Err(ApplicationError::Game(GameError::CannotTargetOwnCity))
        ));

        let mut stolen = launch(&attacker, &defender, &[(UnitId::Riflemen, 1)]);
        stolen.player_id = Uuid::new_v4();
        assert!(matches!(
            handler().handle(stolen, &uow, &config).await,
            Err(ApplicationError::Game(GameError::CityNotOwned { .. }))
        ));

        let mut too_fast = launch(&attacker, &defender, &[(UnitId::Riflemen, 1)]);
        too_fast.speed_factor = Some(3.0);
        assert!(matches!(
            handler().handle(too_fast, &uow, &config).await,
            Err(ApplicationError::Game(GameError::InvalidSpeedFactor(_)))
        ));

        assert!(mock.jobs.all().is_empty());
        Ok(())
    }
}
