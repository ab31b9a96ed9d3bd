use std::sync::Arc;
use tracing::info;

use warfront_game::composition::ArmyComposition;
use warfront_types::{
    battle::AttackStatus,
    errors::{ApplicationError, GameError},
};

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::CancelAttack},
    job_handlers::helpers::transition_attack,
    uow::UnitOfWork,
};

/// Recalls a traveling attack. Half of every wave, rounded down, makes it
/// back to the origin garrison.
pub struct CancelAttackCommandHandler {}

impl Default for CancelAttackCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelAttackCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<CancelAttack> for CancelAttackCommandHandler {
    async fn handle(
        &self,
        command: CancelAttack,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<(), ApplicationError> {
        let attack = uow.attacks().get_by_id(command.attack_id).await?;
        if attack.attacker_player_id != command.player_id {
            return Err(GameError::AttackNotOwned {
                attack_id: attack.id,
                player_id: command.player_id,
            }
            .into());
        }
        attack.ensure_status(AttackStatus::Traveling)?;

        let attack = transition_attack(
            uow,
            attack.id,
            AttackStatus::Traveling,
            AttackStatus::Cancelled,
        )
        .await?;

        let refund = ArmyComposition::from_stacks(
            attack
                .waves
                .iter()
                .map(|wave| (wave.unit_key.as_str(), wave.quantity / 2)),
        );

        let city_repo = uow.cities();
        let mut origin = city_repo.get_by_id(attack.attacker_city_id).await?;
        origin.garrison.merge(&refund);
        city_repo.save(&origin).await?;

        info!(
            attack_id = %attack.id,
            refunded_units = refund.total_units(),
            "Attack cancelled."
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use warfront_game::{
        models::attack::AttackWave,
        test_utils::{AttackFactoryOptions, CityFactoryOptions, attack_factory, city_factory},
    };
    use warfront_types::{Result, army::UnitId};

    use super::*;
    use crate::test_utils::tests::MockUnitOfWork;

    #[tokio::test]
    async fn test_cancel_refunds_half_of_each_wave() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());

        let origin = city_factory(CityFactoryOptions {
            garrison: Some([(UnitId::Riflemen, 2)].into_iter().collect()),
            ..Default::default()
        });
        let attack = attack_factory(AttackFactoryOptions {
            attacker: Some(origin.clone()),
            waves: Some(vec![
                AttackWave::new(UnitId::Riflemen, 7),
                AttackWave::new(UnitId::Riflemen, 5),
                AttackWave::new(UnitId::LightTank, 1),
            ]),
            ..Default::default()
        });
        mock.cities.insert(&origin);
        mock.attacks.insert(&attack);

        CancelAttackCommandHandler::new()
            .handle(
                CancelAttack {
                    player_id: origin.player_id,
                    attack_id: attack.id,
                },
                &uow,
                &config,
            )
            .await?;

        let origin = mock.cities.get(origin.id).unwrap();
        // 2 at home + 3 + 2
        assert_eq!(origin.garrison.get(UnitId::Riflemen), 7);
        assert_eq!(origin.garrison.get(UnitId::LightTank), 0);
        assert_eq!(
            mock.attacks.get(attack.id).unwrap().status,
            AttackStatus::Cancelled
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_only_traveling_attacks_of_the_owner_can_be_cancelled() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let config = Arc::new(Config::default());

        let arrived = attack_factory(AttackFactoryOptions {
            status: Some(AttackStatus::Arrived),
            ..Default::default()
        });
        let traveling = attack_factory(AttackFactoryOptions::default());
        mock.attacks.insert(&arrived);
        mock.attacks.insert(&traveling);

        let result = CancelAttackCommandHandler::new()
            .handle(
                CancelAttack {
                    player_id: arrived.attacker_player_id,
                    attack_id: arrived.id,
                },
                &uow,
                &config,
            )
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Game(GameError::InvalidAttackStatus { .. }))
        ));

        let result = CancelAttackCommandHandler::new()
            .handle(
                CancelAttack {
                    player_id: Uuid::new_v4(),
                    attack_id: traveling.id,
                },
                &uow,
                &config,
            )
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Game(GameError::AttackNotOwned { .. }))
        ));
        assert_eq!(
            mock.attacks.get(traveling.id).unwrap().status,
            AttackStatus::Traveling
        );
        Ok(())
    }
}
