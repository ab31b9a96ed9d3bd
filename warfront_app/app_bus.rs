use std::sync::Arc;

use warfront_types::errors::ApplicationError;

use crate::{
    config::Config,
    cqrs::{Command, CommandHandler, Query, QueryHandler},
    uow::UnitOfWorkProvider,
};

/// Central entry point for commands and queries.
///
/// It owns the transaction lifecycle and nothing else: commands commit on
/// success and roll back on failure, queries always roll back.
pub struct AppBus {
    config: Arc<Config>,
    uow_provider: Arc<dyn UnitOfWorkProvider>,
}

impl AppBus {
    pub fn new(config: Arc<Config>, uow_provider: Arc<dyn UnitOfWorkProvider>) -> Self {
        Self {
            config,
            uow_provider,
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub async fn execute<C, H>(&self, cmd: C, handler: H) -> Result<(), ApplicationError>
    where
        C: Command,
        H: CommandHandler<C>,
    {
        let uow = self.uow_provider.begin().await?;

        match handler.handle(cmd, &uow, &self.config).await {
            Ok(_) => {
                uow.commit().await?;
                Ok(())
            }
            Err(e) => {
                uow.rollback().await?;
                Err(e)
            }
        }
    }

    pub async fn query<Q, H>(&self, query: Q, handler: H) -> Result<Q::Output, ApplicationError>
    where
        Q: Query,
        H: QueryHandler<Q>,
    {
        let uow = self.uow_provider.begin().await?;
        let result = handler.handle(query, &uow, &self.config).await;

        // Queries never write.
        uow.rollback().await?;

        result
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use warfront_game::test_utils::{
        AttackFactoryOptions, CityFactoryOptions, attack_factory, city_factory,
    };
    use warfront_types::{
        Result,
        battle::AttackStatus,
        errors::{DbError, GameError},
    };

    use super::*;
    use crate::{
        command_handlers::CancelAttackCommandHandler,
        cqrs::{commands::CancelAttack, queries::GetDefenseReport},
        queries_handlers::GetDefenseReportQueryHandler,
        test_utils::tests::{MockUnitOfWork, MockUnitOfWorkProvider},
    };

    fn bus(uow: &MockUnitOfWork) -> AppBus {
        AppBus::new(
            Arc::new(Config::default()),
            Arc::new(MockUnitOfWorkProvider::with_uow(uow.clone())),
        )
    }

    #[tokio::test]
    async fn test_successful_command_commits() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let attack = attack_factory(AttackFactoryOptions::default());
        mock.attacks.insert(&attack);
        let origin = city_factory(CityFactoryOptions {
            id: Some(attack.attacker_city_id),
            player_id: Some(attack.attacker_player_id),
            ..Default::default()
        });
        mock.cities.insert(&origin);

        bus(&mock)
            .execute(
                CancelAttack {
                    player_id: attack.attacker_player_id,
                    attack_id: attack.id,
                },
                CancelAttackCommandHandler::new(),
            )
            .await?;

        assert!(mock.is_committed());
        assert!(!mock.is_rolled_back());
        assert_eq!(
            mock.attacks.get(attack.id).unwrap().status,
            AttackStatus::Cancelled
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_command_rolls_back() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let attack = attack_factory(AttackFactoryOptions::default());
        mock.attacks.insert(&attack);

        let result = bus(&mock)
            .execute(
                CancelAttack {
                    player_id: Uuid::new_v4(),
                    attack_id: attack.id,
                },
                CancelAttackCommandHandler::new(),
            )
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Game(GameError::AttackNotOwned { .. }))
        ));
        assert!(!mock.is_committed());
        assert!(mock.is_rolled_back());
        Ok(())
    }

    #[tokio::test]
    async fn test_query_always_rolls_back() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let attack = attack_factory(AttackFactoryOptions::default());
        mock.attacks.insert(&attack);

        let result = bus(&mock)
            .query(
                GetDefenseReport {
                    player_id: attack.defender_player_id,
                    attack_id: attack.id,
                },
                GetDefenseReportQueryHandler::new(),
            )
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Db(DbError::ReportNotFound(_)))
        ));
        assert!(!mock.is_committed());
        assert!(mock.is_rolled_back());
        Ok(())
    }
}
