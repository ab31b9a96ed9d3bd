use uuid::Uuid;

use warfront_game::models::{attack::Attack, spy_mission::SpyMission};
use warfront_types::{
    battle::AttackStatus,
    errors::{ApplicationError, GameError},
    espionage::MissionStatus,
};

use crate::uow::UnitOfWork;

/// Claims an attack by moving it from `from` to `to` through the repository's
/// atomic transition. Fails if someone else already moved it.
pub async fn transition_attack(
    uow: &Box<dyn UnitOfWork<'_> + '_>,
    attack_id: Uuid,
    from: AttackStatus,
    to: AttackStatus,
) -> Result<Attack, ApplicationError> {
    let attacks = uow.attacks();
    if !attacks.transition_status(attack_id, from, to).await? {
        let current = attacks.get_by_id(attack_id).await?;
        return Err(GameError::InvalidAttackStatus {
            attack_id,
            expected: from,
            actual: current.status,
        }
        .into());
    }
    attacks.get_by_id(attack_id).await
}

/// Claims a spy mission the same way [`transition_attack`] claims an attack.
pub async fn transition_mission(
    uow: &Box<dyn UnitOfWork<'_> + '_>,
    mission_id: Uuid,
    from: MissionStatus,
    to: MissionStatus,
) -> Result<SpyMission, ApplicationError> {
    let missions = uow.spy_missions();
    if !missions.transition_status(mission_id, from, to).await? {
        let current = missions.get_by_id(mission_id).await?;
        return Err(GameError::InvalidMissionStatus {
            mission_id,
            expected: from,
            actual: current.status,
        }
        .into());
    }
    missions.get_by_id(mission_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use warfront_game::test_utils::{SpyMissionFactoryOptions, spy_mission_factory};
    use warfront_types::Result;

    use crate::test_utils::tests::MockUnitOfWork;

    #[tokio::test]
    async fn test_mission_is_claimed_once() -> Result<()> {
        let mock = MockUnitOfWork::new();
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(mock.clone());
        let mission = spy_mission_factory(SpyMissionFactoryOptions::default());
        mock.spy_missions.insert(&mission);

        let claimed = transition_mission(
            &uow,
            mission.id,
            MissionStatus::Traveling,
            MissionStatus::Completed,
        )
        .await?;
        assert_eq!(claimed.status, MissionStatus::Completed);

        let second = transition_mission(
            &uow,
            mission.id,
            MissionStatus::Traveling,
            MissionStatus::Failed,
        )
        .await;
        assert!(matches!(
            second,
            Err(ApplicationError::Game(GameError::InvalidMissionStatus {
                expected: MissionStatus::Traveling,
                actual: MissionStatus::Completed,
                ..
            }))
        ));
        assert_eq!(
            mock.spy_missions.get(mission.id).unwrap().status,
            MissionStatus::Completed
        );
        Ok(())
    }
}
