use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{info, instrument};

use warfront_game::{
    battle::Battle,
    events::ResolutionEvent,
    models::report::DefenseReport,
    strength::{CombatContext, tech_bonus, walls_bonus},
};
use warfront_types::{
    battle::AttackStatus, errors::ApplicationError, research::TechName,
};

use crate::{
    job_handlers::helpers::transition_attack,
    jobs::{
        Job, JobPayload,
        handler::{JobHandler, JobHandlerContext},
        tasks::{ArmyReturnTask, AttackTask},
    },
};

/// Resolves an arrived attack: strength, rounds, losses and loot, then writes
/// everything back in the job's transaction.
pub struct AttackJobHandler {
    payload: AttackTask,
}

impl AttackJobHandler {
    pub fn new(payload: AttackTask) -> Self {
        Self { payload }
    }
}

fn research_levels(levels: &BTreeMap<TechName, u8>, techs: &[TechName]) -> Vec<u8> {
    techs
        .iter()
        .map(|tech| levels.get(tech).copied().unwrap_or(0))
        .collect()
}

#[async_trait]
impl JobHandler for AttackJobHandler {
    #[instrument(skip_all, fields(
        task_type = "Attack",
        attack_id = %self.payload.attack_id
    ))]
    async fn handle<'ctx, 'a>(
        &'ctx self,
        ctx: &'ctx JobHandlerContext<'a>,
        _job: &'ctx Job,
    ) -> Result<(), ApplicationError> {
        info!("Execute Attack Job");

        let attack = ctx.uow.attacks().get_by_id(self.payload.attack_id).await?;
        attack.ensure_status(AttackStatus::Arrived)?;

        let city_repo = ctx.uow.cities();
        let attacker_city = city_repo.get_by_id(attack.attacker_city_id).await?;
        let mut defender_city = city_repo.get_by_id(attack.defender_city_id).await?;

        let research_repo = ctx.uow.research();
        let attacker_research = research_repo.levels(attack.attacker_player_id).await?;
        let defender_research = research_repo.levels(attack.defender_player_id).await?;

        // At-most-once: only the worker that wins this transition resolves.
        let mut attack = transition_attack(
            &ctx.uow,
            attack.id,
            AttackStatus::Arrived,
            AttackStatus::Resolving,
        )
        .await?;

        let balance = &ctx.config.balance;
        let combat_context = CombatContext {
            attacker: attack.composition(),
            defender: defender_city.garrison.clone(),
            defenses: defender_city.defenses.clone(),
            attacker_tech_bonus: tech_bonus(
                research_levels(&attacker_research, &TechName::ATTACK),
                &balance.combat,
            ),
            defender_tech_bonus: tech_bonus(
                research_levels(&defender_research, &TechName::DEFENSE),
                &balance.combat,
            ),
            walls_bonus: walls_bonus(defender_city.walls_level(), &balance.combat),
            formation: attack.metadata.formation,
            is_weak_target_attack: attack.metadata.is_weak_target,
        };

        let outcome = Battle::new(&combat_context, attack.attack_type, balance)
            .calculate_battle(&defender_city.resources, attack.metadata.reward_multiplier);

        for (unit, lost) in &outcome.defender_losses {
            defender_city.garrison.remove(*unit, *lost);
        }
        defender_city.resources = defender_city.resources.saturating_sub(&outcome.loot);
        city_repo.save(&defender_city).await?;

        attack.apply_losses(&outcome.attacker_losses);
        attack.defender_losses = outcome.defender_losses.clone();
        attack.outcome = Some(outcome.outcome);
        attack.loot = outcome.loot;
        attack.status = AttackStatus::Completed;
        ctx.uow.attacks().save(&attack).await?;

        let report = DefenseReport::new(attack.id, &combat_context, &outcome);
        ctx.uow.reports().add_defense_report(&report).await?;

        ctx.stale_power
            .mark(&[attack.attacker_player_id, attack.defender_player_id]);

        let survivors = attack.survivors();
        if !survivors.is_empty() {
            let speed = ctx.config.army_speed * attack.metadata.speed_factor;
            let return_travel_time = defender_city
                .position
                .calculate_travel_time_secs(&attacker_city.position, speed)
                as i64;

            let return_payload = ArmyReturnTask {
                attack_id: attack.id,
                destination_player_id: attack.attacker_player_id,
                destination_city_id: attacker_city.id,
                from_city_id: defender_city.id,
                units: survivors,
                resources: outcome.loot,
            };
            let job_payload = JobPayload::new("ArmyReturn", serde_json::to_value(&return_payload)?);
            let return_job = Job::new(
                attack.attacker_player_id,
                attacker_city.id,
                return_travel_time,
                job_payload,
            );
            ctx.uow.jobs().add(&return_job).await?;

            info!(
                return_job_id = %return_job.id,
                arrival_at = %return_job.completed_at,
                "Army return job planned."
            );
        }

        ctx.events.push(ResolutionEvent::AttackResolved {
            attack_id: attack.id,
            attacker_player_id: attack.attacker_player_id,
            defender_player_id: attack.defender_player_id,
            outcome: outcome.outcome,
            loot: outcome.loot,
            attacker_losses: outcome.attacker_losses.clone(),
            defender_losses: outcome.defender_losses.clone(),
        });

        info!(
            outcome = ?outcome.outcome,
            rounds = outcome.rounds.len(),
            loot = ?outcome.loot,
            "Attack resolved."
        );

        Ok(())
    }
}
