use async_trait::async_trait;
use tracing::{info, instrument};

use warfront_types::{battle::AttackStatus, errors::ApplicationError};

use crate::{
    job_handlers::helpers::transition_attack,
    jobs::{
        Job, JobPayload,
        handler::{JobHandler, JobHandlerContext},
        tasks::{AttackArrivalTask, AttackTask},
    },
};

pub struct AttackArrivalJobHandler {
    payload: AttackArrivalTask,
}

impl AttackArrivalJobHandler {
    pub fn new(payload: AttackArrivalTask) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl JobHandler for AttackArrivalJobHandler {
    #[instrument(skip_all, fields(
        task_type = "AttackArrival",
        attack_id = %self.payload.attack_id
    ))]
    async fn handle<'ctx, 'a>(
        &'ctx self,
        ctx: &'ctx JobHandlerContext<'a>,
        _job: &'ctx Job,
    ) -> Result<(), ApplicationError> {
        info!("Execute AttackArrival Job");

        let attack = ctx.uow.attacks().get_by_id(self.payload.attack_id).await?;
        if attack.status == AttackStatus::Cancelled {
            info!("Attack was cancelled on the way, nothing to resolve.");
            return Ok(());
        }

        let attack = transition_attack(
            &ctx.uow,
            attack.id,
            AttackStatus::Traveling,
            AttackStatus::Arrived,
        )
        .await?;

        let payload = JobPayload::new(
            "Attack",
            serde_json::to_value(&AttackTask {
                attack_id: attack.id,
            })?,
        );
        let job = Job::new(attack.attacker_player_id, attack.attacker_city_id, 0, payload);
        ctx.uow.jobs().add(&job).await?;

        info!(resolution_job_id = %job.id, "Attack arrived, resolution job planned.");
        Ok(())
    }
}
