use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use warfront_types::errors::ApplicationError;

use crate::{
    config::Config,
    events::EventOutbox,
    jobs::Job,
    power::{PlayerPowerService, StalePower},
    uow::UnitOfWork,
};

/// Context which contains JobHandler dependencies.
/// Everything written through `uow` commits or rolls back together; `events`
/// are dispatched and `stale_power` is dropped from the power cache only after
/// a commit.
pub struct JobHandlerContext<'a> {
    pub uow: Box<dyn UnitOfWork<'a> + 'a>,
    pub config: Arc<Config>,
    pub power: Arc<PlayerPowerService>,
    pub events: EventOutbox,
    pub stale_power: StalePower,
}

impl<'a> JobHandlerContext<'a> {
    pub fn new(
        uow: Box<dyn UnitOfWork<'a> + 'a>,
        config: Arc<Config>,
        power: Arc<PlayerPowerService>,
    ) -> Self {
        Self {
            uow,
            config,
            power,
            events: EventOutbox::default(),
            stale_power: StalePower::default(),
        }
    }
}

#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle<'ctx, 'a>(
        &'ctx self,
        ctx: &'ctx JobHandlerContext<'a>,
        job: &'ctx Job,
    ) -> Result<(), ApplicationError>;
}

/// Maps a job's `task_type` to the handler able to run it.
pub trait JobRegistry: Send + Sync {
    fn get_handler(
        &self,
        task_type: &str,
        data: &Value,
    ) -> Result<Box<dyn JobHandler>, ApplicationError>;
}
