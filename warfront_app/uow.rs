use std::sync::Arc;

use warfront_types::errors::ApplicationError;

use crate::repository::*;

/// A Unit of Work (UoW) works as a provider for repositories
/// that all operate within a single transaction.
#[async_trait::async_trait]
pub trait UnitOfWork<'a>: Send + Sync {
    fn attacks(&self) -> Arc<dyn AttackRepository + 'a>;
    fn spy_missions(&self) -> Arc<dyn SpyMissionRepository + 'a>;
    fn cities(&self) -> Arc<dyn CityRepository + 'a>;
    fn research(&self) -> Arc<dyn ResearchRepository + 'a>;
    fn reports(&self) -> Arc<dyn ReportRepository + 'a>;
    fn jobs(&self) -> Arc<dyn JobRepository + 'a>;

    // Consume self to ensure the UoW is not used after commit/rollback
    async fn commit(self: Box<Self>) -> Result<(), ApplicationError>;
    async fn rollback(self: Box<Self>) -> Result<(), ApplicationError>;
}

/// A factory for creating Unit of Work instances.
#[async_trait::async_trait]
pub trait UnitOfWorkProvider: Send + Sync {
    /// Begin a new Unit of Work (transaction).
    async fn begin<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError>;
}
