use uuid::Uuid;

use warfront_game::models::report::DefenseReport;
use warfront_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait ReportRepository: Send + Sync {
    async fn add_defense_report(&self, report: &DefenseReport) -> Result<(), ApplicationError>;

    async fn get_defense_report(&self, attack_id: Uuid) -> Result<DefenseReport, ApplicationError>;
}
