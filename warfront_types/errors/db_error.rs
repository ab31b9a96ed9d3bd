use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the persistence collaborator.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Attack {0} not found")]
    AttackNotFound(Uuid),

    #[error("Spy mission {0} not found")]
    SpyMissionNotFound(Uuid),

    #[error("City {0} not found")]
    CityNotFound(Uuid),

    #[error("Player {0} not found")]
    PlayerNotFound(Uuid),

    #[error("Defense report for attack {0} not found")]
    ReportNotFound(Uuid),

    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}
