use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub player_id: Uuid,
    pub city_id: Uuid,
    pub task: JobPayload,
    pub status: JobStatus,
    /// When the job becomes due.
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(player_id: Uuid, city_id: Uuid, duration_secs: i64, task: JobPayload) -> Self {
        let now = Utc::now();
        let completed_at = now + Duration::seconds(duration_secs.max(0));
        Self::with_deadline_internal(player_id, city_id, task, completed_at, now)
    }

    pub fn with_deadline(
        player_id: Uuid,
        city_id: Uuid,
        task: JobPayload,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self::with_deadline_internal(player_id, city_id, task, completed_at, Utc::now())
    }

    fn with_deadline_internal(
        player_id: Uuid,
        city_id: Uuid,
        task: JobPayload,
        completed_at: DateTime<Utc>,
        baseline: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            city_id,
            task,
            status: JobStatus::Pending,
            completed_at,
            created_at: baseline,
            updated_at: baseline,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Pending && self.completed_at <= now
    }
}

/// Represents the data payload for any job, it holds data for the task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayload {
    /// Key used to find the handler, e.g. "AttackArrival", "ArmyReturn".
    pub task_type: String,

    /// The full JSON data for the task payload.
    pub data: Value,
}

impl JobPayload {
    pub fn new(task_type: &str, data: Value) -> Self {
        Self {
            task_type: task_type.to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}
