use serde_json::Value;

use warfront_types::errors::{AppError, ApplicationError};

use crate::{
    job_handlers::{
        army_return::ArmyReturnJobHandler, attack::AttackJobHandler,
        attack_arrival::AttackArrivalJobHandler, spy_mission::SpyMissionJobHandler,
    },
    jobs::{
        handler::{JobHandler, JobRegistry},
        tasks::*,
    },
};

/// This enum lists all possible job types in the application.
/// It's used for compile-time matching.
enum AppTaskType {
    AttackArrival,
    Attack,
    ArmyReturn,
    SpyMission,
}

impl AppTaskType {
    /// Parse &str into enum variant.
    fn from_str(task_type: &str) -> Option<Self> {
        match task_type {
            "AttackArrival" => Some(Self::AttackArrival),
            "Attack" => Some(Self::Attack),
            "ArmyReturn" => Some(Self::ArmyReturn),
            "SpyMission" => Some(Self::SpyMission),
            _ => None,
        }
    }
}

/// Concrete [`JobRegistry`] mapping task_type strings to handlers.
#[derive(Default)]
pub struct AppJobRegistry;

impl AppJobRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl JobRegistry for AppJobRegistry {
    fn get_handler(
        &self,
        task_type: &str,
        data: &Value,
    ) -> Result<Box<dyn JobHandler>, ApplicationError> {
        let task = AppTaskType::from_str(task_type)
            .ok_or_else(|| ApplicationError::App(AppError::NoJobHandler(task_type.to_string())))?;

        match task {
            AppTaskType::AttackArrival => {
                let payload: AttackArrivalTask = serde_json::from_value(data.clone())?;
                Ok(Box::new(AttackArrivalJobHandler::new(payload)))
            }
            AppTaskType::Attack => {
                let payload: AttackTask = serde_json::from_value(data.clone())?;
                Ok(Box::new(AttackJobHandler::new(payload)))
            }
            AppTaskType::ArmyReturn => {
                let payload: ArmyReturnTask = serde_json::from_value(data.clone())?;
                Ok(Box::new(ArmyReturnJobHandler::new(payload)))
            }
            AppTaskType::SpyMission => {
                let payload: SpyMissionTask = serde_json::from_value(data.clone())?;
                Ok(Box::new(SpyMissionJobHandler::new(payload)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_known_task_types_resolve() {
        let registry = AppJobRegistry::new();
        let data = json!({ "attack_id": Uuid::new_v4() });

        assert!(registry.get_handler("AttackArrival", &data).is_ok());
        assert!(registry.get_handler("Attack", &data).is_ok());
        assert!(
            registry
                .get_handler("SpyMission", &json!({ "mission_id": Uuid::new_v4() }))
                .is_ok()
        );
    }

    #[test]
    fn test_unknown_task_type() {
        let registry = AppJobRegistry::new();
        let result = registry.get_handler("BuildingUpgrade", &json!({}));
        assert!(matches!(
            result,
            Err(ApplicationError::App(AppError::NoJobHandler(t))) if t == "BuildingUpgrade"
        ));
    }

    #[test]
    fn test_malformed_payload() {
        let registry = AppJobRegistry::new();
        let result = registry.get_handler("ArmyReturn", &json!({ "attack_id": "nope" }));
        assert!(matches!(result, Err(ApplicationError::Json(_))));
    }
}
