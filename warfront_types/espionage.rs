use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
    Reconnaissance,
    MilitaryIntel,
    Sabotage,
}

impl FromStr for MissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reconnaissance" => Ok(MissionType::Reconnaissance),
            "military_intel" => Ok(MissionType::MilitaryIntel),
            "sabotage" => Ok(MissionType::Sabotage),
            other => Err(format!("unknown mission type {other}")),
        }
    }
}

/// `Traveling` moves to exactly one terminal state, no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Traveling,
    Completed,
    Failed,
}

impl MissionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MissionStatus::Traveling)
    }
}
