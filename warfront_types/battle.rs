use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    Raid,
    Conquest,
    Siege,
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttackType::Raid => "raid",
            AttackType::Conquest => "conquest",
            AttackType::Siege => "siege",
        };
        f.write_str(s)
    }
}

/// Tactical stance chosen at launch. Each one maps to an attacker/defender
/// multiplier pair in the balance config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formation {
    #[default]
    Line,
    Wedge,
    Echelon,
}

impl FromStr for Formation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(Formation::Line),
            "wedge" => Ok(Formation::Wedge),
            "echelon" => Ok(Formation::Echelon),
            other => Err(format!("unknown formation {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    AttackerVictory,
    DefenderVictory,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackStatus {
    Traveling,
    Arrived,
    Resolving,
    Completed,
    Cancelled,
}
