use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use warfront_game::{
    espionage::IntelData,
    models::report::DefenseReport,
    pvp::{PowerBreakdown, SuggestedTarget},
};
use warfront_types::espionage::{MissionStatus, MissionType};

use crate::cqrs::Query;

/// A spy mission as its owner sees it, with intel decay applied.
#[derive(Debug, Clone)]
pub struct GetSpyMissionReport {
    pub player_id: Uuid,
    pub mission_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpyMissionReport {
    pub mission_id: Uuid,
    pub target_city_id: Uuid,
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub spy_count: u32,
    pub spies_lost: u32,
    pub detected: bool,
    pub arrival_time: DateTime<Utc>,
    pub age_hours: i64,
    pub success_rate: Option<f64>,
    pub effective_success_rate: Option<f64>,
    pub is_stale: bool,
    pub intel: Option<IntelData>,
}

impl Query for GetSpyMissionReport {
    type Output = SpyMissionReport;
}

/// Audit trail of a resolved attack, readable by both sides.
#[derive(Debug, Clone)]
pub struct GetDefenseReport {
    pub player_id: Uuid,
    pub attack_id: Uuid,
}

impl Query for GetDefenseReport {
    type Output = DefenseReport;
}

#[derive(Debug, Clone)]
pub struct GetPlayerPower {
    pub player_id: Uuid,
}

impl Query for GetPlayerPower {
    type Output = PowerBreakdown;
}

#[derive(Debug, Clone)]
pub struct SuggestTargets {
    pub player_id: Uuid,
    pub candidate_player_ids: Vec<Uuid>,
    pub limit: usize,
}

impl Query for SuggestTargets {
    type Output = Vec<SuggestedTarget>;
}
