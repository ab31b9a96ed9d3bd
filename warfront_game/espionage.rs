use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use warfront_types::{common::Resources, espionage::MissionType};

use crate::{balance::EspionageBalance, composition::ArmyComposition};

/// `base + min(spies * per_spy, cap) - counter_intel * penalty + type modifier`,
/// clamped to the configured bounds.
pub fn spy_success_rate(
    spy_count: u32,
    counter_intel_level: u8,
    mission: MissionType,
    balance: &EspionageBalance,
) -> f64 {
    let spy_bonus = (spy_count as f64 * balance.per_spy_bonus).min(balance.max_spy_bonus);
    let penalty = counter_intel_level as f64 * balance.counter_intel_penalty;
    let rate = balance.base_success_rate + spy_bonus - penalty + balance.type_modifier(mission);
    rate.clamp(balance.min_success_rate, balance.max_success_rate)
}

pub fn detection_chance(counter_intel_level: u8, balance: &EspionageBalance) -> f64 {
    (counter_intel_level as f64 * balance.detection_per_level).min(balance.max_detection)
}

/// Spies lost: none when undetected, otherwise `floor(spies * (1 - rate))`
/// with a minimum of one.
pub fn spy_losses(spy_count: u32, success_rate: f64, detected: bool) -> u32 {
    if !detected || spy_count == 0 {
        return 0;
    }
    let lost = (spy_count as f64 * (1.0 - success_rate)).floor() as u32;
    lost.max(1).min(spy_count)
}

/// What a successful mission brings back. Values are approximations of the
/// real ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelData {
    pub resources: Option<Resources>,
    pub units: Option<ArmyComposition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpyMissionOutcome {
    pub success: bool,
    pub detected: bool,
    pub success_rate: f64,
    pub spies_lost: u32,
    pub intel: Option<IntelData>,
}

/// Target snapshot the resolver reads.
#[derive(Debug, Clone, Copy)]
pub struct SpyTarget<'a> {
    pub counter_intel_level: u8,
    pub resources: &'a Resources,
    pub garrison: &'a ArmyComposition,
}

/// Resolves a mission with the given random source. Detection and success
/// are independent draws.
pub fn resolve_spy_mission<R: Rng + ?Sized>(
    rng: &mut R,
    spy_count: u32,
    mission: MissionType,
    target: SpyTarget<'_>,
    balance: &EspionageBalance,
) -> SpyMissionOutcome {
    let detected = rng.gen_bool(detection_chance(target.counter_intel_level, balance).clamp(0.0, 1.0));
    let success_rate = spy_success_rate(spy_count, target.counter_intel_level, mission, balance);
    let success = rng.gen_bool(success_rate.clamp(0.0, 1.0));

    let intel = success.then(|| gather_intel(mission, target, balance));

    SpyMissionOutcome {
        success,
        detected,
        success_rate,
        spies_lost: spy_losses(spy_count, success_rate, detected),
        intel,
    }
}

fn gather_intel(mission: MissionType, target: SpyTarget<'_>, balance: &EspionageBalance) -> IntelData {
    let resources = match mission {
        MissionType::Sabotage => None,
        _ => Some(*target.resources * balance.resource_accuracy),
    };
    let units = match mission {
        MissionType::MilitaryIntel => Some(target.garrison.scaled(balance.unit_accuracy)),
        _ => None,
    };
    IntelData { resources, units }
}

/// A stored report as seen at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayedIntel {
    pub age_hours: i64,
    pub effective_success_rate: f64,
    pub is_stale: bool,
    pub intel: Option<IntelData>,
}

/// Read-side decay of a stored report. The rate loses `decay_per_block` for
/// every full block of hours since arrival, and the payload is withheld once
/// the report is stale. The stored data is never modified.
pub fn apply_intel_decay(
    success_rate: f64,
    intel: Option<&IntelData>,
    arrived_at: DateTime<Utc>,
    now: DateTime<Utc>,
    balance: &EspionageBalance,
) -> DecayedIntel {
    let age_hours = (now - arrived_at).num_hours().max(0);
    let blocks = age_hours / balance.decay_block_hours;
    let factor = (1.0 - balance.decay_per_block * blocks as f64).max(0.0);
    let is_stale = age_hours >= balance.stale_after_hours;

    DecayedIntel {
        age_hours,
        effective_success_rate: success_rate * factor,
        is_stale,
        intel: if is_stale { None } else { intel.cloned() },
    }
}
