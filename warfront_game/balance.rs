//! Balance constants for combat, loot, PvP scaling and espionage.
//!
//! Every value is read from a [`BalanceConfig`] handed to the resolver
//! functions, so tuning never touches the algorithms themselves. Each section
//! is `#[serde(default)]`, which lets a TOML file override a single number.
use serde::{Deserialize, Serialize};

use warfront_types::{
    battle::{AttackType, Formation},
    errors::AppError,
    espionage::MissionType,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub combat: CombatBalance,
    pub loot: LootBalance,
    pub pvp: PvpBalance,
    pub espionage: EspionageBalance,
}

impl BalanceConfig {
    /// Rejects values that would break the resolver invariants. Every float
    /// must be finite; rates and shares must stay within their unit ranges.
    pub fn validate(&self) -> Result<(), AppError> {
        self.combat.validate()?;
        self.loot.validate()?;
        self.pvp.validate()?;
        self.espionage.validate()
    }
}

fn invalid(msg: &str) -> AppError {
    AppError::InvalidBalanceConfig(msg.to_string())
}

fn finite(name: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(invalid(&format!("{name} must be a finite number")));
    }
    Ok(())
}

fn non_negative(name: &str, value: f64) -> Result<(), AppError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(invalid(&format!("{name} must be non-negative")));
    }
    Ok(())
}

fn in_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), AppError> {
    finite(name, value)?;
    if !(min..=max).contains(&value) {
        return Err(invalid(&format!("{name} must be in [{min}, {max}]")));
    }
    Ok(())
}

/// Attacker and defender strength multipliers of a formation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormationMultipliers {
    pub attacker: f64,
    pub defender: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatBalance {
    pub counter_bonus: f64,
    pub weak_penalty: f64,
    /// Share of a single matchup applied to the multiplier.
    pub matchup_weight: f64,
    pub max_rounds: u32,
    /// Fraction of its current strength each side deals per round.
    pub round_damage_ratio: f64,
    pub walls_bonus_per_level: f64,
    pub walls_bonus_cap: f64,
    pub tech_bonus_per_level: f64,
    pub line: FormationMultipliers,
    pub wedge: FormationMultipliers,
    pub echelon: FormationMultipliers,
}

impl CombatBalance {
    fn validate(&self) -> Result<(), AppError> {
        finite("combat.counter_bonus", self.counter_bonus)?;
        if self.counter_bonus < 1.0 {
            return Err(invalid("combat.counter_bonus must be at least 1"));
        }
        in_range("combat.weak_penalty", self.weak_penalty, 0.0, 1.0)?;
        in_range("combat.matchup_weight", self.matchup_weight, 0.0, 1.0)?;
        if self.max_rounds == 0 {
            return Err(invalid("combat.max_rounds must be at least 1"));
        }
        in_range("combat.round_damage_ratio", self.round_damage_ratio, 0.0, 1.0)?;
        if self.round_damage_ratio == 0.0 {
            return Err(invalid("combat.round_damage_ratio must be in (0, 1]"));
        }
        non_negative("combat.walls_bonus_per_level", self.walls_bonus_per_level)?;
        non_negative("combat.walls_bonus_cap", self.walls_bonus_cap)?;
        non_negative("combat.tech_bonus_per_level", self.tech_bonus_per_level)?;
        for (name, pair) in [
            ("combat.line", self.line),
            ("combat.wedge", self.wedge),
            ("combat.echelon", self.echelon),
        ] {
            finite(name, pair.attacker)?;
            finite(name, pair.defender)?;
            if pair.attacker <= 0.0 || pair.defender <= 0.0 {
                return Err(invalid(&format!("{name} multipliers must be positive")));
            }
        }
        Ok(())
    }

    pub fn formation(&self, formation: Formation) -> FormationMultipliers {
        match formation {
            Formation::Line => self.line,
            Formation::Wedge => self.wedge,
            Formation::Echelon => self.echelon,
        }
    }

    pub fn counter_step(&self) -> f64 {
        (self.counter_bonus - 1.0) * self.matchup_weight
    }

    pub fn weak_step(&self) -> f64 {
        (self.weak_penalty - 1.0) * self.matchup_weight
    }
}

impl Default for CombatBalance {
    fn default() -> Self {
        Self {
            counter_bonus: 1.5,
            weak_penalty: 0.7,
            matchup_weight: 0.3,
            max_rounds: 10,
            round_damage_ratio: 0.3,
            walls_bonus_per_level: 0.08,
            walls_bonus_cap: 2.0,
            tech_bonus_per_level: 0.10,
            line: FormationMultipliers {
                attacker: 1.0,
                defender: 1.0,
            },
            wedge: FormationMultipliers {
                attacker: 1.2,
                defender: 1.1,
            },
            echelon: FormationMultipliers {
                attacker: 1.1,
                defender: 0.95,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootBalance {
    pub raid: f64,
    pub conquest: f64,
    pub siege: f64,
}

impl LootBalance {
    fn validate(&self) -> Result<(), AppError> {
        in_range("loot.raid", self.raid, 0.0, 1.0)?;
        in_range("loot.conquest", self.conquest, 0.0, 1.0)?;
        in_range("loot.siege", self.siege, 0.0, 1.0)
    }

    pub fn percentage(&self, attack_type: AttackType) -> f64 {
        match attack_type {
            AttackType::Raid => self.raid,
            AttackType::Conquest => self.conquest,
            AttackType::Siege => self.siege,
        }
    }
}

impl Default for LootBalance {
    fn default() -> Self {
        Self {
            raid: 0.20,
            conquest: 0.40,
            siege: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PvpBalance {
    pub city_weight: u64,
    pub gold_weight: f64,
    pub metal_weight: f64,
    pub fuel_weight: f64,
    /// Below this defender/attacker power ratio the target counts as weak.
    pub weak_target_ratio: f64,
    /// Above this ratio the defender counts as stronger.
    pub strong_target_ratio: f64,
    pub weak_target_cost_multiplier: f64,
    pub weak_target_gold_surcharge: u32,
    pub weak_target_reward_multiplier: f64,
    pub strong_target_reward_multiplier: f64,
    pub fuel_cost_per_unit_tile: f64,
    /// Relative power gap still considered an optimal match.
    pub optimal_range: f64,
    pub fair_range: f64,
    pub unfair_threshold: f64,
}

impl PvpBalance {
    fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("pvp.gold_weight", self.gold_weight),
            ("pvp.metal_weight", self.metal_weight),
            ("pvp.fuel_weight", self.fuel_weight),
            ("pvp.weak_target_ratio", self.weak_target_ratio),
            ("pvp.strong_target_ratio", self.strong_target_ratio),
            ("pvp.weak_target_cost_multiplier", self.weak_target_cost_multiplier),
            ("pvp.weak_target_reward_multiplier", self.weak_target_reward_multiplier),
            ("pvp.strong_target_reward_multiplier", self.strong_target_reward_multiplier),
            ("pvp.fuel_cost_per_unit_tile", self.fuel_cost_per_unit_tile),
            ("pvp.optimal_range", self.optimal_range),
            ("pvp.fair_range", self.fair_range),
            ("pvp.unfair_threshold", self.unfair_threshold),
        ] {
            non_negative(name, value)?;
        }
        if self.weak_target_ratio > self.strong_target_ratio {
            return Err(invalid("pvp.weak_target_ratio exceeds strong_target_ratio"));
        }
        if self.optimal_range > self.fair_range || self.fair_range > self.unfair_threshold {
            return Err(invalid(
                "pvp fairness bands must satisfy optimal_range <= fair_range <= unfair_threshold",
            ));
        }
        Ok(())
    }
}

impl Default for PvpBalance {
    fn default() -> Self {
        Self {
            city_weight: 1000,
            gold_weight: 0.05,
            metal_weight: 0.03,
            fuel_weight: 0.02,
            weak_target_ratio: 0.5,
            strong_target_ratio: 1.2,
            weak_target_cost_multiplier: 2.0,
            weak_target_gold_surcharge: 5000,
            weak_target_reward_multiplier: 0.5,
            strong_target_reward_multiplier: 1.5,
            fuel_cost_per_unit_tile: 0.1,
            optimal_range: 0.3,
            fair_range: 0.5,
            unfair_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EspionageBalance {
    pub base_success_rate: f64,
    pub per_spy_bonus: f64,
    pub max_spy_bonus: f64,
    pub counter_intel_penalty: f64,
    pub reconnaissance_modifier: f64,
    pub military_intel_modifier: f64,
    pub sabotage_modifier: f64,
    pub min_success_rate: f64,
    pub max_success_rate: f64,
    pub detection_per_level: f64,
    pub max_detection: f64,
    pub resource_accuracy: f64,
    pub unit_accuracy: f64,
    pub decay_block_hours: i64,
    pub decay_per_block: f64,
    pub stale_after_hours: i64,
    pub max_spies: u32,
}

impl EspionageBalance {
    fn validate(&self) -> Result<(), AppError> {
        finite("espionage.base_success_rate", self.base_success_rate)?;
        non_negative("espionage.per_spy_bonus", self.per_spy_bonus)?;
        non_negative("espionage.max_spy_bonus", self.max_spy_bonus)?;
        non_negative("espionage.counter_intel_penalty", self.counter_intel_penalty)?;
        finite("espionage.reconnaissance_modifier", self.reconnaissance_modifier)?;
        finite("espionage.military_intel_modifier", self.military_intel_modifier)?;
        finite("espionage.sabotage_modifier", self.sabotage_modifier)?;
        in_range("espionage.min_success_rate", self.min_success_rate, 0.0, 1.0)?;
        in_range("espionage.max_success_rate", self.max_success_rate, 0.0, 1.0)?;
        if self.min_success_rate > self.max_success_rate {
            return Err(invalid("espionage.min_success_rate exceeds max_success_rate"));
        }
        non_negative("espionage.detection_per_level", self.detection_per_level)?;
        in_range("espionage.max_detection", self.max_detection, 0.0, 1.0)?;
        in_range("espionage.resource_accuracy", self.resource_accuracy, 0.0, 1.0)?;
        in_range("espionage.unit_accuracy", self.unit_accuracy, 0.0, 1.0)?;
        if self.decay_block_hours <= 0 {
            return Err(invalid("espionage.decay_block_hours must be at least 1"));
        }
        in_range("espionage.decay_per_block", self.decay_per_block, 0.0, 1.0)?;
        if self.stale_after_hours < 0 {
            return Err(invalid("espionage.stale_after_hours must be non-negative"));
        }
        if self.max_spies == 0 {
            return Err(invalid("espionage.max_spies must be at least 1"));
        }
        Ok(())
    }

    pub fn type_modifier(&self, mission: MissionType) -> f64 {
        match mission {
            MissionType::Reconnaissance => self.reconnaissance_modifier,
            MissionType::MilitaryIntel => self.military_intel_modifier,
            MissionType::Sabotage => self.sabotage_modifier,
        }
    }
}

impl Default for EspionageBalance {
    fn default() -> Self {
        Self {
            base_success_rate: 0.60,
            per_spy_bonus: 0.05,
            max_spy_bonus: 0.30,
            counter_intel_penalty: 0.10,
            reconnaissance_modifier: 0.20,
            military_intel_modifier: 0.0,
            sabotage_modifier: -0.20,
            min_success_rate: 0.10,
            max_success_rate: 0.95,
            detection_per_level: 0.15,
            max_detection: 0.60,
            resource_accuracy: 0.90,
            unit_accuracy: 0.85,
            decay_block_hours: 6,
            decay_per_block: 0.2,
            stale_after_hours: 24,
            max_spies: 100,
        }
    }
}
