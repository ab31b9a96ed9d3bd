//! Anti-snowballing PvP scaling.
//!
//! Attacking a much weaker player costs more and pays less, attacking a
//! stronger one pays more. Nothing here blocks an attack.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warfront_types::common::Resources;

use crate::{balance::PvpBalance, models::city::City};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerBreakdown {
    pub city_count: u32,
    pub cities: u64,
    pub buildings: u64,
    pub units: u64,
    pub resources: u64,
    pub total: u64,
}

impl PowerBreakdown {
    /// Share of the total held by `part`, as a percentage.
    pub fn percentage(&self, part: u64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        part as f64 / self.total as f64 * 100.0
    }
}

/// Aggregate power of a player over all of their cities.
pub fn calculate_player_power(cities: &[City], balance: &PvpBalance) -> PowerBreakdown {
    let city_power = cities.len() as u64 * balance.city_weight;

    let buildings: u64 = cities
        .iter()
        .flat_map(|c| c.buildings.iter())
        .map(|(name, level)| *level as u64 * name.power_weight() as u64)
        .sum();

    let units: u64 = cities
        .iter()
        .flat_map(|c| c.garrison.iter())
        .map(|(unit, qty)| qty as u64 * unit.definition().power_weight as u64)
        .sum();

    let resources: f64 = cities
        .iter()
        .map(|c| {
            c.resources.gold as f64 * balance.gold_weight
                + c.resources.metal as f64 * balance.metal_weight
                + c.resources.fuel as f64 * balance.fuel_weight
        })
        .sum();
    let resources = resources.floor() as u64;

    PowerBreakdown {
        city_count: cities.len() as u32,
        cities: city_power,
        buildings,
        units,
        resources,
        total: city_power + buildings + units + resources,
    }
}

/// `defender / attacker`. An attacker with no power is treated as power 1.
pub fn power_ratio(attacker_power: u64, defender_power: u64) -> f64 {
    defender_power as f64 / attacker_power.max(1) as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModifier {
    pub cost_multiplier: f64,
    pub gold_surcharge: u32,
    pub is_weak_target: bool,
    pub power_ratio: f64,
}

pub fn attack_cost_modifier(attacker_power: u64, defender_power: u64, balance: &PvpBalance) -> CostModifier {
    let ratio = power_ratio(attacker_power, defender_power);
    if ratio < balance.weak_target_ratio {
        CostModifier {
            cost_multiplier: balance.weak_target_cost_multiplier,
            gold_surcharge: balance.weak_target_gold_surcharge,
            is_weak_target: true,
            power_ratio: ratio,
        }
    } else {
        CostModifier {
            cost_multiplier: 1.0,
            gold_surcharge: 0,
            is_weak_target: false,
            power_ratio: ratio,
        }
    }
}

/// Loot multiplier for a given power ratio.
pub fn reward_multiplier(power_ratio: f64, balance: &PvpBalance) -> f64 {
    if power_ratio < balance.weak_target_ratio {
        balance.weak_target_reward_multiplier
    } else if power_ratio > balance.strong_target_ratio {
        balance.strong_target_reward_multiplier
    } else {
        1.0
    }
}

/// Metal and fuel are multiplied and rounded up, gold gets the flat surcharge.
pub fn apply_attack_cost_scaling(cost: &Resources, modifier: &CostModifier) -> Resources {
    Resources {
        gold: cost.gold.saturating_add(modifier.gold_surcharge),
        metal: (cost.metal as f64 * modifier.cost_multiplier).ceil() as u32,
        fuel: (cost.fuel as f64 * modifier.cost_multiplier).ceil() as u32,
    }
}

pub fn apply_reward_scaling(rewards: &Resources, multiplier: f64) -> Resources {
    *rewards * multiplier
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fairness {
    Optimal,
    Fair,
    Unfair,
    VeryUnfair,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchFairness {
    pub fairness: Fairness,
    /// `|1 - defender / attacker|`
    pub power_difference: f64,
}

pub fn match_fairness(attacker_power: u64, defender_power: u64, balance: &PvpBalance) -> MatchFairness {
    let diff = (1.0 - power_ratio(attacker_power, defender_power)).abs();
    let fairness = if diff <= balance.optimal_range {
        Fairness::Optimal
    } else if diff <= balance.fair_range {
        Fairness::Fair
    } else if diff <= balance.unfair_threshold {
        Fairness::Unfair
    } else {
        Fairness::VeryUnfair
    };
    MatchFairness {
        fairness,
        power_difference: diff,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTarget {
    pub player_id: Uuid,
    pub power: u64,
    pub fairness: Fairness,
    pub power_difference: f64,
    /// Lower is a better match.
    pub score: f64,
}

/// Candidates sorted best match first.
pub fn suggest_targets<I>(attacker_power: u64, candidates: I, balance: &PvpBalance) -> Vec<SuggestedTarget>
where
    I: IntoIterator<Item = (Uuid, u64)>,
{
    let mut targets: Vec<SuggestedTarget> = candidates
        .into_iter()
        .map(|(player_id, power)| {
            let fairness = match_fairness(attacker_power, power, balance);
            let diff = fairness.power_difference;
            let mut score = diff;
            if diff <= balance.optimal_range {
                score *= 0.5;
            }
            if diff <= balance.fair_range {
                score *= 0.8;
            }
            SuggestedTarget {
                player_id,
                power,
                fairness: fairness.fairness,
                power_difference: diff,
                score,
            }
        })
        .collect();

    targets.sort_by(|a, b| a.score.total_cmp(&b.score));
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{city_factory, CityFactoryOptions};
    use warfront_types::{army::UnitId, buildings::BuildingName};

    #[test]
    fn test_player_power_breakdown() {
        let balance = PvpBalance::default();
        let mut city = city_factory(CityFactoryOptions {
            resources: Some(Resources::new(1000, 1000, 1000)),
            ..Default::default()
        });
        city.buildings.insert(BuildingName::GoldMine, 4);
        city.buildings.insert(BuildingName::ResearchLab, 2);
        city.buildings.insert(BuildingName::Walls, 10);
        city.garrison.add(UnitId::Riflemen, 10);
        city.garrison.add(UnitId::HeavyTank, 2);

        let power = calculate_player_power(&[city], &balance);

        assert_eq!(power.cities, 1000);
        assert_eq!(power.buildings, 4 * 50 + 2 * 150);
        assert_eq!(power.units, 10 * 10 + 2 * 80);
        // 1000 * (0.05 + 0.03 + 0.02)
        assert_eq!(power.resources, 100);
        assert_eq!(power.total, 1000 + 500 + 260 + 100);
    }

    #[test]
    fn test_weak_target_doubles_cost_and_adds_gold() {
        let balance = PvpBalance::default();
        let modifier = attack_cost_modifier(10_000, 4_000, &balance);
        assert!(modifier.is_weak_target);

        let cost = apply_attack_cost_scaling(&Resources::new(0, 0, 101), &modifier);
        assert_eq!(cost, Resources::new(5000, 0, 202));

        let fair = attack_cost_modifier(10_000, 5_000, &balance);
        assert!(!fair.is_weak_target);
        assert_eq!(
            apply_attack_cost_scaling(&Resources::new(0, 0, 101), &fair),
            Resources::new(0, 0, 101)
        );
    }

    #[test]
    fn test_reward_multiplier_thresholds() {
        let balance = PvpBalance::default();
        assert_eq!(reward_multiplier(0.3, &balance), 0.5);
        assert_eq!(reward_multiplier(0.5, &balance), 1.0);
        assert_eq!(reward_multiplier(1.2, &balance), 1.0);
        assert_eq!(reward_multiplier(1.21, &balance), 1.5);
    }

    #[test]
    fn test_match_fairness_classes() {
        let balance = PvpBalance::default();
        assert_eq!(match_fairness(1000, 1100, &balance).fairness, Fairness::Optimal);
        assert_eq!(match_fairness(1000, 600, &balance).fairness, Fairness::Fair);
        assert_eq!(match_fairness(1000, 1650, &balance).fairness, Fairness::Unfair);
        assert_eq!(match_fairness(1000, 100, &balance).fairness, Fairness::VeryUnfair);
    }

    #[test]
    fn test_suggest_targets_orders_by_score() {
        let balance = PvpBalance::default();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let targets = suggest_targets(1000, [(a, 100), (b, 1050), (c, 1400)], &balance);

        let order: Vec<Uuid> = targets.iter().map(|t| t.player_id).collect();
        assert_eq!(order, vec![b, c, a]);
        assert_eq!(targets[0].fairness, Fairness::Optimal);
        assert_eq!(targets[2].fairness, Fairness::VeryUnfair);
    }

    #[test]
    fn test_zero_power_attacker_does_not_divide_by_zero() {
        assert_eq!(power_ratio(0, 500), 500.0);
        assert_eq!(power_ratio(0, 0), 0.0);
    }
}
