//! `warfront`: offline tools over the resolution engine.

// Command output goes to stdout.
#![allow(clippy::print_stdout)]

mod logs;
mod scenario;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::{fs, path::PathBuf};
use tracing::{debug, info};

use warfront_app::config::{Config, load_balance};
use warfront_game::{
    balance::BalanceConfig,
    counters::validate_catalog,
    espionage::{detection_chance, spy_losses, spy_success_rate},
};
use warfront_types::{
    army::UNITS, defense::DEFENSES, errors::GameError, espionage::MissionType,
};

use logs::setup_logging;
use scenario::Scenario;

#[derive(Parser, Debug)]
#[command(name = "warfront")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding the balance constants (default: WARFRONT_BALANCE_FILE)
    #[arg(long, global = true)]
    balance: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a battle scenario and print the report as JSON
    Simulate {
        /// Scenario file (.json)
        scenario: PathBuf,
    },

    /// Success rate, detection chance and expected losses of a spy mission
    SpyOdds {
        /// Spies sent, at most the balance's `max_spies`
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        spies: u32,

        /// Intelligence center level of the target
        #[arg(long, default_value = "0")]
        counter_intel: u8,

        /// reconnaissance, military_intel or sabotage
        #[arg(long, default_value = "reconnaissance", value_parser = parse_mission)]
        mission: MissionType,
    },

    /// Validate the unit and defense catalog and list it
    Catalog,
}

#[derive(Debug, Serialize)]
struct SpyOdds {
    mission: MissionType,
    spies: u32,
    counter_intel: u8,
    success_rate: f64,
    detection_chance: f64,
    /// Losses if detected, weighted by the detection chance.
    expected_spies_lost: f64,
}

fn parse_mission(s: &str) -> Result<MissionType, String> {
    s.parse()
}

#[cfg(not(tarpaulin_include))]
fn main() -> anyhow::Result<()> {
    let _guard = setup_logging();
    let args = Args::parse();
    let balance = resolve_balance(args.balance.as_deref())?;

    match args.command {
        Commands::Simulate { scenario } => {
            let raw = fs::read_to_string(&scenario)
                .with_context(|| format!("reading {}", scenario.display()))?;
            let scenario = Scenario::from_json(&raw).context("parsing scenario")?;
            let report = scenario.run(&balance);
            info!(
                outcome = ?report.outcome.outcome,
                rounds = report.outcome.rounds.len(),
                "Scenario resolved"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::SpyOdds {
            spies,
            counter_intel,
            mission,
        } => {
            let odds = spy_odds(spies, counter_intel, mission, &balance)?;
            println!("{}", serde_json::to_string_pretty(&odds)?);
        }
        Commands::Catalog => {
            validate_catalog()?;
            print_catalog();
        }
    }
    Ok(())
}

fn resolve_balance(path: Option<&std::path::Path>) -> anyhow::Result<BalanceConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading balance file");
            Ok(load_balance(path)?)
        }
        None => Ok(Config::from_env()?.balance),
    }
}

fn spy_odds(
    spies: u32,
    counter_intel: u8,
    mission: MissionType,
    balance: &BalanceConfig,
) -> Result<SpyOdds, GameError> {
    let max = balance.espionage.max_spies;
    if spies == 0 || spies > max {
        return Err(GameError::InvalidSpyCount { count: spies, max });
    }
    let success_rate = spy_success_rate(spies, counter_intel, mission, &balance.espionage);
    let detection = detection_chance(counter_intel, &balance.espionage);
    Ok(SpyOdds {
        mission,
        spies,
        counter_intel,
        success_rate,
        detection_chance: detection,
        expected_spies_lost: detection * spy_losses(spies, success_rate, true) as f64,
    })
}

fn print_catalog() {
    println!(
        "{:<20} {:>4} {:<14} {:>6} {:>7} {:>6} {:>5}",
        "unit", "tier", "category", "attack", "defense", "health", "speed"
    );
    for unit in UNITS.iter() {
        println!(
            "{:<20} {:>4} {:<14} {:>6} {:>7} {:>6} {:>5}",
            unit.id.key(),
            unit.tier,
            format!("{:?}", unit.category),
            unit.attack,
            unit.defense,
            unit.health,
            unit.speed
        );
    }
    println!();
    println!(
        "{:<20} {:>4} {:<14} {:>6} {:>7} {:>6} {:>8}",
        "defense", "tier", "category", "attack", "defense", "health", "workshop"
    );
    for defense in DEFENSES.iter() {
        println!(
            "{:<20} {:>4} {:<14} {:>6} {:>7} {:>6} {:>8}",
            defense.id.key(),
            defense.tier,
            format!("{:?}", defense.category),
            defense.attack,
            defense.defense,
            defense.health,
            defense.required_workshop_level
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spy_odds_against_undefended_city() {
        let odds = spy_odds(5, 0, MissionType::Reconnaissance, &BalanceConfig::default()).unwrap();
        assert_eq!(odds.detection_chance, 0.0);
        assert_eq!(odds.expected_spies_lost, 0.0);
        assert!(odds.success_rate > 0.6);
    }

    #[test]
    fn test_spy_odds_weights_losses_by_detection() {
        let balance = BalanceConfig::default();
        let odds = spy_odds(10, 5, MissionType::Sabotage, &balance).unwrap();
        let lost_if_detected = spy_losses(10, odds.success_rate, true) as f64;
        assert_eq!(odds.detection_chance, 0.6);
        assert!((odds.expected_spies_lost - 0.6 * lost_if_detected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_spies_is_rejected_by_the_parser() {
        assert!(Args::try_parse_from(["warfront", "spy-odds", "--spies", "0"]).is_err());
        assert!(
            Args::try_parse_from(["warfront", "spy-odds", "--spies", "500", "--mission", "sabotage"])
                .is_ok()
        );
    }

    #[test]
    fn test_spy_count_is_bounded_by_the_loaded_balance() {
        let mut balance = BalanceConfig::default();
        assert!(matches!(
            spy_odds(101, 0, MissionType::Reconnaissance, &balance),
            Err(GameError::InvalidSpyCount { count: 101, max: 100 })
        ));

        balance.espionage.max_spies = 500;
        let odds = spy_odds(500, 0, MissionType::Reconnaissance, &balance).unwrap();
        assert_eq!(odds.spies, 500);

        let err = spy_odds(501, 0, MissionType::Reconnaissance, &balance).unwrap_err();
        assert_eq!(err.to_string(), "Invalid spy count 501: must be between 1 and 500");
    }
}
