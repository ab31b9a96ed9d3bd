use chrono::{Duration, Utc};
use rand::Rng;
use std::collections::BTreeMap;
use uuid::Uuid;

use warfront_types::{
    battle::{AttackStatus, AttackType},
    buildings::BuildingName,
    common::Resources,
    espionage::{MissionStatus, MissionType},
    map::Position,
};

use crate::{
    composition::{ArmyComposition, DefenseComposition},
    models::{
        attack::{Attack, AttackMetadata, AttackWave},
        city::City,
        spy_mission::SpyMission,
    },
};

#[derive(Default, Clone)]
pub struct CityFactoryOptions {
    pub id: Option<Uuid>,
    pub player_id: Option<Uuid>,
    pub name: Option<String>,
    pub position: Option<Position>,
    pub resources: Option<Resources>,
    pub buildings: Option<BTreeMap<BuildingName, u8>>,
    pub garrison: Option<ArmyComposition>,
    pub defenses: Option<DefenseComposition>,
}

#[derive(Default, Clone)]
pub struct AttackFactoryOptions {
    pub id: Option<Uuid>,
    pub attacker: Option<City>,
    pub defender: Option<City>,
    pub attack_type: Option<AttackType>,
    pub status: Option<AttackStatus>,
    pub waves: Option<Vec<AttackWave>>,
    pub metadata: Option<AttackMetadata>,
}

#[derive(Default, Clone)]
pub struct SpyMissionFactoryOptions {
    pub spy_city: Option<City>,
    pub target_city: Option<City>,
    pub spy_count: Option<u32>,
    pub mission_type: Option<MissionType>,
    pub status: Option<MissionStatus>,
}

pub fn city_factory(options: CityFactoryOptions) -> City {
    let default_name = format!("city_{}", rand::thread_rng().r#gen::<u32>());
    City {
        id: options.id.unwrap_or_else(Uuid::new_v4),
        player_id: options.player_id.unwrap_or_else(Uuid::new_v4),
        name: options.name.unwrap_or(default_name),
        position: options.position.unwrap_or_default(),
        resources: options.resources.unwrap_or_default(),
        buildings: options.buildings.unwrap_or_default(),
        garrison: options.garrison.unwrap_or_default(),
        defenses: options.defenses.unwrap_or_default(),
    }
}

pub fn attack_factory(options: AttackFactoryOptions) -> Attack {
    let attacker = options
        .attacker
        .unwrap_or_else(|| city_factory(CityFactoryOptions::default()));
    let defender = options.defender.unwrap_or_else(|| {
        city_factory(CityFactoryOptions {
            position: Some(Position::new(5, 5)),
            ..Default::default()
        })
    });
    let now = Utc::now();

    Attack {
        id: options.id.unwrap_or_else(Uuid::new_v4),
        attacker_player_id: attacker.player_id,
        attacker_city_id: attacker.id,
        defender_player_id: defender.player_id,
        defender_city_id: defender.id,
        attack_type: options.attack_type.unwrap_or(AttackType::Raid),
        status: options.status.unwrap_or(AttackStatus::Traveling),
        waves: options.waves.unwrap_or_default(),
        metadata: options.metadata.unwrap_or_default(),
        departed_at: now,
        arrival_time: now + Duration::hours(1),
        outcome: None,
        loot: Resources::default(),
        attacker_losses: BTreeMap::new(),
        defender_losses: BTreeMap::new(),
    }
}

pub fn spy_mission_factory(options: SpyMissionFactoryOptions) -> SpyMission {
    let spy_city = options
        .spy_city
        .unwrap_or_else(|| city_factory(CityFactoryOptions::default()));
    let target_city = options
        .target_city
        .unwrap_or_else(|| city_factory(CityFactoryOptions::default()));
    let now = Utc::now();

    SpyMission {
        id: Uuid::new_v4(),
        spy_player_id: spy_city.player_id,
        spy_city_id: spy_city.id,
        target_player_id: target_city.player_id,
        target_city_id: target_city.id,
        spy_count: options.spy_count.unwrap_or(5),
        mission_type: options.mission_type.unwrap_or(MissionType::Reconnaissance),
        status: options.status.unwrap_or(MissionStatus::Traveling),
        departed_at: now,
        arrival_time: now + Duration::minutes(30),
        success_rate: None,
        detected: false,
        spies_lost: 0,
        intel: None,
    }
}
