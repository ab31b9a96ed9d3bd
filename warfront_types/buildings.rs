use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingName {
    GoldMine,
    MetalMine,
    FuelDepot,
    Barracks,
    Factory,
    ResearchLab,
    Walls,
    IntelligenceCenter,
    DefenseWorkshop,
}

impl BuildingName {
    /// Weight of one building level in the PvP power score.
    pub fn power_weight(&self) -> u32 {
        match self {
            BuildingName::GoldMine | BuildingName::MetalMine | BuildingName::FuelDepot => 50,
            BuildingName::Barracks | BuildingName::Factory => 100,
            BuildingName::ResearchLab => 150,
            BuildingName::Walls
            | BuildingName::IntelligenceCenter
            | BuildingName::DefenseWorkshop => 0,
        }
    }
}
