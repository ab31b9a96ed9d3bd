use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechName {
    MilitaryTactics,
    AdvancedWeaponry,
    DefensiveTactics,
    Fortifications,
}

impl TechName {
    /// Techs whose completed levels add to attacking strength.
    pub const ATTACK: [TechName; 2] = [TechName::MilitaryTactics, TechName::AdvancedWeaponry];

    /// Techs whose completed levels add to defending strength.
    pub const DEFENSE: [TechName; 2] = [TechName::DefensiveTactics, TechName::Fortifications];
}
