use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use warfront_types::{
    buildings::BuildingName,
    common::Resources,
    errors::GameError,
    map::Position,
};

use crate::composition::{ArmyComposition, DefenseComposition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub player_id: Uuid,
    pub name: String,
    pub position: Position,
    pub resources: Resources,
    pub buildings: BTreeMap<BuildingName, u8>,
    pub garrison: ArmyComposition,
    pub defenses: DefenseComposition,
}

impl City {
    pub fn building_level(&self, name: BuildingName) -> u8 {
        self.buildings.get(&name).copied().unwrap_or(0)
    }

    pub fn walls_level(&self) -> u8 {
        self.building_level(BuildingName::Walls)
    }

    /// Intelligence center level, used as counter-intelligence.
    pub fn counter_intel_level(&self) -> u8 {
        self.building_level(BuildingName::IntelligenceCenter)
    }

    /// Takes the given units out of the garrison, all or nothing.
    pub fn deploy(&mut self, units: &ArmyComposition) -> Result<(), GameError> {
        if units.is_empty() {
            return Err(GameError::NoUnitsSelected);
        }
        if !self.garrison.contains(units) {
            return Err(GameError::NotEnoughUnits);
        }
        for (unit, qty) in units.iter() {
            self.garrison.remove(unit, qty);
        }
        Ok(())
    }

    /// Charges `cost`, all or nothing.
    pub fn spend(&mut self, cost: &Resources) -> Result<(), GameError> {
        if !self.resources.covers(cost) {
            return Err(GameError::NotEnoughResources);
        }
        self.resources = self.resources.saturating_sub(cost);
        Ok(())
    }

    pub fn store(&mut self, resources: &Resources) {
        self.resources = self.resources + *resources;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{city_factory, CityFactoryOptions};
    use warfront_types::army::UnitId;

    #[test]
    fn test_deploy_is_all_or_nothing() {
        let mut city = city_factory(CityFactoryOptions {
            garrison: Some([(UnitId::Riflemen, 10), (UnitId::Spy, 2)].into_iter().collect()),
            ..Default::default()
        });

        let too_many: ArmyComposition = [(UnitId::Riflemen, 5), (UnitId::Spy, 3)].into_iter().collect();
        assert!(matches!(city.deploy(&too_many), Err(GameError::NotEnoughUnits)));
        assert_eq!(city.garrison.get(UnitId::Riflemen), 10);

        let ok: ArmyComposition = [(UnitId::Riflemen, 5)].into_iter().collect();
        city.deploy(&ok).unwrap();
        assert_eq!(city.garrison.get(UnitId::Riflemen), 5);

        assert!(matches!(
            city.deploy(&ArmyComposition::new()),
            Err(GameError::NoUnitsSelected)
        ));
    }

    #[test]
    fn test_spend_requires_every_resource() {
        let mut city = city_factory(CityFactoryOptions {
            resources: Some(Resources::new(100, 100, 100)),
            ..Default::default()
        });
        assert!(matches!(
            city.spend(&Resources::new(0, 0, 101)),
            Err(GameError::NotEnoughResources)
        ));
        city.spend(&Resources::new(50, 0, 100)).unwrap();
        assert_eq!(city.resources, Resources::new(50, 100, 0));
    }
}
