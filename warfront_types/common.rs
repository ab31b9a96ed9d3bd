use serde::{Deserialize, Serialize};

/// Gold, metal and fuel held by a city or moved by an army.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub gold: u32,
    pub metal: u32,
    pub fuel: u32,
}

impl Resources {
    pub const fn new(gold: u32, metal: u32, fuel: u32) -> Self {
        Self { gold, metal, fuel }
    }

    pub fn total(&self) -> u64 {
        self.gold as u64 + self.metal as u64 + self.fuel as u64
    }

    /// Returns true if every resource is at least the one in `other`.
    pub fn covers(&self, other: &Resources) -> bool {
        self.gold >= other.gold && self.metal >= other.metal && self.fuel >= other.fuel
    }

    /// Subtracts `other`, flooring every resource at zero.
    pub fn saturating_sub(&self, other: &Resources) -> Resources {
        Resources {
            gold: self.gold.saturating_sub(other.gold),
            metal: self.metal.saturating_sub(other.metal),
            fuel: self.fuel.saturating_sub(other.fuel),
        }
    }
}

impl core::ops::Add for Resources {
    type Output = Resources;

    fn add(self, rhs: Self) -> Self::Output {
        Resources {
            gold: self.gold.saturating_add(rhs.gold),
            metal: self.metal.saturating_add(rhs.metal),
            fuel: self.fuel.saturating_add(rhs.fuel),
        }
    }
}

impl core::ops::Mul<f64> for Resources {
    type Output = Resources;

    fn mul(self, rhs: f64) -> Self::Output {
        let gold = (self.gold as f64 * rhs).floor() as u32;
        let metal = (self.metal as f64 * rhs).floor() as u32;
        let fuel = (self.fuel as f64 * rhs).floor() as u32;
        Resources { gold, metal, fuel }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_total() {
        let r = Resources::new(100, 200, 300);
        assert_eq!(r.total(), 600);
        assert_eq!(Resources::default().total(), 0);
    }

    #[test]
    fn test_resources_mul_floors() {
        let r = Resources::new(10_001, 5_005, 3_003) * 0.2;
        assert_eq!(r, Resources::new(2_000, 1_001, 600));
    }

    #[test]
    fn test_resources_saturating_sub() {
        let r = Resources::new(100, 50, 0).saturating_sub(&Resources::new(150, 20, 10));
        assert_eq!(r, Resources::new(0, 30, 0));
    }

    #[test]
    fn test_resources_covers() {
        let stock = Resources::new(100, 100, 100);
        assert!(stock.covers(&Resources::new(100, 0, 99)));
        assert!(!stock.covers(&Resources::new(0, 101, 0)));
    }
}
