use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance in tiles.
    pub fn distance(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// `ceil(distance / speed * 3600)`, with speed in tiles per hour.
    pub fn calculate_travel_time_secs(&self, other: &Position, speed: f64) -> u32 {
        if speed <= 0.0 {
            return 0;
        }
        let distance = self.distance(other);
        (distance as f64 * 3600.0 / speed).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(3, -4);
        assert_eq!(a.distance(&b), 7);
        assert_eq!(b.distance(&a), 7);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_travel_time_rounds_up() {
        let a = Position::new(0, 0);
        let b = Position::new(10, 0);
        // 10 tiles at 2 tiles/hour
        assert_eq!(a.calculate_travel_time_secs(&b, 2.0), 18_000);
        assert_eq!(a.calculate_travel_time_secs(&b, 3.0), 12_000);
        assert_eq!(a.calculate_travel_time_secs(&Position::new(1, 0), 7.0), 515);
    }
}
