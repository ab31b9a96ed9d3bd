pub mod balance;
pub mod battle;
pub mod composition;
pub mod counters;
pub mod espionage;
pub mod events;
pub mod losses;
pub mod models;
pub mod pvp;
pub mod strength;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
