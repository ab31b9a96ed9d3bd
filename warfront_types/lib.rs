pub mod army;
pub mod battle;
pub mod buildings;
pub mod common;
pub mod defense;
pub mod errors;
pub mod espionage;
pub mod map;
pub mod research;

pub use errors::Result;
