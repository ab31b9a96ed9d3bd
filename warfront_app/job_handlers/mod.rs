pub mod army_return;
pub mod attack;
pub mod attack_arrival;
pub mod helpers;
pub mod spy_mission;
