pub mod attack;
pub mod city;
pub mod report;
pub mod spy_mission;
