mod get_defense_report;
mod get_player_power;
mod get_spy_mission_report;
mod suggest_targets;

pub use get_defense_report::GetDefenseReportQueryHandler;
pub use get_player_power::GetPlayerPowerQueryHandler;
pub use get_spy_mission_report::GetSpyMissionReportQueryHandler;
pub use suggest_targets::SuggestTargetsQueryHandler;
