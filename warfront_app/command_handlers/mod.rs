mod cancel_attack;
mod launch_attack;
mod launch_spy_mission;

pub use cancel_attack::CancelAttackCommandHandler;
pub use launch_attack::LaunchAttackCommandHandler;
pub use launch_spy_mission::LaunchSpyMissionCommandHandler;
