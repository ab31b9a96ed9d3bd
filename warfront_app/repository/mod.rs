mod attack_repository;
mod city_repository;
mod job_repository;
mod report_repository;
mod research_repository;
mod spy_mission_repository;

pub use attack_repository::AttackRepository;
pub use city_repository::CityRepository;
pub use job_repository::JobRepository;
pub use report_repository::ReportRepository;
pub use research_repository::ResearchRepository;
pub use spy_mission_repository::SpyMissionRepository;
