pub mod app_bus;
pub mod command_handlers;
pub mod config;
pub mod cqrs;
pub mod events;
pub mod job_handlers;
pub mod job_registry;
pub mod jobs;
pub mod power;
pub mod queries_handlers;
pub mod repository;
pub mod test_utils;
pub mod uow;

pub use warfront_types::errors::{ApplicationError, Result};
