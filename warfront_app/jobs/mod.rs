pub mod handler;
pub mod tasks;
pub mod worker;

mod job;

pub use job::*;
