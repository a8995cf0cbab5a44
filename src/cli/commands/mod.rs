//! CLI command implementations.

mod config;
mod doctor;
mod serve;
mod tools;

pub use config::run_config;
pub use doctor::run_doctor;
pub use serve::run_serve;
pub use tools::run_tools;
