//! Utility modules for the master agent.

pub mod config;
pub mod errors;

pub use config::{ConfigError, Settings};
pub use errors::OrchestratorError;
