//! Core building blocks: period arithmetic and game configuration

pub mod config;
pub mod period;

pub use config::{ConfigError, GameConfig, ProductionTier};
pub use period::Period;
