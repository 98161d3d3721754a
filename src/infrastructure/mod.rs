//! Infrastructure layer
//!
//! Configuration and logging setup.

mod config;
mod logging;

pub use config::{CONFIG_ENV, Config, ConfigError};
pub use logging::{LOG_ENV, init_logging};
