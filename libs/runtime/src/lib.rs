//! Process-level runtime support: layered configuration and logging bootstrap.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, ServerConfig};
