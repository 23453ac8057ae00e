//! Layered configuration: TOML files overlaid by `MOVIE_*` environment variables.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{DatabaseConfig, ListenType, LoggerSettings, ServerConfig, Settings};
