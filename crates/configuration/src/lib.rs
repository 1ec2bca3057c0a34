use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    ApiConfig, Config, LoggingConfig, RepeatInterval, ReportConfig, ScheduleConfig,
};

/// Prefix of the environment variables layered over the file, e.g. `CRYPTOREPORT__API__KEY`.
pub const ENV_PREFIX: &str = "CRYPTOREPORT";

/// Loads the application configuration from `config.toml` in the working directory.
///
/// The file is optional: every setting has a default, and environment
/// variables are layered on top either way.
pub fn load_config() -> Result<Config, ConfigError> {
    build(config::File::with_name("config.toml").required(false))
}

/// Loads the application configuration from an explicit path, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    build(config::File::from(path).required(true))
}

fn build<S>(file: S) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
