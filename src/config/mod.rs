/// Application settings loaded from config.toml
pub mod settings;

/// Environment variable overrides and config file discovery
pub mod env;

pub use settings::{AppConfig, CatalogConfig, MAX_AGENCIES, SessionConfig, TimerConfig};

use crate::errors::Result;
use std::path::Path;
use tracing::{debug, info};

/// Loads the application configuration.
///
/// Resolution order for the file: explicit `path`, then `SAFEJOURNEY_CONFIG`, then
/// `./config.toml`. A missing default file yields the built-in defaults; a missing file
/// that was asked for explicitly is an error. Environment overrides are applied last.
pub fn load_app_configuration(path: Option<&Path>) -> Result<AppConfig> {
    let (resolved, explicit) = env::resolve_config_path(path)?;
    let mut config = if resolved.exists() || explicit {
        debug!("Loading configuration from {:?}", resolved);
        settings::load_config(&resolved)?
    } else {
        info!(
            "No configuration file at {:?}, using built-in defaults",
            resolved
        );
        AppConfig::default()
    };

    env::apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}
