//! Settings loading from config.toml
//!
//! Every section and field is optional; omitted values fall back to the defaults the
//! demo catalog was designed around (20 agencies, 100 programs, 300 feedback entries).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Largest number of agencies the generator has names for
pub const MAX_AGENCIES: usize = 20;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Mock catalog generation
    pub catalog: CatalogConfig,
    /// Mock session behaviour
    pub session: SessionConfig,
    /// Delays of self-dismissing modals and the home carousel ticker
    pub timers: TimerConfig,
}

/// Controls the size and randomness of the generated catalog
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// RNG seed; a fixed seed reproduces the same catalog
    pub seed: Option<u64>,
    /// Number of agencies to generate
    pub agencies: usize,
    /// Number of programs to generate
    pub programs: usize,
    /// Size of the shuffled feedback pool
    pub feedbacks: usize,
    /// Leading agencies that hold every certification
    pub top_agencies: usize,
    /// Leading programs owned by top agencies and carrying every verification
    pub premium_programs: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed: None,
            agencies: MAX_AGENCIES,
            programs: 100,
            feedbacks: 300,
            top_agencies: 5,
            premium_programs: 10,
        }
    }
}

/// Mock login settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Signing in with this email opens the agency dashboard
    pub agency_login_email: String,
    /// Agency the dashboard operates on
    pub dashboard_agency_id: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            agency_login_email: "agencia@app.com.br".to_string(),
            dashboard_agency_id: 1,
        }
    }
}

/// Timer settings in milliseconds
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimerConfig {
    /// Delay before a submitted report closes itself
    pub report_dismiss_ms: u64,
    /// Delay before a submitted info request closes itself
    pub info_request_dismiss_ms: u64,
    /// Lifetime of transient popups (registration, password reset)
    pub popup_ms: u64,
    /// Period of the home carousel ticker
    pub ticker_interval_ms: u64,
    /// Offset advanced per carousel tick
    pub ticker_step: usize,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            report_dismiss_ms: 2500,
            info_request_dismiss_ms: 3000,
            popup_ms: 3000,
            ticker_interval_ms: 40,
            ticker_step: 1,
        }
    }
}

impl AppConfig {
    /// Checks cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when the catalog sizes are inconsistent or a timer period
    /// is zero.
    pub fn validate(&self) -> Result<()> {
        let catalog = &self.catalog;
        if catalog.agencies == 0 || catalog.agencies > MAX_AGENCIES {
            return Err(Error::Config {
                message: format!(
                    "catalog.agencies must be between 1 and {MAX_AGENCIES}, got {}",
                    catalog.agencies
                ),
            });
        }
        if catalog.programs == 0 {
            return Err(Error::Config {
                message: "catalog.programs must be at least 1".to_string(),
            });
        }
        if catalog.feedbacks == 0 {
            return Err(Error::Config {
                message: "catalog.feedbacks must be at least 1".to_string(),
            });
        }
        if catalog.top_agencies > catalog.agencies {
            return Err(Error::Config {
                message: format!(
                    "catalog.top_agencies ({}) exceeds catalog.agencies ({})",
                    catalog.top_agencies, catalog.agencies
                ),
            });
        }
        if catalog.premium_programs > catalog.programs {
            return Err(Error::Config {
                message: format!(
                    "catalog.premium_programs ({}) exceeds catalog.programs ({})",
                    catalog.premium_programs, catalog.programs
                ),
            });
        }
        if catalog.premium_programs > 0 && catalog.top_agencies == 0 {
            return Err(Error::Config {
                message: "premium programs need at least one top agency".to_string(),
            });
        }
        if self.timers.ticker_interval_ms == 0 {
            return Err(Error::Config {
                message: "timers.ticker_interval_ms must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file {:?}: {e}", path.as_ref()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] when the text is not valid configuration TOML.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}
