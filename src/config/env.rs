//! Environment overrides for the configuration.
//!
//! Variables are usually provided through the `.env` file loaded at startup:
//! `SAFEJOURNEY_CONFIG` (config file path), `CATALOG_SEED` and `AGENCY_LOGIN_EMAIL`.

use super::AppConfig;
use crate::errors::{Error, Result};
use std::{
    env::{self, VarError},
    path::{Path, PathBuf},
};

/// Environment variable holding the config file path
pub const CONFIG_PATH_VAR: &str = "SAFEJOURNEY_CONFIG";
/// Environment variable overriding the catalog seed
pub const SEED_VAR: &str = "CATALOG_SEED";
/// Environment variable overriding the agency login email
pub const AGENCY_EMAIL_VAR: &str = "AGENCY_LOGIN_EMAIL";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Reads an optional variable; unset is `None`, non-unicode content is an error.
fn optional_var(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Resolves which config file to read and whether it was requested explicitly.
///
/// # Errors
/// Returns [`Error::EnvVar`] when `SAFEJOURNEY_CONFIG` is not valid unicode.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Result<(PathBuf, bool)> {
    if let Some(path) = cli_path {
        return Ok((path.to_path_buf(), true));
    }
    Ok(optional_var(CONFIG_PATH_VAR)?.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        |path| (PathBuf::from(path), true),
    ))
}

/// Applies environment overrides on top of the file configuration.
///
/// # Errors
/// Returns [`Error::Config`] when `CATALOG_SEED` is set but not an unsigned integer, and
/// [`Error::EnvVar`] when a variable is not valid unicode.
pub fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    if let Some(seed) = optional_var(SEED_VAR)? {
        config.catalog.seed = Some(parse_seed(&seed)?);
    }
    if let Some(email) = optional_var(AGENCY_EMAIL_VAR)? {
        if !email.trim().is_empty() {
            config.session.agency_login_email = email.trim().to_string();
        }
    }
    Ok(())
}

/// Parses a seed value from text.
///
/// # Errors
/// Returns [`Error::Config`] when `raw` is not an unsigned 64-bit integer.
pub fn parse_seed(raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|e| Error::Config {
        message: format!("{SEED_VAR} must be an unsigned integer, got '{raw}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed(" 42 ").unwrap(), 42);
        assert!(matches!(parse_seed("forty"), Err(Error::Config { .. })));
        assert!(parse_seed("-1").is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        let (path, explicit) = resolve_config_path(Some(Path::new("custom.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("custom.toml"));
        assert!(explicit);
    }
}
