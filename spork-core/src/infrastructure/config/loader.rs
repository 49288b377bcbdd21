//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (SPORK_* prefix)

use crate::foundation::SporkError;
use crate::infrastructure::config::types::SporkConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::{debug, info};
use std::path::Path;

/// Environment variable prefix for config overrides.
///
/// Example: `SPORK_KEYSET__THRESHOLD=3` -> `keyset.threshold`
pub const ENV_PREFIX: &str = "SPORK_";

pub const DEFAULT_CONFIG_FILE: &str = "spork.toml";

/// Load configuration from `spork.toml` in `dir`.
pub fn load_config(dir: &Path) -> Result<SporkConfig, SporkError> {
    load_config_from_file(&dir.join(DEFAULT_CONFIG_FILE))
}

/// Load configuration from a specific file path. A missing file falls back to defaults and env.
pub fn load_config_from_file(path: &Path) -> Result<SporkConfig, SporkError> {
    info!("loading configuration path={}", path.display());
    let mut figment = Figment::new().merge(Serialized::defaults(SporkConfig::default()));
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        debug!("configuration file missing; using defaults and env only path={}", path.display());
    }
    // `SPORK_TEST_NOW_SECS` shares the prefix but is not a config key.
    let env = Env::prefixed(ENV_PREFIX).ignore(&["TEST_NOW_SECS"]).split("__");
    let config: SporkConfig =
        figment.merge(env).extract().map_err(|e| SporkError::ConfigError(format!("config extraction failed: {e}")))?;
    debug!(
        "configuration loaded keyset_version={} signers={} threshold={} signer_key_set={}",
        config.keyset.version,
        config.keyset.signers.len(),
        config.keyset.threshold,
        config.signer_key.is_some()
    );
    Ok(config)
}

/// Load, then reject any configuration that fails [`SporkConfig::validate`].
pub fn load_validated_config(path: &Path) -> Result<SporkConfig, SporkError> {
    let config = load_config_from_file(path)?;
    config.validate().map_err(|errors| SporkError::ConfigError(format!("validation failed: {:?}", errors)))?;
    Ok(config)
}
