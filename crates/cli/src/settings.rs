//! Engine settings: built-in defaults, then tally.toml, then TALLY_* variables

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use std::path::Path;
use tally_core::EngineConfig;
use tracing::debug;

/// Settings file looked up in the working directory (any supported extension)
pub const DEFAULT_SETTINGS_NAME: &str = "tally";

/// Prefix for environment overrides, e.g. `TALLY_ROUNDING=integer`
pub const ENV_PREFIX: &str = "TALLY";

/// Load and validate the engine configuration
///
/// An explicit path must exist; the default `tally.toml` is optional.
pub fn load(explicit: Option<&Path>) -> Result<EngineConfig> {
    let defaults = EngineConfig::default();

    let file = match explicit {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_SETTINGS_NAME).required(false),
    };

    let config = Config::builder()
        .set_default("nominal_in_progress", defaults.nominal_in_progress)?
        .set_default("rounding", defaults.rounding.as_str())?
        .add_source(file)
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .with_context(|| match explicit {
            Some(path) => format!("Failed to read settings from {}", path.display()),
            None => "Failed to read settings".to_string(),
        })?;

    let settings: EngineConfig = config
        .try_deserialize()
        .context("Invalid engine settings")?;
    settings.validate().context("Invalid engine settings")?;

    debug!(
        "Engine settings: nominal in-progress {}, rounding {}",
        settings.nominal_in_progress,
        settings.rounding.as_str()
    );
    Ok(settings)
}
