//! Site configuration loading for the CLI.
//!
//! Precedence: environment variables > site file > built-in defaults.

use std::path::Path;

use anyhow::{Context, Result};
use phris_core::EngineConfig;

/// Alert cooldown override, in seconds
pub const ENV_ALERT_COOLDOWN: &str = "PHRIS_ALERT_COOLDOWN_SECS";
/// Stale profile max age override, in seconds
pub const ENV_MAX_AGE: &str = "PHRIS_MAX_AGE_SECS";
/// Frame width override, in pixels
pub const ENV_FRAME_WIDTH: &str = "PHRIS_FRAME_WIDTH";

/// Load a TOML site file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read site file {}", path.display()))?;
    let config: EngineConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse site file {}", path.display()))?;
    Ok(config)
}

/// Load the site configuration, apply environment overrides and validate
pub fn load(path: Option<&Path>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => from_file(path)?,
        None => EngineConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate().context("Invalid site configuration")?;

    tracing::debug!(
        zones = config.zones.len(),
        cooldown_secs = config.alert.cooldown_secs,
        max_age_secs = config.lifecycle.max_age_secs,
        "Site configuration loaded"
    );

    Ok(config)
}

/// Apply overrides from a variable lookup (the process environment in production)
pub fn apply_overrides<F>(config: &mut EngineConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_ALERT_COOLDOWN) {
        config.alert.cooldown_secs = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", ENV_ALERT_COOLDOWN))?;
    }

    if let Some(value) = lookup(ENV_MAX_AGE) {
        config.lifecycle.max_age_secs = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", ENV_MAX_AGE))?;
    }

    if let Some(value) = lookup(ENV_FRAME_WIDTH) {
        config.scoring.frame_width = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", ENV_FRAME_WIDTH))?;
    }

    Ok(())
}
