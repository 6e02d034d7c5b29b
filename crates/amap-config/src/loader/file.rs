use std::path::Path;

use amap_common::ConfigError;
use tracing::{info, warn};

use super::template::default_settings_toml;
use crate::schema::BridgeSettings;
use crate::validation;

/// Parse and validate settings from TOML text.
///
/// Missing fields take their defaults. Unlike [`load_from_path`], invalid
/// values are an error here.
pub fn parse_settings(content: &str) -> Result<BridgeSettings, ConfigError> {
    let settings: BridgeSettings = toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;
    validation::validate(&settings)?;
    Ok(settings)
}

/// Load settings from a TOML file.
///
/// A file that parses but fails validation logs a warning and yields the
/// default settings.
pub fn load_from_path(path: &Path) -> Result<BridgeSettings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    match parse_settings(&content) {
        Ok(settings) => {
            info!("loaded bridge settings from {}", path.display());
            Ok(settings)
        }
        Err(ConfigError::ValidationError(e)) => {
            warn!("settings validation warning: {e}");
            warn!("falling back to default settings");
            Ok(BridgeSettings::default())
        }
        Err(e) => Err(e),
    }
}

/// Load settings from `path` if given and present, defaults otherwise.
pub fn load_or_default(path: Option<&Path>) -> Result<BridgeSettings, ConfigError> {
    match path {
        Some(p) if p.exists() => load_from_path(p),
        Some(p) => {
            info!("no settings at {}, using defaults", p.display());
            Ok(BridgeSettings::default())
        }
        None => Ok(BridgeSettings::default()),
    }
}

/// Write the documented default settings file to `path`.
pub fn create_default_settings(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create settings directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_settings_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default settings to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default settings at {}", path.display());
    Ok(())
}
