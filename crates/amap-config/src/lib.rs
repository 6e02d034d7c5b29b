//! Settings for the AMap bridge.
//!
//! TOML-based, with a default for every field so a partial file works. The
//! bridge itself only needs a [`BridgeSettings`] value; loading from disk is
//! optional.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    create_default_settings, default_settings_toml, load_from_path, load_or_default,
    parse_settings,
};
pub use schema::{
    BridgeSettings, LifecycleConfig, LogLevel, LoggingConfig, MeasureConfig, TimingConfig,
    TrackingConfig, SETTINGS_SCHEMA_VERSION,
};

/// Serialize settings to pretty-printed JSON.
pub fn settings_to_json(settings: &BridgeSettings) -> String {
    serde_json::to_string_pretty(settings)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize settings: {e}\"}}"))
}
