//! Bridge settings schema.
//!
//! All structs use `serde(default)` so a partial file only overrides what it
//! names.

mod logging;
mod measure;
mod timing;
mod tracking;

pub use logging::*;
pub use measure::*;
pub use timing::*;
pub use tracking::*;

use serde::{Deserialize, Serialize};

/// Current settings schema version.
pub const SETTINGS_SCHEMA_VERSION: u32 = 1;

/// Root settings for the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BridgeSettings {
    pub timing: TimingConfig,
    pub measure: MeasureConfig,
    pub tracking: TrackingConfig,
    pub lifecycle: LifecycleConfig,
    pub logging: LoggingConfig,
}
