use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling budget for measuring an element that has not been laid out yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Delay between reads (valid range: 1-5000).
    pub interval_ms: u64,
    /// Total reads, the first one included (valid range: 1-600).
    pub max_attempts: u32,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            max_attempts: 30,
        }
    }
}

impl MeasureConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
