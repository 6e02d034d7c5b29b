//! Fixed settle delays.
//!
//! None of these waits is tied to an observable completion signal from the
//! native layer; they exist because the SDK offers no "ready" event for the
//! situations below.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait before the native create call so the webview can set up its
    /// sub-scroll views for the element (valid range: 0-5000).
    pub native_settle_ms: u64,
    /// Wait after an orientation change before re-measuring (0-5000).
    pub orientation_settle_ms: u64,
    /// Wait after a page-lifecycle enter event before `onDisplay` (0-5000).
    pub lifecycle_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            native_settle_ms: 200,
            orientation_settle_ms: 500,
            lifecycle_settle_ms: 100,
        }
    }
}

impl TimingConfig {
    pub fn native_settle(&self) -> Duration {
        Duration::from_millis(self.native_settle_ms)
    }

    pub fn orientation_settle(&self) -> Duration {
        Duration::from_millis(self.orientation_settle_ms)
    }

    pub fn lifecycle_settle(&self) -> Duration {
        Duration::from_millis(self.lifecycle_settle_ms)
    }
}
