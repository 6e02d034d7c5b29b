//! Page events the viewport tracker listens to.

use serde::{Deserialize, Serialize};

/// Window events that move the element relative to the native view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Window events that trigger an `onScroll` bounds update.
    pub scroll_events: Vec<String>,
    /// Tag of scroll containers that only emit scroll events when asked to.
    pub scroll_container_tag: String,
    /// Window event used when the screen-orientation API is unavailable.
    pub orientation_fallback_event: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            scroll_events: vec!["ionScroll".into(), "scroll".into(), "resize".into()],
            scroll_container_tag: "ion-content".into(),
            orientation_fallback_event: "orientationchange".into(),
        }
    }
}

/// Page container whose navigation events drive `onDisplay` on iOS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Selector matched against the element's ancestors.
    pub container_selector: String,
    /// Container events that each schedule an `onDisplay`.
    pub enter_events: Vec<String>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            container_selector: ".ion-page".into(),
            enter_events: vec!["ionViewWillEnter".into(), "ionViewDidEnter".into()],
        }
    }
}
