//! The page hosting the map: elements, window events, orientation.
//!
//! Every registration hands back a [`ListenerHandle`] that unregisters on
//! `remove()` or on drop.

use std::fmt;
use std::sync::Arc;

use amap_common::{Platform, Rect};

/// Callback for page and element events.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// A live registration with the host page.
pub struct ListenerHandle {
    remover: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerHandle {
    pub fn new(remover: impl FnOnce() + Send + 'static) -> Self {
        Self {
            remover: Some(Box::new(remover)),
        }
    }

    /// Unregister. Later calls do nothing.
    pub fn remove(&mut self) {
        if let Some(remover) = self.remover.take() {
            remover();
        }
    }

    pub fn is_active(&self) -> bool {
        self.remover.is_some()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.remove();
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

/// An element in the hosting page.
pub trait HostElement: Send + Sync {
    /// Current bounding rectangle in device-independent pixels.
    fn bounding_rect(&self) -> Rect;

    fn set_data_attribute(&self, name: &str, value: &str);

    fn data_attribute(&self, name: &str) -> Option<String>;

    /// Nearest element, this one included, matching `selector`.
    fn closest(&self, selector: &str) -> Option<Arc<dyn HostElement>>;

    fn add_event_listener(&self, event: &str, callback: Callback) -> ListenerHandle;

    /// Observe size changes. The callback carries no geometry; read
    /// [`HostElement::bounding_rect`] from inside it.
    fn observe_resize(&self, callback: Callback) -> ListenerHandle;
}

/// The page (window) the map elements live in.
pub trait HostPage: Send + Sync {
    fn platform(&self) -> Platform;

    fn device_pixel_ratio(&self) -> f64;

    /// Topmost element at the given viewport point.
    fn element_from_point(&self, x: f64, y: f64) -> Option<Arc<dyn HostElement>>;

    fn add_window_listener(&self, event: &str, callback: Callback) -> ListenerHandle;

    /// Listen to the screen-orientation API. `None` when the page lacks it.
    fn add_orientation_listener(&self, callback: Callback) -> Option<ListenerHandle>;

    /// Make every scroll container with this tag emit scroll events.
    fn enable_scroll_events(&self, tag: &str);
}
