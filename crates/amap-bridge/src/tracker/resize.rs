use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use amap_common::Rect;

use super::BoundsNotifier;
use crate::host::ListenerHandle;
use crate::transport::methods;

/// What a resize observation means for the native view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportChange {
    /// The element went from hidden to visible.
    Display,
    /// The element stayed visible and changed width or height.
    Resize,
}

/// Visibility and size state between resize callbacks.
///
/// Hidden means width and height are both exactly zero.
#[derive(Debug, Clone)]
pub struct ResizeTracker {
    width: f64,
    height: f64,
    hidden: bool,
    display_suppressed: bool,
}

impl ResizeTracker {
    /// `display_suppressed` hands hidden-to-visible transitions to another
    /// source (the page lifecycle) so they are not reported twice.
    pub fn new(initial: Rect, display_suppressed: bool) -> Self {
        Self {
            width: initial.width,
            height: initial.height,
            hidden: initial.is_hidden(),
            display_suppressed,
        }
    }

    pub fn observe(&mut self, rect: Rect) -> Option<ViewportChange> {
        let hidden = rect.is_hidden();
        let change = if hidden {
            None
        } else if self.hidden {
            (!self.display_suppressed).then_some(ViewportChange::Display)
        } else if self.width != rect.width || self.height != rect.height {
            Some(ViewportChange::Resize)
        } else {
            None
        };

        self.width = rect.width;
        self.height = rect.height;
        self.hidden = hidden;
        change
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

pub(super) fn install_resize_observer(
    notifier: &Arc<BoundsNotifier>,
    tracker: ResizeTracker,
) -> ListenerHandle {
    let state = Mutex::new(tracker);
    let n = Arc::clone(notifier);
    notifier.element().observe_resize(Arc::new(move || {
        if !n.is_alive() {
            return;
        }
        let rect = n.element().bounding_rect();
        let change = state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observe(rect);
        match change {
            Some(ViewportChange::Display) => n.send_rect(methods::ON_DISPLAY, rect),
            Some(ViewportChange::Resize) => n.send_rect(methods::ON_RESIZE, rect),
            None => trace!(width = rect.width, height = rect.height, "resize ignored"),
        }
    }))
}
