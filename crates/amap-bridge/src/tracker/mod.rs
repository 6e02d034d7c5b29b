//! Keeps the native map view aligned with its hosting element.
//!
//! Installed per instance on creation. Every page callback goes through a
//! shared liveness flag, so a callback that was already queued when the
//! instance was torn down runs as a no-op.

mod lifecycle;
mod resize;
mod scroll;

pub use resize::{ResizeTracker, ViewportChange};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::runtime::Handle;
use tracing::{debug, trace};

use amap_common::{Platform, Rect};
use amap_config::BridgeSettings;

use crate::host::{HostElement, HostPage, ListenerHandle};
use crate::transport::NativeTransport;

/// Sends the element's bounds to the native side for one instance.
pub(crate) struct BoundsNotifier {
    map_id: String,
    element: Arc<dyn HostElement>,
    transport: Arc<dyn NativeTransport>,
    alive: Arc<AtomicBool>,
}

impl BoundsNotifier {
    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub(crate) fn element(&self) -> &dyn HostElement {
        self.element.as_ref()
    }

    /// Re-measure and send.
    pub(crate) fn send(&self, method: &'static str) {
        if !self.is_alive() {
            trace!(map_id = %self.map_id, method, "instance torn down, bounds update dropped");
            return;
        }
        let rect = self.element.bounding_rect();
        self.send_rect(method, rect);
    }

    pub(crate) fn send_rect(&self, method: &'static str, rect: Rect) {
        if !self.is_alive() {
            trace!(map_id = %self.map_id, method, "instance torn down, bounds update dropped");
            return;
        }
        debug!(
            map_id = %self.map_id,
            method,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "bounds update"
        );
        self.transport
            .post(method, json!({ "id": self.map_id, "mapBounds": rect }));
    }

    /// Send after `delay`, checking liveness when the timer fires.
    pub(crate) fn send_after(
        self: &Arc<Self>,
        runtime: &Handle,
        delay: Duration,
        method: &'static str,
    ) {
        let notifier = Arc::clone(self);
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.send(method);
        });
    }
}

/// Everything [`ViewportTracker::install`] needs.
pub struct TrackerContext<'a> {
    pub map_id: &'a str,
    pub element: Arc<dyn HostElement>,
    pub page: &'a dyn HostPage,
    pub transport: Arc<dyn NativeTransport>,
    pub settings: &'a BridgeSettings,
    /// Bounds measured at creation; seeds the resize state.
    pub initial: Rect,
    /// Runtime the delayed bounds updates are spawned on.
    pub runtime: Handle,
}

/// Page registrations owned by one map instance.
pub struct ViewportTracker {
    map_id: String,
    alive: Arc<AtomicBool>,
    torn_down: bool,
    handles: Vec<ListenerHandle>,
}

impl ViewportTracker {
    /// Register the listeners and observers the platform calls for.
    ///
    /// - Android: window scroll events and orientation changes send `onScroll`.
    /// - iOS inside a page container: the container's enter events send
    ///   `onDisplay` after a short settle.
    /// - Any native platform: a resize observer sends `onDisplay` and
    ///   `onResize`.
    ///
    /// On the web nothing is installed.
    pub fn install(ctx: TrackerContext<'_>) -> Self {
        let alive = Arc::new(AtomicBool::new(true));
        let notifier = Arc::new(BoundsNotifier {
            map_id: ctx.map_id.to_string(),
            element: Arc::clone(&ctx.element),
            transport: Arc::clone(&ctx.transport),
            alive: Arc::clone(&alive),
        });
        let settings = ctx.settings;
        let platform = ctx.page.platform();
        let mut handles = Vec::new();

        if platform == Platform::Android {
            handles.extend(scroll::install_scroll_tracking(
                ctx.page,
                &notifier,
                &settings.tracking,
                settings.timing.orientation_settle(),
                &ctx.runtime,
            ));
        }

        if platform.is_native() {
            let lifecycle = if platform == Platform::Ios {
                lifecycle::install_page_lifecycle(
                    &notifier,
                    &settings.lifecycle,
                    settings.timing.lifecycle_settle(),
                    &ctx.runtime,
                )
            } else {
                Vec::new()
            };
            let display_suppressed = !lifecycle.is_empty();
            handles.extend(lifecycle);
            handles.push(resize::install_resize_observer(
                &notifier,
                ResizeTracker::new(ctx.initial, display_suppressed),
            ));
        }

        debug!(
            map_id = ctx.map_id,
            %platform,
            registrations = handles.len(),
            "viewport tracking installed"
        );

        Self {
            map_id: ctx.map_id.to_string(),
            alive,
            torn_down: false,
            handles,
        }
    }

    /// Stop forwarding and drop every registration. Safe to call twice.
    pub fn teardown(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
        if !std::mem::replace(&mut self.torn_down, true) {
            debug!(
                map_id = %self.map_id,
                registrations = self.handles.len(),
                "viewport tracking removed"
            );
        }
        for mut handle in self.handles.drain(..) {
            handle.remove();
        }
    }

    /// Keep the registrations but make every callback a no-op until
    /// [`ViewportTracker::resume`].
    pub fn suspend(&mut self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            debug!(map_id = %self.map_id, "viewport tracking suspended");
        }
    }

    /// Forward again after [`ViewportTracker::suspend`]. A torn-down tracker
    /// stays down.
    pub fn resume(&mut self) {
        if !self.torn_down && !self.alive.swap(true, Ordering::SeqCst) {
            debug!(map_id = %self.map_id, "viewport tracking resumed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Page registrations currently held.
    pub fn registration_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_active()).count()
    }
}

impl Drop for ViewportTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}
