//! Scroll tracking.
//!
//! The native map view on Android sits in a fixed position behind the
//! webview, so it has to follow the element whenever the page scrolls,
//! resizes or rotates.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use amap_config::TrackingConfig;

use super::BoundsNotifier;
use crate::host::{Callback, HostPage, ListenerHandle};
use crate::transport::methods;

pub(super) fn install_scroll_tracking(
    page: &dyn HostPage,
    notifier: &Arc<BoundsNotifier>,
    tracking: &TrackingConfig,
    orientation_settle: Duration,
    runtime: &Handle,
) -> Vec<ListenerHandle> {
    page.enable_scroll_events(&tracking.scroll_container_tag);

    let mut handles: Vec<ListenerHandle> = tracking
        .scroll_events
        .iter()
        .map(|event| {
            let n = Arc::clone(notifier);
            page.add_window_listener(event, Arc::new(move || n.send(methods::ON_SCROLL)))
        })
        .collect();

    let on_rotate: Callback = {
        let n = Arc::clone(notifier);
        let runtime = runtime.clone();
        Arc::new(move || n.send_after(&runtime, orientation_settle, methods::ON_SCROLL))
    };
    let orientation = match page.add_orientation_listener(Arc::clone(&on_rotate)) {
        Some(handle) => handle,
        None => page.add_window_listener(&tracking.orientation_fallback_event, on_rotate),
    };
    handles.push(orientation);

    handles
}
