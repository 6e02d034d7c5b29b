//! Page-container lifecycle on iOS.
//!
//! When navigation brings a page back, WKWebView does not report a resize
//! for the map element, so the container's enter events are used instead.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use amap_config::LifecycleConfig;

use super::BoundsNotifier;
use crate::host::ListenerHandle;
use crate::transport::methods;

/// Returns no handles when the element is not inside a page container.
pub(super) fn install_page_lifecycle(
    notifier: &Arc<BoundsNotifier>,
    lifecycle: &LifecycleConfig,
    settle: Duration,
    runtime: &Handle,
) -> Vec<ListenerHandle> {
    let Some(container) = notifier.element().closest(&lifecycle.container_selector) else {
        return Vec::new();
    };
    debug!(
        selector = %lifecycle.container_selector,
        events = lifecycle.enter_events.len(),
        "map inside page container"
    );

    lifecycle
        .enter_events
        .iter()
        .map(|event| {
            let n = Arc::clone(notifier);
            let runtime = runtime.clone();
            container.add_event_listener(
                event,
                Arc::new(move || n.send_after(&runtime, settle, methods::ON_DISPLAY)),
            )
        })
        .collect()
}
