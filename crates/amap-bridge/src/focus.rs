//! Focus handshake for stacked maps.
//!
//! When a touch lands on a native map view, the native layer asks the page
//! whether that map's element is really what sits under the touch point, or
//! whether web content covers it. The answer goes back as
//! `dispatchMapEvent {id, focus}`.

use serde_json::json;
use tracing::{debug, warn};

use amap_common::{FocusProbe, NativeEvent, INTERNAL_ID_ATTRIBUTE};

use crate::host::HostPage;
use crate::transport::{methods, NativeTransport};

/// Whether the element at the probed point is tagged with the probed id.
pub fn is_map_in_focus(page: &dyn HostPage, probe: &FocusProbe<'_>) -> bool {
    page.element_from_point(probe.x, probe.y)
        .and_then(|element| element.data_attribute(INTERNAL_ID_ATTRIBUTE))
        .is_some_and(|id| id == probe.map_id)
}

/// Answer an `isMapInFocus` event. Returns the focus sent, or `None` for a
/// malformed probe.
pub fn answer_focus_probe(
    page: &dyn HostPage,
    transport: &dyn NativeTransport,
    event: &NativeEvent,
) -> Option<bool> {
    let Some(probe) = FocusProbe::from_event(event) else {
        warn!(data = %event.data, "malformed focus probe ignored");
        return None;
    };
    let focus = is_map_in_focus(page, &probe);
    debug!(map_id = probe.map_id, x = probe.x, y = probe.y, focus, "focus probe");
    transport.post(
        methods::DISPATCH_MAP_EVENT,
        json!({ "id": probe.map_id, "focus": focus }),
    );
    Some(focus)
}
