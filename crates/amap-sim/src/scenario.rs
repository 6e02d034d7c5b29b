//! The scripted session.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use amap_bridge::testing::{FakeElement, FakePage, RecordedCall, RecordingTransport};
use amap_bridge::{map_listener, on_ready, AMapPlugin, CreateOptions};
use amap_common::{
    new_map_id, CameraPosition, EventBus, LatLng, MapConfig, MapType, NativeEvent, Platform, Rect,
    Result, FOCUS_PROBE_EVENT,
};
use amap_config::BridgeSettings;

/// What the session observed.
#[derive(Debug)]
pub struct Report {
    pub map_id: String,
    pub calls: Vec<RecordedCall>,
    pub native_log: Vec<String>,
    pub ready_fired: bool,
    pub clicks: usize,
}

/// Time for a published event to reach the plugin's listener task.
const DELIVERY: Duration = Duration::from_millis(10);

pub async fn run(
    platform: Platform,
    in_page_container: bool,
    settings: BridgeSettings,
) -> Result<Report> {
    let page = FakePage::new(platform);
    let transport = Arc::new(RecordingTransport::with_native_registry());
    let plugin = AMapPlugin::new(transport.clone(), page.clone(), settings.clone());
    let bus = EventBus::new(64);
    let listener = plugin.listen(&bus);

    plugin.update_privacy_show(true, true).await?;
    plugin.update_privacy_agree(true).await?;

    // The element is laid out a few frames after the map is requested.
    let element = if in_page_container {
        let container = FakeElement::new("div");
        container.add_class(settings.lifecycle.container_selector.trim_start_matches('.'));
        FakeElement::child_of("div", &container)
    } else {
        FakeElement::new("div")
    };
    let laid_out = Rect::new(0.0, 64.0, 360.0, 240.0);
    element.script_rects([Rect::default(), Rect::default(), laid_out]);
    page.stack_element(&element);

    let map_id = new_map_id();
    let ready = Arc::new(AtomicUsize::new(0));
    let r = Arc::clone(&ready);
    let config = MapConfig {
        map_type: Some(MapType::Normal),
        camera_position: Some(CameraPosition::looking_at(LatLng::new(39.909, 116.397), 12.0)),
        ..Default::default()
    };
    let map = plugin
        .create(
            CreateOptions::new(map_id.clone(), element.clone()).with_config(config),
            Some(on_ready(move |event| {
                info!(map_id = %event.map_id, "map ready");
                r.fetch_add(1, Ordering::SeqCst);
            })),
        )
        .await?;

    let clicks = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&clicks);
    map.set_on_map_click_listener(Some(map_listener(move |event| {
        info!(data = %event.data, "map clicked");
        c.fetch_add(1, Ordering::SeqCst);
    })));

    bus.publish(NativeEvent::new("onMapReady", json!({ "mapId": map_id })));
    bus.publish(NativeEvent::new(
        "onMapClick",
        json!({ "mapId": map_id, "latitude": 39.91, "longitude": 116.40 }),
    ));
    bus.publish(NativeEvent::new("onMapClick", json!({ "mapId": "someone-else" })));
    bus.publish(NativeEvent::new(
        FOCUS_PROBE_EVENT,
        json!({ "mapId": map_id, "x": 100, "y": 100 }),
    ));
    tokio::time::sleep(DELIVERY).await;

    // Page activity while the map is up.
    element.set_rect(Rect::new(0.0, 20.0, 360.0, 240.0));
    page.dispatch_window_event("scroll");
    element.resize_to(Rect::new(0.0, 20.0, 360.0, 320.0));
    page.rotate();
    tokio::time::sleep(settings.timing.orientation_settle() + DELIVERY).await;

    map.set_map_type(MapType::Satellite).await?;
    map.camera_zoom_to(15.0).await?;

    map.destroy().await?;
    page.dispatch_window_event("scroll");

    drop(bus);
    if let Err(e) = listener.await {
        warn!("event listener task failed: {e}");
    }

    Ok(Report {
        map_id,
        calls: transport.calls(),
        native_log: transport.native_log(),
        ready_fired: ready.load(Ordering::SeqCst) > 0,
        clicks: clicks.load(Ordering::SeqCst),
    })
}
