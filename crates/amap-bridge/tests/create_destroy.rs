mod common;

use std::time::Duration;

use amap_bridge::{methods, CreateOptions};
use amap_common::{
    BridgeError, MapConfig, MapEvent, MapType, NativeEvent, Platform, Rect, TransportError,
    INTERNAL_ID_ATTRIBUTE,
};
use amap_bridge::HostElement;
use common::{visible, Harness};
use serde_json::json;

// =============================================================================
// CREATE
// =============================================================================

#[tokio::test(start_paused = true)]
async fn missing_element_is_rejected_before_any_native_call() {
    let h = Harness::new(Platform::Android);
    let options = CreateOptions {
        id: "m1".into(),
        config: MapConfig::default(),
        element: None,
        force_create: false,
    };

    let err = h.plugin.create(options, None).await.err().unwrap();
    assert!(matches!(err, BridgeError::Validation(_)));
    assert!(err.to_string().contains("container element is required"));
    assert!(h.transport.calls().is_empty());
    assert!(h.plugin.live_instances().is_empty());
}

#[tokio::test(start_paused = true)]
async fn blank_id_is_rejected() {
    let h = Harness::new(Platform::Ios);
    let element = h.element(visible());
    let err = h
        .plugin
        .create(CreateOptions::new("  ", element.clone()), None)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, BridgeError::Validation(_)));
    assert!(h.transport.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn create_tags_element_and_sends_measured_config() {
    let h = Harness::new(Platform::Ios);
    let element = h.element(Rect::new(10.0, 20.0, 300.0, 200.0));
    let config = MapConfig {
        map_type: Some(MapType::Satellite),
        zoom_controls_enabled: Some(false),
        ..Default::default()
    };

    let map = h
        .plugin
        .create(CreateOptions::new("m1", element.clone()).with_config(config), None)
        .await
        .unwrap();

    assert_eq!(map.id(), "m1");
    assert_eq!(
        element.data_attribute(INTERNAL_ID_ATTRIBUTE).as_deref(),
        Some("m1")
    );
    assert_eq!(
        h.transport.args_for(methods::CREATE),
        vec![json!({
            "id": "m1",
            "config": {
                "width": 300.0,
                "height": 200.0,
                "x": 10.0,
                "y": 20.0,
                "devicePixelRatio": 2.0,
                "mapType": 2,
                "zoomControlsEnabled": false
            },
            "forceCreate": false
        })]
    );
    assert_eq!(h.plugin.live_instances(), vec!["m1"]);
}

#[tokio::test(start_paused = true)]
async fn native_create_waits_for_settle_delay() {
    let h = Harness::new(Platform::Ios);
    let element = h.element(visible());
    let start = tokio::time::Instant::now();

    h.create("m1", &element).await;

    assert_eq!(start.elapsed(), Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn create_waits_for_layout_before_settle() {
    let h = Harness::new(Platform::Android);
    let element = h.element(Rect::default());
    element.script_rects([Rect::default(), Rect::default(), visible()]);
    let start = tokio::time::Instant::now();

    h.create("m1", &element).await;

    // two retries at 100 ms, then the 200 ms settle
    assert_eq!(start.elapsed(), Duration::from_millis(400));
    assert_eq!(h.transport.args_for(methods::CREATE)[0]["config"]["width"], json!(100.0));
}

#[tokio::test(start_paused = true)]
async fn unmeasurable_element_still_creates() {
    let h = Harness::new(Platform::Ios);
    let element = h.element(Rect::default());

    h.create("m1", &element).await;

    let config = &h.transport.args_for(methods::CREATE)[0]["config"];
    assert_eq!(config["width"], json!(0.0));
    assert_eq!(element.reads(), 30);
}

#[tokio::test(start_paused = true)]
async fn native_rejection_is_propagated_and_local_state_removed() {
    let h = Harness::new(Platform::Android);
    h.transport
        .fail(methods::CREATE, TransportError::rejected("AMap key invalid"));
    let element = h.element(visible());

    let err = h
        .plugin
        .create(CreateOptions::new("m1", element.clone()), None)
        .await
        .err()
        .unwrap();

    assert_eq!(err.native_message(), Some("AMap key invalid"));
    assert!(h.plugin.live_instances().is_empty());
    assert_eq!(h.page.window_listener_count(), 0);
    assert_eq!(h.page.orientation_listener_count(), 0);
    assert_eq!(element.observer_count(), 0);
    assert_eq!(h.transport.count(methods::CREATE), 1);
}

#[tokio::test(start_paused = true)]
async fn unavailable_transport_is_reported() {
    let h = Harness::new(Platform::Ios);
    h.transport.fail(
        methods::CREATE,
        TransportError::Unavailable("plugin not registered".into()),
    );
    let element = h.element(visible());

    let err = h
        .plugin
        .create(CreateOptions::new("m1", element.clone()), None)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, BridgeError::TransportUnavailable { .. }));
}

#[tokio::test(start_paused = true)]
async fn duplicate_id_needs_force_create() {
    let h = Harness::new(Platform::Ios);
    let first = h.element(visible());
    let second = h.element(visible());
    h.create("m1", &first).await;

    let err = h
        .plugin
        .create(CreateOptions::new("m1", second.clone()), None)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, BridgeError::Validation(_)));
    assert_eq!(h.transport.count(methods::CREATE), 1);
}

#[tokio::test(start_paused = true)]
async fn element_cannot_host_two_live_maps() {
    let h = Harness::new(Platform::Ios);
    let element = h.element(visible());
    h.create("m1", &element).await;

    let err = h
        .plugin
        .create(CreateOptions::new("m2", element.clone()), None)
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("already hosts map `m1`"));
}

#[tokio::test(start_paused = true)]
async fn element_is_reusable_after_destroy() {
    let h = Harness::new(Platform::Ios);
    let element = h.element(visible());
    let map = h.create("m1", &element).await;
    map.destroy().await.unwrap();

    let again = h.create("m2", &element).await;
    assert_eq!(again.id(), "m2");
    assert_eq!(
        element.data_attribute(INTERNAL_ID_ATTRIBUTE).as_deref(),
        Some("m2")
    );
}

#[tokio::test(start_paused = true)]
async fn force_create_replaces_live_instance() {
    let h = Harness::with_registry(Platform::Android);
    let element = h.element(visible());
    let old = h.create("m1", &element).await;

    let new = h
        .plugin
        .create(CreateOptions::new("m1", element.clone()).force_create(true), None)
        .await
        .unwrap();

    assert!(old.is_destroyed());
    assert!(!new.is_destroyed());
    assert_eq!(h.transport.native_log(), vec!["create m1", "destroy m1", "create m1"]);
    assert_eq!(h.transport.args_for(methods::CREATE)[1]["forceCreate"], json!(true));
    // only the new instance's registrations remain
    assert_eq!(h.page.window_listener_count(), 3);
    assert_eq!(element.observer_count(), 1);

    // the stale handle neither destroys nor subscribes for the new one
    old.destroy().await.unwrap();
    assert!(!old.set_on_map_click_listener(None));
    assert_eq!(h.plugin.live_instances(), vec!["m1"]);
    assert_eq!(h.transport.native_maps(), vec!["m1"]);
}

#[tokio::test(start_paused = true)]
async fn failed_force_create_keeps_previous_instance() {
    let h = Harness::with_registry(Platform::Ios);
    let element = h.element(visible());
    let old = h.create("m1", &element).await;
    old.set_on_map_click_listener(Some(amap_bridge::map_listener(|_: &MapEvent| {})));

    h.transport
        .fail(methods::CREATE, TransportError::rejected("AMap key invalid"));
    let err = h
        .plugin
        .create(CreateOptions::new("m1", element.clone()).force_create(true), None)
        .await
        .err()
        .unwrap();
    assert_eq!(err.native_message(), Some("AMap key invalid"));

    assert!(!old.is_destroyed());
    assert_eq!(h.plugin.live_instances(), vec!["m1"]);
    assert_eq!(element.observer_count(), 1);
    assert_eq!(old.listener_count(), 1);
    let click = NativeEvent::new("onMapClick", json!({"mapId": "m1"}));
    assert_eq!(h.plugin.handle_event(&click), 1);

    // tracking is live again
    element.resize_to(Rect::new(0.0, 0.0, 200.0, 50.0));
    assert_eq!(h.transport.count(methods::ON_RESIZE), 1);

    h.transport.clear_failure(methods::CREATE);
    old.destroy().await.unwrap();
    assert_eq!(h.transport.native_log(), vec!["create m1", "destroy m1"]);
    assert!(h.transport.native_maps().is_empty());
    assert_eq!(element.observer_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_force_create_on_other_element_leaves_it_untracked() {
    let h = Harness::with_registry(Platform::Android);
    let first = h.element(visible());
    let old = h.create("m1", &first).await;

    h.transport
        .fail(methods::CREATE, TransportError::rejected("AMap key invalid"));
    let second = h.element(visible());
    assert!(h
        .plugin
        .create(CreateOptions::new("m1", second.clone()).force_create(true), None)
        .await
        .is_err());

    assert_eq!(first.observer_count(), 1);
    assert_eq!(second.observer_count(), 0);
    assert_eq!(h.page.window_listener_count(), 3);
    assert_eq!(
        first.data_attribute(INTERNAL_ID_ATTRIBUTE).as_deref(),
        Some("m1")
    );
    assert!(!old.is_destroyed());
}

// =============================================================================
// DESTROY
// =============================================================================

#[tokio::test(start_paused = true)]
async fn destroy_leaves_nothing_registered() {
    let container = amap_bridge::testing::FakeElement::new("div");
    container.add_class("ion-page");
    let h = Harness::new(Platform::Android);
    let element = amap_bridge::testing::FakeElement::child_of("div", &container);
    element.set_rect(visible());
    let map = h.create("m1", &element).await;
    map.set_on_map_click_listener(Some(amap_bridge::map_listener(|_: &MapEvent| {})));

    map.destroy().await.unwrap();

    assert!(map.is_destroyed());
    assert_eq!(map.listener_count(), 0);
    assert_eq!(h.page.window_listener_count(), 0);
    assert_eq!(h.page.orientation_listener_count(), 0);
    assert_eq!(element.observer_count(), 0);
    assert_eq!(container.event_listener_count(), 0);
    assert!(h.plugin.live_instances().is_empty());
    assert_eq!(h.transport.args_for(methods::DESTROY), vec![json!({"id": "m1"})]);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_forwarded_after_destroy() {
    let h = Harness::new(Platform::Android);
    let element = h.element(visible());
    let map = h.create("m1", &element).await;
    let delivered = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let d = delivered.clone();
    map.set_on_map_click_listener(Some(amap_bridge::map_listener(move |_| {
        d.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    })));

    // a rotation queued before destroy fires after it
    h.page.rotate();
    map.destroy().await.unwrap();
    h.transport.clear();

    h.page.dispatch_window_event("scroll");
    h.page.dispatch_window_event("ionScroll");
    h.page.rotate();
    element.resize_to(Rect::new(0.0, 0.0, 400.0, 300.0));
    element.resize_to(Rect::default());
    element.resize_to(visible());
    let click = NativeEvent::new("onMapClick", json!({"mapId": "m1"}));
    assert_eq!(h.plugin.handle_event(&click), 0);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(h.transport.calls().is_empty());
    assert_eq!(delivered.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn double_destroy_is_a_local_noop() {
    let h = Harness::with_registry(Platform::Ios);
    let element = h.element(visible());
    let map = h.create("m1", &element).await;

    map.destroy().await.unwrap();
    map.destroy().await.unwrap();

    assert_eq!(h.transport.count(methods::DESTROY), 1);
    assert!(h.transport.native_maps().is_empty());
}

#[tokio::test(start_paused = true)]
async fn native_destroy_failure_still_cleans_up_locally() {
    let h = Harness::new(Platform::Android);
    let element = h.element(visible());
    let map = h.create("m1", &element).await;
    h.transport
        .fail(methods::DESTROY, TransportError::rejected("map not found"));

    let err = map.destroy().await.unwrap_err();
    assert_eq!(err.native_message(), Some("map not found"));
    assert!(map.is_destroyed());
    assert_eq!(h.page.window_listener_count(), 0);
    assert!(h.plugin.live_instances().is_empty());
    // and a retry does not reach the native side again
    map.destroy().await.unwrap();
    assert_eq!(h.transport.count(methods::DESTROY), 1);
}
