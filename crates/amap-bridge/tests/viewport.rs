mod common;

use std::time::Duration;

use amap_bridge::methods;
use amap_bridge::testing::{FakeElement, FakePage};
use amap_common::{Platform, Rect};
use common::{visible, Harness};
use serde_json::json;

fn bounds(rect: Rect) -> serde_json::Value {
    json!({"x": rect.x, "y": rect.y, "width": rect.width, "height": rect.height})
}

// =============================================================================
// RESIZE OBSERVER
// =============================================================================

#[tokio::test(start_paused = true)]
async fn hidden_to_visible_sends_display_only() {
    let h = Harness::new(Platform::Android);
    let element = h.element(Rect::default());
    h.create("m1", &element).await;
    h.transport.clear();

    element.resize_to(visible());

    assert_eq!(
        h.transport.args_for(methods::ON_DISPLAY),
        vec![json!({"id": "m1", "mapBounds": bounds(visible())})]
    );
    assert_eq!(h.transport.count(methods::ON_RESIZE), 0);
}

#[tokio::test(start_paused = true)]
async fn size_change_sends_resize_only() {
    let h = Harness::new(Platform::Ios);
    let element = h.element(visible());
    h.create("m1", &element).await;
    h.transport.clear();

    element.resize_to(Rect::new(0.0, 0.0, 150.0, 50.0));

    assert_eq!(
        h.transport.args_for(methods::ON_RESIZE),
        vec![json!({"id": "m1", "mapBounds": bounds(Rect::new(0.0, 0.0, 150.0, 50.0))})]
    );
    assert_eq!(h.transport.count(methods::ON_DISPLAY), 0);
}

#[tokio::test(start_paused = true)]
async fn unchanged_size_sends_nothing() {
    let h = Harness::new(Platform::Ios);
    let element = h.element(visible());
    h.create("m1", &element).await;
    h.transport.clear();

    element.resize_to(visible());
    element.resize_to(Rect::new(20.0, 20.0, 100.0, 50.0));

    assert!(h.transport.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn hiding_then_showing_sends_one_display() {
    let h = Harness::new(Platform::Android);
    let element = h.element(visible());
    h.create("m1", &element).await;
    h.transport.clear();

    element.resize_to(Rect::default());
    assert!(h.transport.calls().is_empty());
    element.resize_to(Rect::new(0.0, 0.0, 200.0, 100.0));

    assert_eq!(h.transport.methods(), vec![methods::ON_DISPLAY]);
}

#[tokio::test(start_paused = true)]
async fn web_platform_forwards_nothing() {
    let h = Harness::new(Platform::Web);
    let element = h.element(visible());
    h.create("m1", &element).await;
    h.transport.clear();

    element.resize_to(Rect::new(0.0, 0.0, 150.0, 50.0));
    h.page.dispatch_window_event("scroll");

    assert!(h.transport.calls().is_empty());
}

// =============================================================================
// SCROLL (ANDROID)
// =============================================================================

#[tokio::test(start_paused = true)]
async fn android_scroll_sends_current_bounds() {
    let h = Harness::new(Platform::Android);
    let element = h.element(visible());
    h.create("m1", &element).await;
    h.transport.clear();

    element.set_rect(Rect::new(0.0, -120.0, 100.0, 50.0));
    h.page.dispatch_window_event("ionScroll");
    element.set_rect(Rect::new(0.0, -160.0, 100.0, 50.0));
    h.page.dispatch_window_event("scroll");
    h.page.dispatch_window_event("resize");

    let sent = h.transport.args_for(methods::ON_SCROLL);
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0]["mapBounds"]["y"], json!(-120.0));
    assert_eq!(sent[1]["mapBounds"]["y"], json!(-160.0));
    assert_eq!(h.page.scroll_enabled_tags(), vec!["ion-content"]);
}

#[tokio::test(start_paused = true)]
async fn ios_does_not_track_scroll() {
    let h = Harness::new(Platform::Ios);
    let element = h.element(visible());
    h.create("m1", &element).await;

    assert_eq!(h.page.window_listener_count(), 0);
    assert!(h.page.scroll_enabled_tags().is_empty());
}

#[tokio::test(start_paused = true)]
async fn rotation_is_forwarded_after_settle() {
    let h = Harness::new(Platform::Android);
    let element = h.element(visible());
    h.create("m1", &element).await;
    h.transport.clear();

    h.page.rotate();
    element.set_rect(Rect::new(0.0, 0.0, 50.0, 100.0));
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(h.transport.count(methods::ON_SCROLL), 0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let sent = h.transport.args_for(methods::ON_SCROLL);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["mapBounds"]["width"], json!(50.0));
}

#[tokio::test(start_paused = true)]
async fn rotation_without_orientation_api_uses_legacy_event() {
    let h = Harness::with_page(FakePage::without_orientation_api(Platform::Android));
    let element = h.element(visible());
    h.create("m1", &element).await;
    h.transport.clear();

    assert_eq!(h.page.listeners_for("orientationchange"), 1);
    h.page.rotate();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(h.transport.count(methods::ON_SCROLL), 1);
}

// =============================================================================
// PAGE LIFECYCLE (IOS)
// =============================================================================

fn ios_page_setup(h: &Harness) -> (std::sync::Arc<FakeElement>, std::sync::Arc<FakeElement>) {
    let container = FakeElement::new("div");
    container.add_class("ion-page");
    let element = FakeElement::child_of("div", &container);
    element.set_rect(visible());
    h.page.stack_element(&element);
    (container, element)
}

#[tokio::test(start_paused = true)]
async fn enter_events_send_display_after_settle() {
    let h = Harness::new(Platform::Ios);
    let (container, element) = ios_page_setup(&h);
    h.create("m1", &element).await;
    h.transport.clear();

    container.dispatch("ionViewWillEnter");
    container.dispatch("ionViewDidEnter");
    tokio::time::sleep(Duration::from_millis(99)).await;
    assert_eq!(h.transport.count(methods::ON_DISPLAY), 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(
        h.transport.args_for(methods::ON_DISPLAY),
        vec![
            json!({"id": "m1", "mapBounds": bounds(visible())}),
            json!({"id": "m1", "mapBounds": bounds(visible())}),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn page_container_takes_over_display_on_ios() {
    let h = Harness::new(Platform::Ios);
    let (_container, element) = ios_page_setup(&h);
    h.create("m1", &element).await;
    h.transport.clear();

    element.resize_to(Rect::default());
    element.resize_to(visible());
    assert_eq!(h.transport.count(methods::ON_DISPLAY), 0);

    element.resize_to(Rect::new(0.0, 0.0, 300.0, 50.0));
    assert_eq!(h.transport.count(methods::ON_RESIZE), 1);
}

#[tokio::test(start_paused = true)]
async fn page_container_is_ignored_on_android() {
    let h = Harness::new(Platform::Android);
    let (container, element) = ios_page_setup(&h);
    h.create("m1", &element).await;
    h.transport.clear();

    assert_eq!(container.event_listener_count(), 0);
    element.resize_to(Rect::default());
    element.resize_to(visible());
    assert_eq!(h.transport.count(methods::ON_DISPLAY), 1);
}

#[tokio::test(start_paused = true)]
async fn pending_display_dropped_when_destroyed() {
    let h = Harness::new(Platform::Ios);
    let (container, element) = ios_page_setup(&h);
    let map = h.create("m1", &element).await;

    container.dispatch("ionViewDidEnter");
    map.destroy().await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(h.transport.count(methods::ON_DISPLAY), 0);
}
