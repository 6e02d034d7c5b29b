#![allow(dead_code)]

use std::sync::Arc;

use amap_bridge::testing::{FakeElement, FakePage, RecordingTransport};
use amap_bridge::{AMap, AMapPlugin, CreateOptions};
use amap_common::{Platform, Rect};
use amap_config::BridgeSettings;

pub struct Harness {
    pub page: Arc<FakePage>,
    pub transport: Arc<RecordingTransport>,
    pub plugin: AMapPlugin,
}

impl Harness {
    pub fn new(platform: Platform) -> Self {
        Self::build(FakePage::new(platform), RecordingTransport::new())
    }

    /// Transport that keeps native ids like the real plugin.
    pub fn with_registry(platform: Platform) -> Self {
        Self::build(FakePage::new(platform), RecordingTransport::with_native_registry())
    }

    pub fn with_page(page: Arc<FakePage>) -> Self {
        Self::build(page, RecordingTransport::new())
    }

    fn build(page: Arc<FakePage>, transport: RecordingTransport) -> Self {
        let transport = Arc::new(transport);
        let plugin = AMapPlugin::new(transport.clone(), page.clone(), BridgeSettings::default());
        Self {
            page,
            transport,
            plugin,
        }
    }

    /// A laid-out element on top of the page.
    pub fn element(&self, rect: Rect) -> Arc<FakeElement> {
        let element = FakeElement::new("div");
        element.set_rect(rect);
        self.page.stack_element(&element);
        element
    }

    pub async fn create(&self, id: &str, element: &Arc<FakeElement>) -> AMap {
        self.plugin
            .create(CreateOptions::new(id, element.clone()), None)
            .await
            .expect("create should succeed")
    }
}

pub fn visible() -> Rect {
    Rect::new(0.0, 0.0, 100.0, 50.0)
}
