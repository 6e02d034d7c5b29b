//! Handle to one native map instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use amap_common::{
    CameraPosition, MapEventKind, MapStatusLimits, MapType, MyLocationStyle, Result, UiSettings,
};

use crate::host::HostElement;
use crate::plugin::PluginShared;
use crate::router::MapListener;
use crate::transport::methods;

/// A created map. Every operation is forwarded to the native side by name
/// with this instance's id.
///
/// Dropping the handle does not destroy the map; call [`AMap::destroy`].
pub struct AMap {
    id: String,
    element: Arc<dyn HostElement>,
    shared: Arc<PluginShared>,
    generation: u64,
    destroyed: AtomicBool,
}

impl AMap {
    pub(crate) fn new(
        id: String,
        element: Arc<dyn HostElement>,
        shared: Arc<PluginShared>,
        generation: u64,
    ) -> Self {
        Self {
            id,
            element,
            shared,
            generation,
            destroyed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn element(&self) -> &Arc<dyn HostElement> {
        &self.element
    }

    /// Destroyed through this handle, or replaced by a forced re-create.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst) || !self.shared.is_current(&self.id, self.generation)
    }

    /// Stop tracking and routing, then ask the native side to destroy the
    /// map.
    ///
    /// Local cleanup happens before the native call, so no bounds update or
    /// event reaches this instance afterwards even if the call fails.
    /// Calling it again is a local no-op.
    pub async fn destroy(&self) -> Result<()> {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            debug!(map_id = %self.id, "already destroyed");
            return Ok(());
        }
        if !self.shared.release(&self.id, self.generation) {
            debug!(map_id = %self.id, "instance was replaced, native destroy skipped");
            return Ok(());
        }
        self.call(methods::DESTROY, json!({ "id": self.id })).await?;
        info!(map_id = %self.id, "map destroyed");
        Ok(())
    }

    async fn call(&self, method: &str, args: Value) -> Result<()> {
        self.shared.invoke(method, args).await.map(drop)
    }

    async fn call_with_id(&self, method: &str) -> Result<()> {
        self.call(method, json!({ "id": self.id })).await
    }

    /// Serialize `fields` and add this instance's id to the object.
    fn flattened_args<T: Serialize>(&self, fields: &T) -> Result<Value> {
        let mut args = serde_json::to_value(fields)?;
        if let Value::Object(map) = &mut args {
            map.insert("id".to_string(), Value::String(self.id.clone()));
        }
        Ok(args)
    }

    pub async fn show(&self) -> Result<()> {
        self.call_with_id(methods::SHOW).await
    }

    pub async fn hide(&self) -> Result<()> {
        self.call_with_id(methods::HIDE).await
    }

    pub async fn enable_touch(&self) -> Result<()> {
        self.call_with_id(methods::ENABLE_TOUCH).await
    }

    pub async fn disable_touch(&self) -> Result<()> {
        self.call_with_id(methods::DISABLE_TOUCH).await
    }

    /// Show the location dot.
    pub async fn enable_my_location(&self) -> Result<()> {
        self.call_with_id(methods::ENABLE_MY_LOCATION).await
    }

    pub async fn disable_my_location(&self) -> Result<()> {
        self.call_with_id(methods::DISABLE_MY_LOCATION).await
    }

    pub async fn set_my_location_style(&self, style: &MyLocationStyle) -> Result<()> {
        let args = json!({ "id": self.id, "style": serde_json::to_value(style)? });
        self.call(methods::SET_MY_LOCATION_STYLE, args).await
    }

    pub async fn set_ui_settings(&self, settings: &UiSettings) -> Result<()> {
        let args = self.flattened_args(settings)?;
        self.call(methods::SET_UI_SETTINGS, args).await
    }

    pub async fn camera_update_position(&self, camera: &CameraPosition) -> Result<()> {
        let args = json!({ "id": self.id, "cameraOptions": serde_json::to_value(camera)? });
        self.call(methods::CAMERA_UPDATE_POSITION, args).await
    }

    /// Zoom range is enforced natively (3-19).
    pub async fn camera_zoom_to(&self, zoom: f64) -> Result<()> {
        self.call(methods::CAMERA_ZOOM_TO, json!({ "id": self.id, "zoom": zoom }))
            .await
    }

    pub async fn set_map_status_limits(&self, limits: &MapStatusLimits) -> Result<()> {
        let args = self.flattened_args(limits)?;
        self.call(methods::SET_MAP_STATUS_LIMITS, args).await
    }

    pub async fn show_indoor_map(&self, enable: bool) -> Result<()> {
        self.call(methods::SHOW_INDOOR_MAP, json!({ "id": self.id, "enable": enable }))
            .await
    }

    pub async fn set_map_type(&self, map_type: MapType) -> Result<()> {
        self.call(
            methods::SET_MAP_TYPE,
            json!({ "id": self.id, "type": u8::from(map_type) }),
        )
        .await
    }

    pub async fn set_traffic_enabled(&self, enable: bool) -> Result<()> {
        self.call(
            methods::SET_TRAFFIC_ENABLED,
            json!({ "id": self.id, "enable": enable }),
        )
        .await
    }

    /// Set or clear the listener for one event kind, replacing any previous
    /// one. Returns `false` once the instance is destroyed or replaced.
    pub fn set_listener(&self, kind: MapEventKind, listener: Option<MapListener>) -> bool {
        if self.is_destroyed() {
            debug!(map_id = %self.id, %kind, "listener ignored on destroyed map");
            return false;
        }
        self.shared.router.set_listener(&self.id, kind, listener)
    }

    /// Active listeners, the pending ready callback included.
    pub fn listener_count(&self) -> usize {
        if self.is_destroyed() {
            return 0;
        }
        self.shared.router.listener_count(&self.id)
    }
}

macro_rules! listener_setters {
    ($($name:ident => $kind:ident),+ $(,)?) => {
        impl AMap {
            $(
                #[doc = concat!(
                    "Shorthand for [`AMap::set_listener`] with [`MapEventKind::",
                    stringify!($kind),
                    "`]."
                )]
                pub fn $name(&self, listener: Option<MapListener>) -> bool {
                    self.set_listener(MapEventKind::$kind, listener)
                }
            )+
        }
    };
}

listener_setters! {
    set_on_camera_change_listener => CameraChange,
    set_on_camera_change_finish_listener => CameraChangeFinish,
    set_on_indoor_building_active_listener => IndoorBuildingActive,
    set_on_info_window_click_listener => InfoWindowClick,
    set_on_map_click_listener => MapClick,
    set_on_map_ready_listener => MapReady,
    set_on_map_long_click_listener => MapLongClick,
    set_on_map_touch_listener => MapTouch,
    set_on_marker_click_listener => MarkerClick,
    set_on_marker_drag_start_listener => MarkerDragStart,
    set_on_marker_drag_listener => MarkerDrag,
    set_on_marker_drag_end_listener => MarkerDragEnd,
    set_on_multi_point_click_listener => MultiPointClick,
    set_on_my_location_change_listener => MyLocationChange,
    set_on_poi_click_listener => PoiClick,
    set_on_polyline_click_listener => PolylineClick,
}
