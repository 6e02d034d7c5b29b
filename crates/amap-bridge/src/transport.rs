//! The channel to the native plugin.
//!
//! Calls are addressed by method name with a JSON argument object, the same
//! way the webview IPC layer addresses messages by `kind`.

use async_trait::async_trait;
use serde_json::Value;

use amap_common::TransportError;

/// Method names understood by the native plugin.
pub mod methods {
    pub const CREATE: &str = "create";
    pub const DESTROY: &str = "destroy";
    pub const SHOW: &str = "show";
    pub const HIDE: &str = "hide";
    pub const ENABLE_TOUCH: &str = "enableTouch";
    pub const DISABLE_TOUCH: &str = "disableTouch";
    pub const ON_SCROLL: &str = "onScroll";
    pub const ON_RESIZE: &str = "onResize";
    pub const ON_DISPLAY: &str = "onDisplay";
    pub const DISPATCH_MAP_EVENT: &str = "dispatchMapEvent";
    pub const SET_MAP_TYPE: &str = "setMapType";
    pub const SET_TRAFFIC_ENABLED: &str = "setTrafficEnabled";
    pub const SHOW_INDOOR_MAP: &str = "showIndoorMap";
    pub const ENABLE_MY_LOCATION: &str = "enableMyLocation";
    pub const DISABLE_MY_LOCATION: &str = "disableMyLocation";
    pub const SET_MY_LOCATION_STYLE: &str = "setMyLocationStyle";
    pub const SET_UI_SETTINGS: &str = "setUiSettings";
    pub const CAMERA_UPDATE_POSITION: &str = "cameraUpdatePosition";
    pub const CAMERA_ZOOM_TO: &str = "cameraZoomTo";
    pub const SET_MAP_STATUS_LIMITS: &str = "setMapStatusLimits";
    pub const UPDATE_PRIVACY_SHOW: &str = "updatePrivacyShow";
    pub const UPDATE_PRIVACY_AGREE: &str = "updatePrivacyAgree";
    pub const SET_TERRAIN_ENABLE: &str = "setTerrainEnable";
    pub const OPEN_OFFLINE_MAP_ACTIVITY: &str = "openOfflineMapActivity";
    pub const GET_FROM_LOCATION: &str = "getFromLocation";
}

/// Outbound half of the plugin bridge.
#[async_trait]
pub trait NativeTransport: Send + Sync {
    /// Send a call and wait for the native reply.
    async fn call(&self, method: &str, args: Value) -> Result<Value, TransportError>;

    /// Send a notification whose reply nobody waits for.
    ///
    /// Used for bounds updates and focus answers, which fire from page
    /// callbacks that cannot suspend.
    fn post(&self, method: &str, args: Value);
}
