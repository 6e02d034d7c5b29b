//! Shared types for the AMap bridge: errors, wire values, and native events.

pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{BridgeError, ConfigError, TransportError};
pub use events::{EventBus, FocusProbe, MapEvent, MapEventKind, NativeEvent, FOCUS_PROBE_EVENT};
pub use id::{new_map_id, INTERNAL_ID_ATTRIBUTE};
pub use types::{
    CameraPosition, Color, GeocodeQuery, GeocodeResult, LatLng, LogoPosition, MapConfig,
    MapStatusLimits, MapType, MyLocationStyle, MyLocationType, Platform, Rect, UiSettings,
};

pub type Result<T> = std::result::Result<T, BridgeError>;
