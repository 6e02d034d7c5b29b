//! Inbound native events and the broadcast bus that carries them.
//!
//! Every map event names its originating instance in `data.mapId`. The bus
//! is shared by all live map instances; routing by id happens downstream.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Global event the native layer sends to ask which stacked map owns a point.
pub const FOCUS_PROBE_EVENT: &str = "isMapInFocus";

/// A raw event as delivered by the plugin transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeEvent {
    pub name: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl NativeEvent {
    pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// The `mapId` carried in the payload, if any.
    pub fn map_id(&self) -> Option<&str> {
        self.data.get("mapId").and_then(|v| v.as_str())
    }

    /// The subscribable kind this event belongs to, if it is one.
    pub fn kind(&self) -> Option<MapEventKind> {
        MapEventKind::from_event_name(&self.name)
    }
}

/// Payload of the focus probe: "is the map `map_id` the one at (x, y)?"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusProbe<'a> {
    #[serde(rename = "mapId")]
    pub map_id: &'a str,
    pub x: f64,
    pub y: f64,
}

impl<'a> FocusProbe<'a> {
    pub fn from_event(event: &'a NativeEvent) -> Option<Self> {
        FocusProbe::deserialize(&event.data).ok()
    }
}

/// Event kinds a map instance can subscribe to. At most one listener per
/// kind is active per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapEventKind {
    CameraChange,
    CameraChangeFinish,
    IndoorBuildingActive,
    InfoWindowClick,
    MapClick,
    MapReady,
    MapLongClick,
    MapTouch,
    MarkerClick,
    MarkerDragStart,
    MarkerDrag,
    MarkerDragEnd,
    MultiPointClick,
    MyLocationChange,
    PoiClick,
    PolylineClick,
}

impl MapEventKind {
    pub const ALL: [MapEventKind; 16] = [
        Self::CameraChange,
        Self::CameraChangeFinish,
        Self::IndoorBuildingActive,
        Self::InfoWindowClick,
        Self::MapClick,
        Self::MapReady,
        Self::MapLongClick,
        Self::MapTouch,
        Self::MarkerClick,
        Self::MarkerDragStart,
        Self::MarkerDrag,
        Self::MarkerDragEnd,
        Self::MultiPointClick,
        Self::MyLocationChange,
        Self::PoiClick,
        Self::PolylineClick,
    ];

    /// Wire name of the event as emitted by the native layer.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::CameraChange => "onCameraChange",
            Self::CameraChangeFinish => "onCameraChangeFinish",
            Self::IndoorBuildingActive => "onIndoorBuildingActive",
            Self::InfoWindowClick => "onInfoWindowClick",
            Self::MapClick => "onMapClick",
            Self::MapReady => "onMapReady",
            Self::MapLongClick => "onMapLongClick",
            Self::MapTouch => "onMapTouch",
            Self::MarkerClick => "onMarkerClick",
            Self::MarkerDragStart => "onMarkerDragStart",
            Self::MarkerDrag => "onMarkerDrag",
            Self::MarkerDragEnd => "onMarkerDragEnd",
            Self::MultiPointClick => "onMultiPointClick",
            Self::MyLocationChange => "onMyLocationChange",
            Self::PoiClick => "onPOIClick",
            Self::PolylineClick => "onPolylineClick",
        }
    }

    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.event_name() == name)
    }
}

impl fmt::Display for MapEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// An event that passed instance routing, as handed to a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEvent {
    pub kind: MapEventKind,
    pub map_id: String,
    pub data: serde_json::Value,
}

/// Fan-out channel for inbound native events.
///
/// The transport publishes; each plugin subscribes once and routes by id.
pub struct EventBus {
    sender: broadcast::Sender<NativeEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NativeEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: NativeEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}
