use serde::{Deserialize, Serialize};

/// Screen rectangle in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// An element collapsed to nothing, as reported for `display: none`.
    pub fn is_hidden(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Whether layout has assigned the element a width yet.
    pub fn has_width(&self) -> bool {
        self.width != 0.0
    }

    pub fn same_size(&self, other: &Rect) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

fn default_animated() -> bool {
    true
}

/// Camera state: where the map looks and from which angle.
///
/// `bearing` is in degrees from north, counter-clockwise, 0–360.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub target: LatLng,
    pub zoom: f64,
    pub tilt: f64,
    pub bearing: f64,
    #[serde(default = "default_animated")]
    pub animated: bool,
}

impl CameraPosition {
    pub fn looking_at(target: LatLng, zoom: f64) -> Self {
        Self {
            target,
            zoom,
            tilt: 0.0,
            bearing: 0.0,
            animated: true,
        }
    }
}

/// Region the user may not pan beyond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapStatusLimits {
    pub southwest: LatLng,
    pub northeast: LatLng,
}

/// Reverse-geocode request, answered by the native SDK.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeocodeQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub code: i64,
    #[serde(default)]
    pub address: serde_json::Value,
}
