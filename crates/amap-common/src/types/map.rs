//! Map configuration values as the native SDK expects them.
//!
//! Every field is optional; the native side fills in its documented default
//! for anything left out.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::geo::{CameraPosition, MapStatusLimits, Rect};

/// Declares an enum carried on the wire as the SDK's integer constant.
macro_rules! wire_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code),+
        }

        impl From<$name> for u8 {
            fn from(v: $name) -> u8 {
                v as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = String;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    other => Err(format!(
                        concat!("invalid ", stringify!($name), " code: {}"),
                        other
                    )),
                }
            }
        }
    };
}

wire_code_enum! {
    /// Where the SDK draws its logo.
    LogoPosition {
        BottomLeft = 0,
        BottomCenter = 1,
        BottomRight = 2,
    }
}

wire_code_enum! {
    MapType {
        Normal = 1,
        Satellite = 2,
        Night = 3,
        Navi = 4,
        Bus = 5,
        NaviNight = 6,
    }
}

wire_code_enum! {
    /// How the location dot follows the device.
    MyLocationType {
        Show = 0,
        Locate = 1,
        Follow = 2,
        MapRotate = 3,
        LocationRotate = 4,
        LocationRotateNoCenter = 5,
        FollowNoCenter = 6,
        MapRotateNoCenter = 7,
    }
}

impl Default for LogoPosition {
    fn default() -> Self {
        Self::BottomLeft
    }
}

impl Default for MapType {
    fn default() -> Self {
        Self::Normal
    }
}

impl Default for MyLocationType {
    fn default() -> Self {
        Self::LocationRotate
    }
}

/// Initial configuration for a native map instance.
///
/// `width`, `height`, `x`, `y` and `device_pixel_ratio` are overwritten with
/// the measured element bounds at creation time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Native default: 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_pixel_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_position: Option<LogoPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_type: Option<MapType>,
    /// Native default: false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_controls_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_controls_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compass_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_gestures_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_gestures_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt_gestures_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_gestures_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch_poi_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_position: Option<CameraPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_status_limits: Option<MapStatusLimits>,
}

impl MapConfig {
    /// Overwrite the geometry fields with a measured element rectangle.
    pub fn apply_bounds(&mut self, bounds: &Rect, device_pixel_ratio: f64) {
        self.width = Some(bounds.width);
        self.height = Some(bounds.height);
        self.x = Some(bounds.x);
        self.y = Some(bounds.y);
        self.device_pixel_ratio = Some(device_pixel_ratio);
    }
}

/// Built-in controls and gesture switches. Only the fields that are set are
/// sent; the rest keep their current native value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_location_button_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_controls_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_controls_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compass_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_gestures_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_gestures_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt_gestures_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_gestures_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch_poi_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_position: Option<LogoPosition>,
}

/// Appearance and behavior of the location dot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyLocationStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_location_type: Option<MyLocationType>,
    /// Location refresh interval in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_my_location: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_fill_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::geo::LatLng;
    use serde_json::json;

    #[test]
    fn empty_config_serializes_to_empty_object() {
        let config = MapConfig::default();
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({}));
    }

    #[test]
    fn enums_use_sdk_codes() {
        let config = MapConfig {
            logo_position: Some(LogoPosition::BottomRight),
            map_type: Some(MapType::NaviNight),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"logoPosition": 2, "mapType": 6})
        );
    }

    #[test]
    fn invalid_codes_are_rejected() {
        assert!(serde_json::from_value::<MapType>(json!(0)).is_err());
        assert!(serde_json::from_value::<MapType>(json!(7)).is_err());
        assert!(serde_json::from_value::<LogoPosition>(json!(3)).is_err());
        assert_eq!(
            MapType::try_from(9).unwrap_err(),
            "invalid MapType code: 9"
        );
    }

    #[test]
    fn apply_bounds_overwrites_geometry() {
        let mut config = MapConfig {
            width: Some(1.0),
            map_type: Some(MapType::Satellite),
            ..Default::default()
        };
        config.apply_bounds(&Rect::new(10.0, 20.0, 300.0, 200.0), 3.0);
        assert_eq!(config.width, Some(300.0));
        assert_eq!(config.height, Some(200.0));
        assert_eq!(config.x, Some(10.0));
        assert_eq!(config.y, Some(20.0));
        assert_eq!(config.device_pixel_ratio, Some(3.0));
        assert_eq!(config.map_type, Some(MapType::Satellite));
    }

    #[test]
    fn config_camel_case_keys() {
        let config = MapConfig {
            device_pixel_ratio: Some(2.0),
            touch_poi_enabled: Some(false),
            camera_position: Some(CameraPosition::looking_at(LatLng::new(39.9, 116.4), 10.0)),
            ..Default::default()
        };
        let v = serde_json::to_value(&config).unwrap();
        assert_eq!(v["devicePixelRatio"], json!(2.0));
        assert_eq!(v["touchPoiEnabled"], json!(false));
        assert_eq!(v["cameraPosition"]["target"]["latitude"], json!(39.9));
    }

    #[test]
    fn ui_settings_only_sends_set_fields() {
        let settings = UiSettings {
            my_location_button_enabled: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({"myLocationButtonEnabled": true})
        );
    }

    #[test]
    fn my_location_style_wire_shape() {
        let style = MyLocationStyle {
            my_location_type: Some(MyLocationType::Follow),
            interval: Some(2000),
            stroke_color: Some(Color::from_rgba(0, 0, 255, 255)),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&style).unwrap(),
            json!({"myLocationType": 2, "interval": 2000, "strokeColor": "#0000ff"})
        );
    }
}
