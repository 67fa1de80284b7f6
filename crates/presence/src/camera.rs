use foundation::geo::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;
use crate::points::PointOfInterest;

/// Camera position over the globe: where it looks and how high it is
/// (altitude in globe radii).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfView {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
}

impl PointOfView {
    pub const fn new(lat: f64, lng: f64, altitude: f64) -> Self {
        Self { lat, lng, altitude }
    }

    pub fn over(at: GeoPoint, altitude: f64) -> Self {
        Self::new(at.lat, at.lng, altitude)
    }

    pub fn with_altitude(self, altitude: f64) -> Self {
        Self { altitude, ..self }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Mobile,
    Desktop,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Desktop strictly above the breakpoint.
    pub fn class(&self, cfg: &ViewportConfig) -> ViewportClass {
        if self.width > cfg.desktop_breakpoint_px {
            ViewportClass::Desktop
        } else {
            ViewportClass::Mobile
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Where the camera centers for `point`: latitude pushed down so the marker
/// sits above the side panel, longitude untouched.
pub fn base_coordinates(
    point: &PointOfInterest,
    class: ViewportClass,
    cfg: &ViewportConfig,
) -> GeoPoint {
    let bias = match class {
        ViewportClass::Desktop => cfg.desktop_lat_bias_deg,
        ViewportClass::Mobile => cfg.mobile_lat_bias_deg,
    };
    GeoPoint::new((point.lat + bias).clamp(-90.0, 90.0), point.lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::POINTS;

    #[test]
    fn breakpoint_is_exclusive() {
        let cfg = ViewportConfig::default();
        assert_eq!(Viewport::new(980.0, 600.0).class(&cfg), ViewportClass::Mobile);
        assert_eq!(Viewport::new(981.0, 600.0).class(&cfg), ViewportClass::Desktop);
    }

    #[test]
    fn base_biases_latitude_by_class() {
        let cfg = ViewportConfig::default();
        let london = &POINTS[3];
        let desk = base_coordinates(london, ViewportClass::Desktop, &cfg);
        let mob = base_coordinates(london, ViewportClass::Mobile, &cfg);
        assert!((desk.lat - (51.5074 - 12.0)).abs() < 1e-9);
        assert!((mob.lat - (51.5074 - 6.0)).abs() < 1e-9);
        assert_eq!(desk.lng, london.lng);
        assert_eq!(mob.lng, london.lng);
    }
}
