use serde::{Deserialize, Serialize};

/// Geographic position in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            lng: normalize_lng(self.lng + d_lng),
        }
    }
}

/// Wraps a longitude into `[-180, 180]`.
pub fn normalize_lng(lng: f64) -> f64 {
    if !lng.is_finite() {
        return lng;
    }
    let mut x = lng;
    while x > 180.0 {
        x -= 360.0;
    }
    while x < -180.0 {
        x += 360.0;
    }
    x
}
