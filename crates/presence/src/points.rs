use foundation::geo::GeoPoint;
use serde::Serialize;

/// A named location shown on the globe.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PointOfInterest {
    pub name: &'static str,
    pub description: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl PointOfInterest {
    /// Text before the first comma ("Dubai" for "Dubai, UAE").
    pub fn short_label(&self) -> &'static str {
        let name = self.name;
        match name.find(',') {
            Some(idx) => name[..idx].trim_end(),
            None => name,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn code(&self) -> &'static str {
        iata_code(self.name)
    }
}

pub static POINTS: [PointOfInterest; 5] = [
    PointOfInterest {
        name: "Dubai, UAE",
        description: "Strategic partnerships and business development",
        lat: 25.2048,
        lng: 55.2708,
    },
    PointOfInterest {
        name: "Cairo, Egypt",
        description: "Regional diplomatic and cultural initiatives",
        lat: 30.0444,
        lng: 31.2357,
    },
    PointOfInterest {
        name: "Amsterdam, Netherlands",
        description: "European operations and consulting",
        lat: 52.3676,
        lng: 4.9041,
    },
    PointOfInterest {
        name: "London, UK",
        description: "International finance and education connections",
        lat: 51.5074,
        lng: -0.1278,
    },
    PointOfInterest {
        name: "Warsaw, Poland",
        description: "Partners and events",
        lat: 52.2297,
        lng: 21.0122,
    },
];

/// Shown when a name has no airport code.
pub const UNKNOWN_CODE: &str = "— — —";

const CODES: [(&str, &str); 5] = [
    ("Dubai, UAE", "DXB"),
    ("Cairo, Egypt", "CAI"),
    ("Amsterdam, Netherlands", "AMS"),
    ("London, UK", "LON"),
    ("Warsaw, Poland", "WAW"),
];

pub fn points() -> &'static [PointOfInterest] {
    &POINTS
}

pub fn iata_code(name: &str) -> &'static str {
    CODES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
        .unwrap_or(UNKNOWN_CODE)
}

/// Position of `name` in the fixed point list.
pub fn index_of(name: &str) -> Option<usize> {
    POINTS.iter().position(|p| p.name == name)
}
