use serde::{Deserialize, Serialize};

/// Altitudes used by one focus animation, in globe radii.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraProfile {
    pub approach: f64,
    pub zoom_in_1: f64,
    pub zoom_in_2: f64,
    pub zoom_out_1: f64,
    pub zoom_out_2: f64,
}

impl CameraProfile {
    pub const DEFAULT: CameraProfile = CameraProfile::new([1.65, 1.15, 0.8, 1.4, 1.8]);

    pub const fn new(levels: [f64; 5]) -> Self {
        Self {
            approach: levels[0],
            zoom_in_1: levels[1],
            zoom_in_2: levels[2],
            zoom_out_1: levels[3],
            zoom_out_2: levels[4],
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.approach,
            self.zoom_in_1,
            self.zoom_in_2,
            self.zoom_out_1,
            self.zoom_out_2,
        ]
    }
}

impl Default for CameraProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const PROFILES: [(&str, CameraProfile); 5] = [
    ("Dubai, UAE", CameraProfile::new([1.7, 1.2, 0.85, 1.45, 1.85])),
    ("Cairo, Egypt", CameraProfile::new([1.7, 1.2, 0.85, 1.45, 1.8])),
    (
        "Amsterdam, Netherlands",
        CameraProfile::new([1.65, 1.15, 0.80, 1.4, 1.8]),
    ),
    ("London, UK", CameraProfile::new([1.65, 1.15, 0.80, 1.4, 1.8])),
    ("Warsaw, Poland", CameraProfile::new([1.65, 1.15, 0.80, 1.4, 1.8])),
];

/// Profile for a point name, falling back to [`CameraProfile::DEFAULT`].
pub fn profile_for(name: &str) -> CameraProfile {
    PROFILES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, p)| *p)
        .unwrap_or(CameraProfile::DEFAULT)
}
