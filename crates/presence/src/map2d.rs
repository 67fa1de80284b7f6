//! Flat tile-map fallback used when the 3D globe is unavailable.
//!
//! The map gets one continuous fly-to plan per selection: in to street level
//! and back out, then a small pan so the marker clears the side panel. There
//! is no strobe and no color phase here.

use foundation::geo::GeoPoint;
use serde::Serialize;

use crate::camera::ViewportClass;
use crate::config::ViewportConfig;
use crate::points::PointOfInterest;
use crate::sequencer::{SequenceState, SequenceStep};

/// Width of the side panel when it floats over the map, if it does.
///
/// Only a desktop viewport with an absolutely positioned panel counts as an
/// overlay.
pub fn overlay_width(class: ViewportClass, panel_overlay_px: Option<f64>) -> Option<f64> {
    match class {
        ViewportClass::Desktop => panel_overlay_px.filter(|w| *w > 0.0),
        ViewportClass::Mobile => None,
    }
}

/// Map center for `point`, nudged west when the panel overlays the map.
pub fn map_center(point: &PointOfInterest, overlay: Option<f64>, cfg: &ViewportConfig) -> GeoPoint {
    let offset = if overlay.is_some() {
        cfg.map_lng_offset_deg
    } else {
        0.0
    };
    point.location().offset(0.0, offset)
}

/// Horizontal pan that moves the marker out from under an overlay panel.
pub fn clear_panel_px(overlay_width: f64, cfg: &ViewportConfig) -> f64 {
    (overlay_width * cfg.map_pan_panel_fraction).min(cfg.map_pan_max_px)
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MapAction {
    FlyTo {
        center: GeoPoint,
        zoom: u8,
        duration_ms: u32,
    },
    /// Resolved when it fires, since the layout may have changed by then.
    ClearPanel { duration_ms: u32 },
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MapStep {
    pub offset_ms: u64,
    pub state: SequenceState,
    #[serde(flatten)]
    pub action: MapAction,
}

impl SequenceStep for MapStep {
    fn offset_ms(&self) -> u64 {
        self.offset_ms
    }

    fn state(&self) -> SequenceState {
        self.state
    }
}

const FLY_PLAN: [(u64, SequenceState, u8, u32); 5] = [
    (0, SequenceState::Travelling, 5, 900),
    (950, SequenceState::ZoomingIn, 6, 800),
    (1800, SequenceState::ZoomingIn, 7, 800),
    (2650, SequenceState::ZoomingOut, 5, 850),
    (3550, SequenceState::ZoomingOut, 4, 900),
];

const CLEAR_PANEL_AT_MS: u64 = 4500;
const CLEAR_PANEL_MS: u32 = 600;

pub fn plan(center: GeoPoint) -> Vec<MapStep> {
    let mut steps: Vec<MapStep> = FLY_PLAN
        .iter()
        .map(|&(offset_ms, state, zoom, duration_ms)| MapStep {
            offset_ms,
            state,
            action: MapAction::FlyTo {
                center,
                zoom,
                duration_ms,
            },
        })
        .collect();
    steps.push(MapStep {
        offset_ms: CLEAR_PANEL_AT_MS,
        state: SequenceState::Idle,
        action: MapAction::ClearPanel {
            duration_ms: CLEAR_PANEL_MS,
        },
    });
    steps
}
