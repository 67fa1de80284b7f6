//! Radar-blip pulse for the globe markers.
//!
//! Everything visual is a pure function of the position inside the strobe
//! cycle, the selected marker's color phase and hover state. [`StrobeEngine`]
//! only adds per-marker phase offsets, refresh throttling and ripple
//! bookkeeping on top.

use foundation::color::Rgba;
use foundation::time::Millis;
use rand::RngCore;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::config::StrobeTiming;
use crate::points::PointOfInterest;
use crate::selection::ColorPhase;

const BASE_ALT: f64 = 0.012;
const GLOW_ALT: f64 = 0.02;
const SPIKE_ALT: f64 = 0.032;
const BASE_RADIUS: f64 = 0.36;
const GLOW_RADIUS: f64 = 0.40;
const SPIKE_RADIUS: f64 = 0.48;
const OFF_SCALE: f64 = 0.9;

const HOVER_ALT_SCALE: f64 = 1.25;
const HOVER_RADIUS_SCALE: f64 = 1.12;
const HOVER_BRIGHTEN: u8 = 28;
const HOVER_CAP: u8 = 200;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StrobeWindow {
    Off,
    On,
    /// `k` runs 0..1 across the settle window.
    Settle { k: f64 },
}

/// Colors of one phase's cycle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub off: Rgba,
    pub on: Rgba,
    pub settle_from: Rgba,
    pub settle_to: Rgba,
}

pub fn palette(phase: ColorPhase) -> Palette {
    match phase {
        ColorPhase::Red => Palette {
            off: Rgba::opaque(255, 15, 15),
            on: Rgba::opaque(255, 69, 69),
            settle_from: Rgba::opaque(255, 172, 172),
            settle_to: Rgba::opaque(255, 120, 120),
        },
        ColorPhase::Orange => Palette {
            off: Rgba::opaque(255, 120, 0),
            on: Rgba::opaque(255, 170, 60),
            settle_from: Rgba::opaque(255, 200, 120),
            settle_to: Rgba::opaque(255, 150, 40),
        },
        ColorPhase::Green => Palette {
            off: Rgba::opaque(20, 200, 70),
            on: Rgba::opaque(90, 255, 140),
            settle_from: Rgba::opaque(150, 255, 180),
            settle_to: Rgba::opaque(60, 220, 110),
        },
    }
}

/// Render attributes of one marker for one refresh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerVisual {
    pub altitude: f64,
    pub radius: f64,
    pub color: Rgba,
}

/// Which window `t_ms` falls in; `t_ms` is wrapped into the cycle first.
pub fn window_at(t_ms: f64, timing: &StrobeTiming) -> StrobeWindow {
    let t = t_ms.rem_euclid(timing.period_ms);
    if t < timing.off_ms {
        StrobeWindow::Off
    } else if t < timing.off_ms + timing.on_ms {
        StrobeWindow::On
    } else {
        let settle = timing.settle_ms().max(1.0);
        let k = ((t - timing.off_ms - timing.on_ms) / settle).clamp(0.0, 1.0);
        StrobeWindow::Settle { k }
    }
}

pub fn marker_visual(
    t_ms: f64,
    phase: ColorPhase,
    hovered: bool,
    timing: &StrobeTiming,
) -> MarkerVisual {
    let pal = palette(phase);
    let visual = match window_at(t_ms, timing) {
        StrobeWindow::Off => MarkerVisual {
            altitude: BASE_ALT * OFF_SCALE,
            radius: BASE_RADIUS * OFF_SCALE,
            color: pal.off,
        },
        StrobeWindow::On => MarkerVisual {
            altitude: SPIKE_ALT,
            radius: SPIKE_RADIUS,
            color: pal.on,
        },
        StrobeWindow::Settle { k } => MarkerVisual {
            altitude: GLOW_ALT + (BASE_ALT - GLOW_ALT) * k,
            radius: GLOW_RADIUS + (BASE_RADIUS - GLOW_RADIUS) * k,
            color: pal.settle_from.lerp(pal.settle_to, k),
        },
    };

    if !hovered {
        return visual;
    }
    MarkerVisual {
        altitude: visual.altitude * HOVER_ALT_SCALE,
        radius: visual.radius * HOVER_RADIUS_SCALE,
        color: visual.color.brighten(HOVER_BRIGHTEN, HOVER_CAP),
    }
}

/// A ring drawn on the globe surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
    pub color: Rgba,
    pub max_radius: f64,
    /// Degrees per second; zero keeps the ring static.
    pub propagation_speed: f64,
    pub repeat_period_ms: f64,
}

/// Expanding ring emitted from the selected marker while it is ON.
pub fn ripple_ring(point: &PointOfInterest) -> Ring {
    Ring {
        lat: point.lat,
        lng: point.lng,
        altitude: 0.01,
        color: Rgba {
            a: 0.6,
            ..Rgba::opaque(255, 86, 86)
        },
        max_radius: 2.5,
        propagation_speed: 1.2,
        repeat_period_ms: 800.0,
    }
}

/// Static ground halos, one per marker. Set once; they never animate.
pub fn glow_halos(points: &[PointOfInterest]) -> Vec<Ring> {
    points
        .iter()
        .map(|p| Ring {
            lat: p.lat,
            lng: p.lng,
            altitude: 0.0,
            color: Rgba {
                a: 0.0,
                ..Rgba::opaque(255, 131, 131)
            },
            max_radius: 0.8,
            propagation_speed: 0.0,
            repeat_period_ms: 100_000_000.0,
        })
        .collect()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RippleChange {
    Unchanged,
    Emit(usize),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrobeFrame {
    pub markers: Vec<MarkerVisual>,
    pub ripple: RippleChange,
}

#[derive(Debug, Clone)]
pub struct StrobeEngine {
    timing: StrobeTiming,
    offsets_ms: Vec<f64>,
    last_refresh: Option<Millis>,
    ripple_for: Option<usize>,
}

impl StrobeEngine {
    /// Draws one phase offset per marker from `seed`.
    pub fn new(marker_count: usize, timing: StrobeTiming, seed: u64) -> Self {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let offsets_ms = (0..marker_count)
            .map(|_| {
                let unit = (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64);
                unit * timing.period_ms
            })
            .collect();
        Self::with_offsets(offsets_ms, timing)
    }

    pub fn with_offsets(offsets_ms: Vec<f64>, timing: StrobeTiming) -> Self {
        Self {
            timing,
            offsets_ms,
            last_refresh: None,
            ripple_for: None,
        }
    }

    pub fn offsets_ms(&self) -> &[f64] {
        &self.offsets_ms
    }

    /// True when at least `refresh_ms` passed since the last frame.
    pub fn due(&self, now: Millis) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now.since(last) >= self.timing.refresh_ms,
        }
    }

    /// Computes every marker for `now`. Only `selected` uses `phase`; the
    /// rest always strobe red.
    pub fn frame(
        &mut self,
        now: Millis,
        selected: Option<usize>,
        phase: ColorPhase,
        hovered: Option<usize>,
    ) -> StrobeFrame {
        self.last_refresh = Some(now);

        let markers = self
            .offsets_ms
            .iter()
            .enumerate()
            .map(|(idx, offset)| {
                let marker_phase = if selected == Some(idx) {
                    phase
                } else {
                    ColorPhase::Red
                };
                marker_visual(
                    now.0 + offset,
                    marker_phase,
                    hovered == Some(idx),
                    &self.timing,
                )
            })
            .collect();

        let ripple_wanted = selected.filter(|&idx| {
            self.offsets_ms.get(idx).is_some_and(|offset| {
                matches!(window_at(now.0 + offset, &self.timing), StrobeWindow::On)
            })
        });
        let ripple = match (self.ripple_for, ripple_wanted) {
            (prev, Some(idx)) if prev != Some(idx) => RippleChange::Emit(idx),
            (Some(_), None) => RippleChange::Clear,
            _ => RippleChange::Unchanged,
        };
        self.ripple_for = ripple_wanted;

        StrobeFrame { markers, ripple }
    }
}
