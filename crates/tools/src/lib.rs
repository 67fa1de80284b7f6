//! Offline previews of the presence component: planned camera timelines
//! and strobe output, replayed on a virtual clock.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use foundation::time::Millis;
use presence::PresenceConfig;
use presence::camera::{PointOfView, Viewport, base_coordinates};
use presence::points::{POINTS, index_of};
use presence::profile::profile_for;
use presence::selection::ColorPhase;
use presence::sequencer::{self, CameraAction, CameraStep, SequenceKind, SequenceState, Sequencer};
use presence::strobe::{StrobeWindow, marker_visual, window_at};
use runtime::clock::{Clock, VirtualClock};
use serde::Serialize;

pub fn load_config(path: Option<&Path>) -> Result<PresenceConfig, String> {
    let Some(path) = path else {
        return Ok(PresenceConfig::default());
    };
    let raw = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    PresenceConfig::from_json(&raw).map_err(|e| e.to_string())
}

fn point_index(name: &str) -> Result<usize, String> {
    index_of(name).ok_or_else(|| {
        let known: Vec<_> = POINTS.iter().map(|p| p.name).collect();
        format!("unknown point {name:?}; expected one of: {}", known.join(", "))
    })
}

pub fn format_points() -> String {
    let mut out = String::new();
    for p in &POINTS {
        let [approach, in1, in2, out1, out2] = profile_for(p.name).as_array();
        let _ = writeln!(
            out,
            "{:<4} {:<24} {:>9.4} {:>9.4}  alt {approach}/{in1}/{in2}/{out1}/{out2}",
            p.code(),
            p.name,
            p.lat,
            p.lng,
        );
    }
    out
}

#[derive(Debug, Clone)]
pub struct TimelineRequest {
    pub to: String,
    pub from: Option<String>,
    pub mobile: bool,
}

/// One step as it fired during the replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub at_ms: f64,
    pub state: SequenceState,
    pub phase: ColorPhase,
    pub step: CameraStep,
}

/// Plans the selection of `req.to` and replays it on a virtual clock.
///
/// Without `--from` the camera starts at the configured initial view and
/// runs the short sequence.
pub fn timeline(cfg: &PresenceConfig, req: &TimelineRequest) -> Result<Vec<TimelineRow>, String> {
    let to = &POINTS[point_index(&req.to)?];
    let viewport = if req.mobile {
        Viewport::new(390.0, 844.0)
    } else {
        Viewport::default()
    };
    let class = viewport.class(&cfg.viewport);

    let (kind, from_pov) = match req.from.as_deref() {
        Some(from) => {
            let from = &POINTS[point_index(from)?];
            let base = base_coordinates(from, class, &cfg.viewport);
            let kind = if from.name == to.name {
                SequenceKind::Refocus
            } else {
                SequenceKind::Switch
            };
            (kind, PointOfView::over(base, profile_for(from.name).zoom_out_2))
        }
        None => (SequenceKind::Refocus, cfg.globe.initial_view),
    };

    let base = base_coordinates(to, class, &cfg.viewport);
    let steps = sequencer::plan(kind, from_pov, base, profile_for(to.name), &cfg.sequence);
    Ok(replay(steps))
}

fn replay(steps: Vec<CameraStep>) -> Vec<TimelineRow> {
    let clock = VirtualClock::new();
    let mut seq = Sequencer::new();
    let mut phase = ColorPhase::Red;
    let mut rows = Vec::new();

    let mut record = |at: Millis, step: CameraStep, state: SequenceState, rows: &mut Vec<TimelineRow>| {
        match step.action {
            CameraAction::Phase { phase: p } => phase = p,
            CameraAction::Finish => phase = ColorPhase::Red,
            CameraAction::Fly { .. } => {}
        }
        rows.push(TimelineRow {
            at_ms: at.0,
            state,
            phase,
            step,
        });
    };

    let started = seq.start(clock.now(), steps);
    let state = seq.state();
    for step in started.immediate {
        record(clock.now(), step, state, &mut rows);
    }
    while let Some(due) = seq.next_due() {
        clock.set(due);
        while let Some(step) = seq.pop_due(clock.now()) {
            record(clock.now(), step, seq.state(), &mut rows);
        }
    }
    rows
}

pub fn format_timeline(rows: &[TimelineRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>7}  {:<11} {:<6} action", "t(ms)", "state", "phase");
    for row in rows {
        let action = match row.step.action {
            CameraAction::Fly { pov, duration_ms } => format!(
                "fly lat {:.2} lng {:.2} alt {:.2} over {duration_ms}ms",
                pov.lat, pov.lng, pov.altitude
            ),
            CameraAction::Phase { phase } => format!("phase -> {phase}"),
            CameraAction::Finish => "restore auto-rotate".to_string(),
        };
        let _ = writeln!(
            out,
            "{:>7}  {:<11} {:<6} {action}",
            row.at_ms,
            row.state.as_str(),
            row.phase.as_str(),
        );
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrobeReport {
    pub at_ms: f64,
    pub window: &'static str,
    pub phase: ColorPhase,
    pub hovered: bool,
    pub altitude: f64,
    pub radius: f64,
    pub color: String,
}

pub fn strobe_report(cfg: &PresenceConfig, at_ms: f64, phase: ColorPhase, hovered: bool) -> StrobeReport {
    let window = match window_at(at_ms, &cfg.strobe) {
        StrobeWindow::Off => "off",
        StrobeWindow::On => "on",
        StrobeWindow::Settle { .. } => "settle",
    };
    let v = marker_visual(at_ms, phase, hovered, &cfg.strobe);
    StrobeReport {
        at_ms,
        window,
        phase,
        hovered,
        altitude: v.altitude,
        radius: v.radius,
        color: v.color.to_css(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(to: &str, from: Option<&str>) -> TimelineRequest {
        TimelineRequest {
            to: to.to_string(),
            from: from.map(str::to_string),
            mobile: false,
        }
    }

    #[test]
    fn switch_replays_in_offset_order() {
        let cfg = PresenceConfig::default();
        let rows = timeline(&cfg, &request("London, UK", Some("Cairo, Egypt"))).unwrap();
        let times: Vec<_> = rows.iter().map(|r| r.at_ms).collect();
        assert_eq!(
            times,
            vec![
                0.0, 0.0, 650.0, 1350.0, 2150.0, 2800.0, 3450.0, 17000.0, 18500.0, 19250.0,
                20050.0
            ]
        );
        assert_eq!(rows[6].phase, ColorPhase::Green);
        assert_eq!(rows[6].state, SequenceState::Holding);
        assert_eq!(rows.last().map(|r| (r.state, r.phase)), Some((SequenceState::Idle, ColorPhase::Red)));
    }

    #[test]
    fn no_origin_means_short_sequence() {
        let cfg = PresenceConfig::default();
        let rows = timeline(&cfg, &request("Warsaw, Poland", None)).unwrap();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows.last().map(|r| r.at_ms), Some(18650.0));
    }

    #[test]
    fn mobile_request_uses_mobile_bias() {
        let cfg = PresenceConfig::default();
        let mut req = request("Dubai, UAE", None);
        req.mobile = true;
        let rows = timeline(&cfg, &req).unwrap();
        let CameraAction::Fly { pov, .. } = rows[1].step.action else {
            panic!("expected a flight");
        };
        assert!((pov.lat - (25.2048 - 6.0)).abs() < 1e-9);
    }

    #[test]
    fn unknown_point_is_an_error() {
        let cfg = PresenceConfig::default();
        let err = timeline(&cfg, &request("Paris, France", None)).unwrap_err();
        assert!(err.contains("Dubai, UAE"));
    }

    #[test]
    fn timeline_table_has_header_and_rows() {
        let cfg = PresenceConfig::default();
        let rows = timeline(&cfg, &request("Cairo, Egypt", None)).unwrap();
        let table = format_timeline(&rows);
        assert_eq!(table.lines().count(), rows.len() + 1);
        assert!(table.contains("phase -> green"));
        assert!(table.contains("restore auto-rotate"));
    }

    #[test]
    fn strobe_report_matches_legacy_colors() {
        let cfg = PresenceConfig::default();
        let off = strobe_report(&cfg, 0.0, ColorPhase::Red, false);
        assert_eq!(off.window, "off");
        assert_eq!(off.color, "rgba(255, 15, 15, 1)");
        let on = strobe_report(&cfg, 1050.0, ColorPhase::Red, false);
        assert_eq!(on.window, "on");
        assert_eq!(on.color, "rgba(255, 69, 69, 1)");
    }

    #[test]
    fn points_listing_has_every_code() {
        let listing = format_points();
        for code in ["DXB", "CAI", "AMS", "LON", "WAW"] {
            assert!(listing.contains(code), "{code}");
        }
    }
}
