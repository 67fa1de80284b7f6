//! Scripted camera sequence run when a point is selected.
//!
//! A selection is planned up front as a list of [`CameraStep`]s with offsets
//! from the click. Offset-zero steps are applied immediately; the rest go on
//! a [`TimerQueue`] that the host drains on every tick. Starting a new
//! sequence cancels everything the previous one still had pending.

use foundation::geo::GeoPoint;
use foundation::time::Millis;
use runtime::timers::TimerQueue;
use serde::Serialize;

use crate::camera::PointOfView;
use crate::config::SequenceTiming;
use crate::profile::CameraProfile;
use crate::selection::ColorPhase;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceState {
    #[default]
    Idle,
    Travelling,
    ZoomingIn,
    Holding,
    ZoomingOut,
}

impl SequenceState {
    pub fn as_str(self) -> &'static str {
        match self {
            SequenceState::Idle => "idle",
            SequenceState::Travelling => "travelling",
            SequenceState::ZoomingIn => "zooming_in",
            SequenceState::Holding => "holding",
            SequenceState::ZoomingOut => "zooming_out",
        }
    }
}

/// Cross-location switches zoom out and travel first; refocusing the same
/// point (or the first pick) only zooms in and out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    Switch,
    Refocus,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CameraAction {
    Fly { pov: PointOfView, duration_ms: u32 },
    Phase { phase: ColorPhase },
    /// Restore auto-rotation and turn the marker back to red.
    Finish,
}

/// Anything a [`Sequencer`] can schedule.
pub trait SequenceStep {
    fn offset_ms(&self) -> u64;
    fn state(&self) -> SequenceState;
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CameraStep {
    pub offset_ms: u64,
    pub state: SequenceState,
    #[serde(flatten)]
    pub action: CameraAction,
}

impl CameraStep {
    fn fly(offset_ms: u64, state: SequenceState, pov: PointOfView, duration_ms: u32) -> Self {
        Self {
            offset_ms,
            state,
            action: CameraAction::Fly { pov, duration_ms },
        }
    }

    fn phase(offset_ms: u64, state: SequenceState, phase: ColorPhase) -> Self {
        Self {
            offset_ms,
            state,
            action: CameraAction::Phase { phase },
        }
    }
}

impl SequenceStep for CameraStep {
    fn offset_ms(&self) -> u64 {
        self.offset_ms
    }

    fn state(&self) -> SequenceState {
        self.state
    }
}

/// Plans the full timeline of one selection.
///
/// `from` is the camera position when the click happened (used for the
/// zoom-out legs of a switch); `base` is where the camera centers on the new
/// point.
pub fn plan(
    kind: SequenceKind,
    from: PointOfView,
    base: GeoPoint,
    profile: CameraProfile,
    timing: &SequenceTiming,
) -> Vec<CameraStep> {
    use SequenceState::*;

    let mut steps = Vec::with_capacity(10);
    steps.push(CameraStep::phase(0, ZoomingIn, ColorPhase::Orange));

    let at_base = |altitude| PointOfView::over(base, altitude);
    let zoom_in_2_at = match kind {
        SequenceKind::Switch => {
            steps[0].state = Travelling;
            steps.push(CameraStep::fly(0, Travelling, from.with_altitude(profile.zoom_out_1), 600));
            steps.push(CameraStep::fly(650, Travelling, from.with_altitude(profile.zoom_out_2), 650));
            steps.push(CameraStep::fly(1350, Travelling, at_base(profile.approach), 750));
            steps.push(CameraStep::fly(2150, ZoomingIn, at_base(profile.zoom_in_1), 600));
            2800
        }
        SequenceKind::Refocus => {
            steps.push(CameraStep::fly(0, ZoomingIn, at_base(profile.approach), 700));
            steps.push(CameraStep::fly(750, ZoomingIn, at_base(profile.zoom_in_1), 600));
            1400
        }
    };
    const ZOOM_IN_2_MS: u32 = 650;
    steps.push(CameraStep::fly(zoom_in_2_at, ZoomingIn, at_base(profile.zoom_in_2), ZOOM_IN_2_MS));

    let hold_start = zoom_in_2_at + ZOOM_IN_2_MS as u64;
    let hold_end = hold_start + timing.hold_ms;
    let warning_at = hold_end.saturating_sub(timing.hold_warning_ms).max(hold_start);
    steps.push(CameraStep::phase(hold_start, Holding, ColorPhase::Green));
    steps.push(CameraStep::phase(warning_at, Holding, ColorPhase::Orange));

    steps.push(CameraStep::fly(hold_end, ZoomingOut, at_base(profile.zoom_out_1), 700));
    steps.push(CameraStep::fly(hold_end + 750, ZoomingOut, at_base(profile.zoom_out_2), 750));
    steps.push(CameraStep {
        offset_ms: hold_end + 1550,
        state: Idle,
        action: CameraAction::Finish,
    });
    steps
}

/// Result of starting a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Started<S> {
    /// Pending steps of the previous sequence that were dropped.
    pub cancelled: usize,
    /// Offset-zero steps the caller must apply right away.
    pub immediate: Vec<S>,
    pub scheduled: usize,
}

/// Owns the pending steps of the one live sequence.
#[derive(Debug)]
pub struct Sequencer<S> {
    timers: TimerQueue<S>,
    state: SequenceState,
}

impl<S> Default for Sequencer<S> {
    fn default() -> Self {
        Self {
            timers: TimerQueue::new(),
            state: SequenceState::Idle,
        }
    }
}

impl<S: SequenceStep> Sequencer<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Steps still waiting to fire.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_running(&self) -> bool {
        self.state != SequenceState::Idle || !self.timers.is_empty()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    /// Cancels the live sequence (if any) and schedules `steps` from `now`.
    pub fn start(&mut self, now: Millis, steps: Vec<S>) -> Started<S> {
        let cancelled = self.timers.cancel_all();

        let mut immediate = Vec::new();
        for step in steps {
            if step.offset_ms() == 0 {
                immediate.push(step);
            } else {
                self.timers.schedule(now.after(step.offset_ms()), step);
            }
        }
        if let Some(first) = immediate.first() {
            self.state = first.state();
        }
        let scheduled = self.timers.len();
        if scheduled == 0 && immediate.iter().all(|s| s.state() == SequenceState::Idle) {
            self.state = SequenceState::Idle;
        }

        Started {
            cancelled,
            immediate,
            scheduled,
        }
    }

    /// Pops the next step due at `now`, advancing the state.
    pub fn pop_due(&mut self, now: Millis) -> Option<S> {
        let (_, _, step) = self.timers.pop_due(now)?;
        self.state = if self.timers.is_empty() {
            SequenceState::Idle
        } else {
            step.state()
        };
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile() -> CameraProfile {
        CameraProfile::new([1.65, 1.15, 0.8, 1.4, 1.8])
    }

    fn offsets(steps: &[CameraStep]) -> Vec<u64> {
        steps.iter().map(|s| s.offset_ms).collect()
    }

    #[test]
    fn switch_timeline_matches_legacy_offsets() {
        let steps = plan(
            SequenceKind::Switch,
            PointOfView::new(30.0, 25.0, 2.4),
            GeoPoint::new(40.0, 4.9),
            profile(),
            &SequenceTiming::default(),
        );
        assert_eq!(
            offsets(&steps),
            vec![0, 0, 650, 1350, 2150, 2800, 3450, 17000, 18500, 19250, 20050]
        );
        assert_eq!(steps[0].action, CameraAction::Phase { phase: ColorPhase::Orange });
        assert_eq!(
            steps[1].action,
            CameraAction::Fly {
                pov: PointOfView::new(30.0, 25.0, 1.4),
                duration_ms: 600
            }
        );
        assert_eq!(steps.last().map(|s| s.action), Some(CameraAction::Finish));
    }

    #[test]
    fn refocus_timeline_skips_travel() {
        let steps = plan(
            SequenceKind::Refocus,
            PointOfView::new(0.0, 0.0, 2.4),
            GeoPoint::new(13.2, 55.27),
            profile(),
            &SequenceTiming::default(),
        );
        assert_eq!(
            offsets(&steps),
            vec![0, 0, 750, 1400, 2050, 15600, 17100, 17850, 18650]
        );
        assert!(steps.iter().all(|s| s.state != SequenceState::Travelling));
        assert_eq!(
            steps[1].action,
            CameraAction::Fly {
                pov: PointOfView::new(13.2, 55.27, 1.65),
                duration_ms: 700
            }
        );
    }

    #[test]
    fn green_only_inside_hold() {
        let steps = plan(
            SequenceKind::Refocus,
            PointOfView::new(0.0, 0.0, 2.4),
            GeoPoint::new(0.0, 0.0),
            profile(),
            &SequenceTiming::default(),
        );
        let green: Vec<_> = steps
            .iter()
            .filter(|s| s.action == CameraAction::Phase { phase: ColorPhase::Green })
            .collect();
        assert_eq!(green.len(), 1);
        assert_eq!(green[0].state, SequenceState::Holding);
    }

    #[test]
    fn warning_never_precedes_hold() {
        let timing = SequenceTiming {
            hold_ms: 500,
            hold_warning_ms: 500,
        };
        let steps = plan(
            SequenceKind::Refocus,
            PointOfView::new(0.0, 0.0, 2.4),
            GeoPoint::new(0.0, 0.0),
            profile(),
            &timing,
        );
        let phases: Vec<_> = steps
            .iter()
            .filter(|s| matches!(s.action, CameraAction::Phase { .. }))
            .map(|s| s.offset_ms)
            .collect();
        assert_eq!(phases, vec![0, 2050, 2050]);
    }

    #[test]
    fn start_cancels_previous_sequence() {
        let timing = SequenceTiming::default();
        let mut seq = Sequencer::new();
        let first = plan(
            SequenceKind::Refocus,
            PointOfView::new(0.0, 0.0, 2.4),
            GeoPoint::new(0.0, 0.0),
            profile(),
            &timing,
        );
        let started = seq.start(Millis(0.0), first);
        assert_eq!(started.cancelled, 0);
        assert_eq!(started.immediate.len(), 2);
        assert_eq!(started.scheduled, 7);
        assert_eq!(seq.state(), SequenceState::ZoomingIn);

        let second = plan(
            SequenceKind::Switch,
            PointOfView::new(0.0, 0.0, 2.4),
            GeoPoint::new(10.0, 10.0),
            profile(),
            &timing,
        );
        let started = seq.start(Millis(100.0), second);
        assert_eq!(started.cancelled, 7);
        assert_eq!(started.scheduled, 9);
        assert_eq!(seq.state(), SequenceState::Travelling);
        assert_eq!(seq.next_due(), Some(Millis(750.0)));
    }

    #[test]
    fn drains_to_idle() {
        let mut seq = Sequencer::new();
        let steps = plan(
            SequenceKind::Refocus,
            PointOfView::new(0.0, 0.0, 2.4),
            GeoPoint::new(0.0, 0.0),
            profile(),
            &SequenceTiming::default(),
        );
        seq.start(Millis(0.0), steps);

        let mut states = Vec::new();
        while let Some(step) = seq.pop_due(Millis(60_000.0)) {
            states.push(step.state);
        }
        assert_eq!(states.len(), 7);
        assert_eq!(seq.state(), SequenceState::Idle);
        assert!(!seq.is_running());
        assert!(states.contains(&SequenceState::Holding));
    }
}
