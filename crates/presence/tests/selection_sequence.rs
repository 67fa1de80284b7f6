mod support;

use foundation::time::Millis;
use pretty_assertions::assert_eq;
use presence::panel::SelectorButton;
use presence::selection::ColorPhase;
use presence::sequencer::SequenceState;
use runtime::clock::{Clock, VirtualClock};
use session::InMemorySelectionStore;

use support::*;

#[test]
fn first_mount_shows_first_point_checked_without_timers() {
    let mut backends = FakeBackends::webgl();
    let panel = RecordingPanel::default();
    let m = mount(&mut backends, &panel, InMemorySelectionStore::default(), DESKTOP)
        .expect("mounted");

    assert_eq!(panel.cards(), vec!["DXB"]);
    let selector = panel
        .calls()
        .into_iter()
        .find_map(|c| match c {
            PanelCall::Selector(buttons) => Some(buttons),
            _ => None,
        })
        .expect("selector rendered");
    let checked: Vec<&SelectorButton> = selector.iter().filter(|b| b.checked).collect();
    assert_eq!(checked.len(), 1);
    assert_eq!(checked[0].label, "Dubai");

    assert_eq!(m.pending_steps(), 0);
    assert_eq!(m.color_phase(), ColorPhase::Red);
    assert_eq!(m.sequence_state(), SequenceState::Idle);

    let globe = backends.globe.borrow();
    assert_eq!(globe.points, 5);
    assert_eq!(globe.halos, 5);
    assert!(globe.auto_rotate);
    assert_eq!(globe.viewport, Some((1440.0, 900.0)));
}

#[test]
fn reselect_cancels_pending_steps() {
    let mut backends = FakeBackends::webgl();
    let panel = RecordingPanel::default();
    let mut m = mount(&mut backends, &panel, InMemorySelectionStore::default(), DESKTOP)
        .expect("mounted");
    let clock = VirtualClock::new();

    m.select(2, clock.now());
    assert_eq!(m.pending_steps(), 9);

    m.tick(clock.advance(700.0));
    assert_eq!(m.pending_steps(), 8);

    // Amsterdam again: the rest of the switch is dropped, a refocus runs.
    m.select(2, clock.now());
    assert_eq!(m.pending_steps(), 7);
    assert_eq!(m.sequence_state(), SequenceState::ZoomingIn);

    // The cancelled switch would have flown at 1350; nothing fires early.
    let before = backends.globe.borrow().flights.len();
    m.tick(clock.advance(650.0));
    assert_eq!(backends.globe.borrow().flights.len(), before);

    let selects: Vec<_> = m
        .events()
        .filter(|e| e.kind == "select")
        .map(|e| e.message.clone())
        .collect();
    assert_eq!(
        selects,
        vec![
            "Amsterdam, Netherlands scheduled=9 cancelled=0".to_string(),
            "Amsterdam, Netherlands scheduled=7 cancelled=8".to_string(),
        ]
    );
}

#[test]
fn color_phase_follows_the_switch_timeline() {
    let mut backends = FakeBackends::webgl();
    let panel = RecordingPanel::default();
    let mut m = mount(&mut backends, &panel, InMemorySelectionStore::default(), DESKTOP)
        .expect("mounted");
    let clock = VirtualClock::new();
    m.select(3, clock.now());

    let mut green = Vec::new();
    let mut orange = Vec::new();
    while clock.now().0 < 21_000.0 {
        let now = clock.advance(50.0);
        m.tick(now);
        match m.color_phase() {
            ColorPhase::Green => green.push(now.0),
            ColorPhase::Orange => orange.push(now.0),
            ColorPhase::Red => {}
        }
    }

    assert_eq!(green.first(), Some(&3450.0));
    assert_eq!(green.last(), Some(&16_950.0));
    assert_eq!(orange.first(), Some(&50.0));
    assert_eq!(orange.last(), Some(&20_000.0));
    assert!(orange.iter().all(|t| *t < 3450.0 || *t >= 17_000.0));
    assert_eq!(m.color_phase(), ColorPhase::Red);
    assert_eq!(m.sequence_state(), SequenceState::Idle);
    assert!(backends.globe.borrow().auto_rotate);
}

#[test]
fn same_location_runs_the_short_sequence() {
    let mut backends = FakeBackends::webgl();
    let panel = RecordingPanel::default();
    let mut m = mount(&mut backends, &panel, InMemorySelectionStore::default(), DESKTOP)
        .expect("mounted");

    m.select(0, Millis(0.0));
    assert_eq!(m.pending_steps(), 7);
    let ran = m.tick(Millis(18_650.0));
    assert_eq!(ran, 7);
    assert_eq!(m.pending_steps(), 0);

    // Mount flight, then approach, two zoom-ins and two zoom-outs.
    assert_eq!(backends.globe.borrow().flights.len(), 6);
}

#[test]
fn mobile_viewport_uses_smaller_latitude_bias() {
    let mut backends = FakeBackends::webgl();
    let panel = RecordingPanel::default();
    let mut m = mount(&mut backends, &panel, InMemorySelectionStore::default(), MOBILE)
        .expect("mounted");

    m.select(0, Millis(0.0));
    let (pov, _) = backends.globe.borrow().flights[1];
    assert!((pov.lat - (25.2048 - 6.0)).abs() < 1e-9);

    m.set_viewport(1200.0, 800.0);
    m.select(0, Millis(100.0));
    let (pov, _) = *backends.globe.borrow().flights.last().expect("flight");
    assert!((pov.lat - (25.2048 - 12.0)).abs() < 1e-9);
    assert_eq!(backends.globe.borrow().viewport, Some((1200.0, 800.0)));
}

#[test]
fn card_swaps_only_on_animation_end() {
    let mut backends = FakeBackends::webgl();
    let panel = RecordingPanel::default();
    let mut m = mount(&mut backends, &panel, InMemorySelectionStore::default(), DESKTOP)
        .expect("mounted");

    m.select(1, Millis(0.0));
    m.select(4, Millis(10.0));
    assert_eq!(panel.cards(), vec!["DXB"]);

    m.on_card_animation_end();
    assert_eq!(panel.cards(), vec!["DXB", "WAW"]);
    m.on_card_animation_end();
    m.on_card_animation_end();
    assert_eq!(panel.cards(), vec!["DXB", "WAW"]);

    let calls = panel.calls();
    assert_eq!(calls.iter().filter(|c| **c == PanelCall::Exit).count(), 1);
    assert_eq!(calls.iter().filter(|c| **c == PanelCall::Enter).count(), 1);
    assert!(calls.contains(&PanelCall::Checked(4)));
}

#[test]
fn strobe_ripples_only_for_the_selected_marker() {
    let mut backends = FakeBackends::webgl();
    let panel = RecordingPanel::default();
    let mut m = mount(&mut backends, &panel, InMemorySelectionStore::default(), DESKTOP)
        .expect("mounted");
    let clock = VirtualClock::new();

    for _ in 0..40 {
        m.tick(clock.advance(80.0));
    }
    let globe = backends.globe.borrow();
    assert_eq!(globe.visuals.len(), 40);
    assert!(globe.visuals.iter().all(|frame| frame.len() == 5));
    // One emit per cycle of the selected marker, each followed by a clear.
    assert!(!globe.ripples.is_empty());
    assert!(globe.ripples.iter().all(|n| *n <= 1));
    assert!(globe.ripples.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn hover_shows_and_hides_tooltip() {
    let mut backends = FakeBackends::webgl();
    let panel = RecordingPanel::default();
    let mut m = mount(&mut backends, &panel, InMemorySelectionStore::default(), DESKTOP)
        .expect("mounted");

    let tip = m.set_hovered(Some(3)).expect("tooltip");
    assert_eq!(tip.title, "London, UK");
    assert_eq!(tip.body, "International finance and education connections");
    assert_eq!(m.set_hovered(None), None);

    let tooltips: Vec<_> = panel
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            PanelCall::Tooltip(t) => Some(t.is_some()),
            _ => None,
        })
        .collect();
    assert_eq!(tooltips, vec![true, false]);
}
