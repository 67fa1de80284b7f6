//! Side panel next to the globe: the boarding-pass card and the city
//! selector.
//!
//! The view itself lives behind [`PanelView`]; this module only decides what
//! the card shows and when it is swapped.

use serde::Serialize;

use crate::points::{POINTS, PointOfInterest};

/// Boarding-pass card for one point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardingPass {
    pub code: &'static str,
    pub city: &'static str,
    pub description: &'static str,
    pub gate: String,
    pub seat: String,
    pub zone: u32,
}

impl BoardingPass {
    /// Gate, seat and zone are decoration derived from the coordinates so
    /// they stay stable per city.
    pub fn for_point(point: &PointOfInterest) -> Self {
        let lat = point.lat.floor() as i64;
        let lng = point.lng.floor() as i64;
        let sum = (point.lat + point.lng).floor() as i64;

        let row = (lat.unsigned_abs() % 20) + 1;
        let letter = char::from(b'A' + (lng.unsigned_abs() % 6) as u8);

        Self {
            code: point.code(),
            city: point.name,
            description: point.description,
            gate: format!("A{}", sum.unsigned_abs() % 9 + 1),
            seat: format!("{letter}{row}"),
            zone: (sum.unsigned_abs() % 3 + 1) as u32,
        }
    }
}

/// One radio button of the city selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorButton {
    pub label: &'static str,
    pub name: &'static str,
    pub checked: bool,
}

/// One button per point, with only `active` checked.
pub fn selector_buttons(active: Option<usize>) -> Vec<SelectorButton> {
    POINTS
        .iter()
        .enumerate()
        .map(|(idx, p)| SelectorButton {
            label: p.short_label(),
            name: p.name,
            checked: active == Some(idx),
        })
        .collect()
}

/// Hover tooltip content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub title: &'static str,
    pub body: &'static str,
}

impl Tooltip {
    pub fn for_point(point: &PointOfInterest) -> Self {
        Self {
            title: point.name,
            body: point.description,
        }
    }
}

pub trait PanelView {
    fn render_card(&mut self, pass: &BoardingPass);
    fn render_selector(&mut self, buttons: &[SelectorButton]);
    /// Moves the checked mark without rebuilding the selector.
    fn set_checked(&mut self, index: usize);
    fn play_card_exit(&mut self);
    fn play_card_enter(&mut self);
    fn show_tooltip(&mut self, tooltip: Option<&Tooltip>);
}

/// Card swap driven by the view's animation-end events.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum CardTransition {
    #[default]
    Idle,
    Exiting {
        pending: usize,
    },
    Entering,
}

impl CardTransition {
    /// Starts (or retargets) an exit toward `pending`. Returns true when
    /// the exit animation has to be started.
    pub fn begin(&mut self, pending: usize) -> bool {
        let was_exiting = matches!(self, CardTransition::Exiting { .. });
        *self = CardTransition::Exiting { pending };
        !was_exiting
    }

    /// Advances on animation end. Returns the card to render when the exit
    /// just finished.
    pub fn on_animation_end(&mut self) -> Option<usize> {
        match *self {
            CardTransition::Exiting { pending } => {
                *self = CardTransition::Entering;
                Some(pending)
            }
            CardTransition::Entering => {
                *self = CardTransition::Idle;
                None
            }
            CardTransition::Idle => None,
        }
    }
}
