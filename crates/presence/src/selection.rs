use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marker tint for the selected point: idle, moving, or held in focus.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPhase {
    #[default]
    Red,
    Orange,
    Green,
}

impl ColorPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorPhase::Red => "red",
            ColorPhase::Orange => "orange",
            ColorPhase::Green => "green",
        }
    }
}

impl fmt::Display for ColorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(ColorPhase::Red),
            "orange" => Ok(ColorPhase::Orange),
            "green" => Ok(ColorPhase::Green),
            other => Err(format!("unknown color phase: {other}")),
        }
    }
}

/// What the user picked and how the selected marker is tinted.
///
/// `current` indexes [`crate::points::POINTS`]. `saved_auto_rotate` is the
/// rotation setting to restore when the running sequence ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub current: Option<usize>,
    pub color_phase: ColorPhase,
    pub saved_auto_rotate: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            current: None,
            color_phase: ColorPhase::Red,
            saved_auto_rotate: true,
        }
    }
}
