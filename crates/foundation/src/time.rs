use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A point on the host's monotonic timeline, in milliseconds.
///
/// In the browser this is `performance.now()`; in tests and tools it comes
/// from a virtual clock so runs can be replayed.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Millis(pub f64);

impl Millis {
    pub fn after(self, offset_ms: u64) -> Self {
        Millis(self.0 + offset_ms as f64)
    }

    /// Milliseconds elapsed since `earlier`, clamped at zero.
    pub fn since(self, earlier: Millis) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    /// Total ordering, with NaN sorted last.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
