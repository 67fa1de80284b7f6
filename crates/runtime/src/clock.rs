use std::cell::Cell;

use foundation::time::Millis;

/// Source of "now" for anything that schedules work.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Deterministic clock advanced by hand.
///
/// This is the primary timebase for tests and offline tooling. It is
/// intentionally not wall-clock driven so it can be recorded and replayed.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Cell<Millis>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: f64) -> Self {
        Self {
            now: Cell::new(Millis(ms)),
        }
    }

    /// Moves time forward by `ms` and returns the new instant.
    pub fn advance(&self, ms: f64) -> Millis {
        let next = Millis(self.now.get().0 + ms.max(0.0));
        self.now.set(next);
        next
    }

    /// Jumps to `t`. Time never moves backwards.
    pub fn set(&self, t: Millis) {
        if t.0 > self.now.get().0 {
            self.now.set(t);
        }
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}
