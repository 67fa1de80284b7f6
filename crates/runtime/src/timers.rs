//! Deterministic one-shot timer queue.
//!
//! Stands in for chains of `setTimeout` callbacks: callers schedule payloads
//! at absolute instants and the host drains whatever is due when it ticks.
//!
//! Key properties:
//! - Total ordering on `(due, id)`.
//! - Timers due at the same instant fire in scheduling order.
//! - Restarting a sequence cancels everything still pending in one call.
//!
//! This is intentionally simple (Vec-backed); a sequence holds a handful of
//! timers at most.

use foundation::time::Millis;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    due: Millis,
    payload: T,
}

impl<T> Timer<T> {
    fn fires_before(&self, other: &Timer<T>) -> bool {
        self.due
            .total_cmp(&other.due)
            .then_with(|| self.id.cmp(&other.id))
            .is_lt()
    }
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn schedule(&mut self, due: Millis, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.timers.push(Timer { id, due, payload });
        id
    }

    /// Cancels every pending timer and returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.timers.len();
        self.timers.clear();
        n
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.earliest().map(|idx| self.timers[idx].due)
    }

    /// Pops the earliest timer whose due instant is `<= now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerId, Millis, T)> {
        let idx = self.earliest()?;
        if self.timers[idx].due.total_cmp(&now).is_gt() {
            return None;
        }
        let timer = self.timers.remove(idx);
        Some((timer.id, timer.due, timer.payload))
    }

    fn earliest(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, timer) in self.timers.iter().enumerate() {
            match best {
                None => best = Some(idx),
                Some(b) => {
                    if timer.fires_before(&self.timers[b]) {
                        best = Some(idx);
                    }
                }
            }
        }
        best
    }
}
