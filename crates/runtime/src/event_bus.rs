use std::collections::VecDeque;

use foundation::time::Millis;

/// Minimal event type for traceability.
///
/// Structured text stamped with the instant it was emitted; tests and the
/// CLI read it back to see what a sequence actually did.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub at: Millis,
    pub kind: &'static str,
    pub message: String,
}

/// Append-only event log, optionally bounded (oldest events are dropped).
#[derive(Debug, Default)]
pub struct EventBus {
    events: VecDeque<Event>,
    max_len: Option<usize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounded(max_len: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_len.min(256)),
            max_len: Some(max_len.max(1)),
        }
    }

    pub fn emit(&mut self, at: Millis, kind: &'static str, message: impl Into<String>) {
        if let Some(max) = self.max_len {
            while self.events.len() >= max {
                self.events.pop_front();
            }
        }
        self.events.push_back(Event {
            at,
            kind,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }
}
