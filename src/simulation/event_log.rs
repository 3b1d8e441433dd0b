//! Bounded history of notable episode events, newest first.
//!
//! Presenters read it through [`Frame::events`](super::presentation::Frame);
//! the simulator itself never looks back at it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Events kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 20;

/// One entry of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Tick on which the event was applied
    pub tick: u64,
    /// Short human-readable line
    pub description: String,
    /// What happened
    pub kind: EventKind,
}

/// Kinds of logged events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A flyer hit an obstacle
    Collision,
    /// A flyer hit the floor or flew off the top
    OutOfBounds,
    /// An obstacle was passed and the score went up
    Pass,
    /// An obstacle scrolled off screen
    Despawn,
}

/// Ring of the most recent events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LoggedEvent>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl EventLog {
    /// Creates a log that keeps at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records an event, evicting the oldest one when full.
    pub fn log(&mut self, tick: u64, description: impl Into<String>, kind: EventKind) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(LoggedEvent {
            tick,
            description: description.into(),
            kind,
        });
    }

    /// All retained events, newest first.
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.entries
    }

    /// Events applied on `tick`.
    pub fn on_tick(&self, tick: u64) -> impl Iterator<Item = &LoggedEvent> {
        self.entries.iter().take_while(move |e| e.tick == tick)
    }

    /// Number of retained events of one kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
