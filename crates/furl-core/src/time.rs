//! Frame time sources.
//!
//! The engine asks its source for "now" once per pass and converts it to
//! milliseconds since the engine was created. Hosts use [`WallTime`]; tests use
//! [`ManualTime`] and advance it explicitly.

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

pub trait TimeSource: 'static {
    fn now(&self) -> Instant;
}

pub struct WallTime;

impl TimeSource for WallTime {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A time source you can drive deterministically. Clones share the same instant.
#[derive(Clone)]
pub struct ManualTime {
    t: Rc<Cell<Instant>>,
}

impl Default for ManualTime {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTime {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(t: Instant) -> Self {
        Self {
            t: Rc::new(Cell::new(t)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set(&self, t: Instant) {
        self.t.set(t);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Instant {
        self.t.get()
    }
}
