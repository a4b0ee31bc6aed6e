use slotmap::{SlotMap, new_key_type};
use web_time::Instant;

use crate::error::{GraphError, Result};

new_key_type! {
    /// Handle to a start/stop animation clock.
    pub struct ClockId;
}

#[derive(Clone, Debug)]
pub struct ClockState {
    pub name: String,
    pub running: bool,
    /// Frame instant of the current run; `None` while stopped.
    pub started_at: Option<Instant>,
}

#[derive(Default)]
pub struct ClockStore {
    clocks: SlotMap<ClockId, ClockState>,
}

impl ClockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, name: impl Into<String>) -> ClockId {
        self.clocks.insert(ClockState {
            name: name.into(),
            running: false,
            started_at: None,
        })
    }

    /// Starts the clock; returns `false` if it was already running.
    pub fn start(&mut self, id: ClockId, now: Instant) -> Result<bool> {
        let clock = self.clocks.get_mut(id).ok_or(GraphError::UnknownClock(id))?;
        if clock.running {
            return Ok(false);
        }
        clock.running = true;
        clock.started_at = Some(now);
        log::debug!("clock `{}` started", clock.name);
        Ok(true)
    }

    /// Stops the clock; returns `false` if it was not running.
    pub fn stop(&mut self, id: ClockId) -> Result<bool> {
        let clock = self.clocks.get_mut(id).ok_or(GraphError::UnknownClock(id))?;
        if !clock.running {
            return Ok(false);
        }
        clock.running = false;
        clock.started_at = None;
        log::debug!("clock `{}` stopped", clock.name);
        Ok(true)
    }

    pub fn is_running(&self, id: ClockId) -> Result<bool> {
        self.clocks
            .get(id)
            .map(|c| c.running)
            .ok_or(GraphError::UnknownClock(id))
    }

    /// Milliseconds between the clock's start and `now`; `0` while stopped.
    ///
    /// Measured from the start of the run rather than a global epoch, so the
    /// `f32` result keeps sub-millisecond precision however long the host has
    /// been up.
    pub fn elapsed_ms(&self, id: ClockId, now: Instant) -> Result<f32> {
        let clock = self.clocks.get(id).ok_or(GraphError::UnknownClock(id))?;
        Ok(match clock.started_at {
            Some(start) => {
                (now.saturating_duration_since(start).as_micros() as f64 / 1000.0) as f32
            }
            None => 0.0,
        })
    }

    pub fn get(&self, id: ClockId) -> Option<&ClockState> {
        self.clocks.get(id)
    }

    pub fn any_running(&self) -> bool {
        self.clocks.values().any(|c| c.running)
    }
}
