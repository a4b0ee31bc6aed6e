//! # Timing interpolation
//!
//! [`run_timing`] builds a sub-graph that moves a value from `from` to `to`
//! over a fixed duration, driven by a [`ClockId`]:
//!
//! - clock idle: reset the session (`finished = 0`, `position = from`,
//!   `frameTime = 0`), store `to`, start the clock;
//! - clock running: only store `to`. This is the retarget path; elapsed time is
//!   kept and the remaining distance is rescaled so position stays continuous;
//! - every evaluation advances the session by the elapsed frame time;
//! - once `finished` is set, `on_finish` runs and the clock stops, both within
//!   the same evaluation.
//!
//! The node yields the session position.

use web_time::Duration;

use crate::engine::Engine;
use crate::error::Result;
use crate::node::{
    IntoNode, Node, NodeRef, block, cell, clock_running, clock_time, cond, constant, effects, set,
    start_clock, stop_clock,
};
use crate::{CellId, ClockId, Easing};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(450),
            easing: Easing::QUINTIC_IN_OUT,
        }
    }
}

impl TimingConfig {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    pub fn linear(duration: Duration) -> Self {
        Self::new(duration, Easing::Linear)
    }

    pub fn duration_ms(&self) -> f32 {
        (self.duration.as_micros() as f64 / 1000.0) as f32
    }
}

/// State cells owned by one `run_timing` call. Never shared between calls.
#[derive(Clone, Copy, Debug)]
pub struct TimingSession {
    pub clock: ClockId,
    pub finished: CellId,
    pub position: CellId,
    /// Clock time of the last step.
    pub time: CellId,
    /// Elapsed animation time.
    pub frame_time: CellId,
    pub to_value: CellId,
    pub config: TimingConfig,
}

impl TimingSession {
    pub fn new(engine: &mut Engine, clock: ClockId, name: &str, config: TimingConfig) -> Self {
        Self {
            clock,
            finished: engine.create_cell(format!("{name}.finished"), 0.0),
            position: engine.create_cell(format!("{name}.position"), 0.0),
            time: engine.create_cell(format!("{name}.time"), 0.0),
            frame_time: engine.create_cell(format!("{name}.frame_time"), 0.0),
            to_value: engine.create_cell(format!("{name}.to_value"), 0.0),
            config,
        }
    }

    pub fn cells(&self) -> [CellId; 5] {
        [
            self.finished,
            self.position,
            self.time,
            self.frame_time,
            self.to_value,
        ]
    }

    /// One timing step at clock time `now_ms`.
    pub(crate) fn step(&self, engine: &mut Engine, now_ms: f32) -> Result<f32> {
        let position = engine.read(self.position)?;
        let to = engine.read(self.to_value)?;
        let frame_time = engine.read(self.frame_time)?;
        let last = engine.read(self.time)?;

        let duration = self.config.duration_ms();
        let new_frame_time = frame_time + (now_ms - last).max(0.0);

        let next = if duration <= 0.0 || new_frame_time >= duration {
            log::debug!(
                "timing on clock `{}` finished at {to}",
                engine.clock_name(self.clock).unwrap_or("?")
            );
            engine.write(self.finished, 1.0)?;
            to
        } else {
            let progress = self.config.easing.apply(frame_time / duration);
            let next_progress = self.config.easing.apply(new_frame_time / duration);
            // Rescale so that the curve passes through the current position at
            // the current progress and ends at `to`.
            let remaining = 1.0 - progress;
            let full = if remaining > f32::EPSILON {
                (to - position) / remaining
            } else {
                to - position
            };
            to - full * (1.0 - next_progress)
        };

        engine.write(self.position, next)?;
        engine.write(self.frame_time, new_frame_time)?;
        engine.write(self.time, now_ms)?;
        Ok(next)
    }
}

/// `run_timing` with the default 450ms ease-in-out quintic config.
pub fn run_timing(
    engine: &mut Engine,
    clock: ClockId,
    from: impl IntoNode,
    to: impl IntoNode,
    on_finish: Option<NodeRef>,
) -> NodeRef {
    run_timing_with(engine, clock, from, to, on_finish, TimingConfig::default())
}

pub fn run_timing_with(
    engine: &mut Engine,
    clock: ClockId,
    from: impl IntoNode,
    to: impl IntoNode,
    on_finish: Option<NodeRef>,
    config: TimingConfig,
) -> NodeRef {
    let name = engine
        .clock_name(clock)
        .map(|n| format!("{n}.timing"))
        .unwrap_or_else(|| "timing".to_string());
    let session = TimingSession::new(engine, clock, &name, config);
    let to = to.into_node();

    let on_finished = match on_finish {
        Some(cb) => effects(vec![cb, stop_clock(clock)]),
        None => stop_clock(clock),
    };

    block(
        vec![
            cond(
                clock_running(clock),
                set(session.to_value, to.clone()),
                effects(vec![
                    set(session.finished, 0.0),
                    set(session.time, clock_time(clock)),
                    set(session.position, from),
                    set(session.frame_time, 0.0),
                    set(session.to_value, to),
                    start_clock(clock),
                ]),
            ),
            std::rc::Rc::new(Node::TimingStep(session)),
            cond(cell(session.finished), on_finished, constant(0.0)),
        ],
        cell(session.position),
    )
}
