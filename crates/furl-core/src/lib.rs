//! # Cells, clocks, and frame passes
//!
//! Furl animates with a small dataflow graph instead of per-frame imperative
//! code. There are four pieces:
//!
//! - cells: mutable scalars, the only mutable state a graph has;
//! - clocks: start/stop switches that keep frames coming while they run;
//! - nodes: an immutable expression graph built once per component;
//! - the [`Engine`]: evaluates registered outputs once per event and once per
//!   frame while a clock runs.
//!
//! ## Building a graph
//!
//! ```rust
//! use furl_core::*;
//!
//! let time = ManualTime::new();
//! let mut engine = Engine::new(time.clone());
//!
//! let open = engine.create_cell("open", 0.0);
//! let clock = engine.create_clock("slide");
//!
//! // Slide 0 -> 100 while `open`, back to 0 otherwise.
//! let slide = run_timing(
//!     &mut engine,
//!     clock,
//!     cond(open, 0.0, 100.0),
//!     cond(open, 100.0, 0.0),
//!     None,
//! );
//! let x = engine.register_output("x", cond(eq(open, 1.0), slide, 0.0));
//!
//! engine.run_pass(PassTrigger::INITIAL).unwrap();
//! engine.dispatch(&[(open, 1.0)]).unwrap();
//!
//! time.advance_ms(450);
//! engine.frame().unwrap();
//! assert_eq!(engine.output(x).unwrap(), 100.0);
//! ```
//!
//! ## Timing
//!
//! [`run_timing`] turns a destination into an eased, clock-driven transition.
//! Calling it again while its clock runs retargets the animation without a
//! jump; its completion node runs exactly once per start-to-finish cycle.
//!
//! ## Exporting values
//!
//! Imperative code that needs a graph value (for example a scroll snap) should
//! register an observer with [`Engine::observe`] and copy the value into an
//! [`Exported`] handle, rather than reading cells behind the engine's back.

pub mod cell;
pub mod clock;
pub mod easing;
pub mod engine;
pub mod error;
pub mod event;
pub mod export;
pub mod node;
pub mod time;
pub mod timing;

pub use cell::{CellId, CellStore};
pub use clock::{ClockId, ClockState, ClockStore};
pub use easing::Easing;
pub use engine::{Engine, ObserverId, OutputId, PassReport, PassTrigger};
pub use error::{GraphError, Result};
pub use event::{EventBinding, NativeEvent};
pub use export::Exported;
pub use node::*;
pub use time::{ManualTime, TimeSource, WallTime};
pub use timing::{TimingConfig, TimingSession, run_timing, run_timing_with};
