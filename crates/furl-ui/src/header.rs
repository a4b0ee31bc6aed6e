//! # Collapsing search header
//!
//! The header shrinks from `big_header_height` toward `collapsed_header_height`
//! as the list scrolls, collapses fully when the search field gains focus and
//! expands back when it loses it. Everything runs on one [`Engine`]:
//!
//! ```text
//! current = big - scroll
//! clamped = max(current, floor)
//!
//! height  = switch classify(focus, current, armed, floor)
//!             Collapsing => timing(clamped -> floor), then armed = Back,
//!                                                      last_scroll = floor + scroll
//!             Collapsed  => floor
//!             Expanding  => timing(floor -> clamped), then armed = Forward,
//!                                                      focus = Unset
//!             Tracking   => clamped
//!
//! padding = focus == Unset  => big
//!           clock running   => height + scroll
//!           otherwise       => last_scroll
//! ```
//!
//! Collapse and expansion share one clock; only one of them can be armed at a
//! time. If the active animation is cut off by a phase change (blurring
//! mid-collapse, focusing mid-expansion, scrolling past the floor) its clock is
//! stopped, so the next animation cold-starts from the current height.
//!
//! Tracking never leaves a focus behind: a blurred header there returns to
//! `Unset`, and focusing a header that is already at or below the floor counts
//! as a finished collapse (armed `Back`, scroll snapshot taken).

use std::cell::Cell;
use std::rc::Rc;

use furl_core::{
    CellId, ClockId, Engine, EventBinding, Exported, NativeEvent, OutputId, PassTrigger,
    TimeSource, add, and, block, cell, clock_running, cond, constant, effects, eq, map, max,
    output, run_timing_with, set, stop_clock, sub, switch,
};

use crate::config::HeaderConfig;
use crate::error::Result;
use crate::host::{HeaderOutputs, ScrollHost, TextFieldHost};
use crate::search_input::SearchInput;
use crate::state::{Armed, FocusState, HeaderPhase, phase_index};

/// Event path carrying the vertical scroll offset.
pub const CONTENT_OFFSET_Y: &str = "contentOffset.y";

/// Cells owned by the header.
#[derive(Clone, Copy, Debug)]
pub struct HeaderCells {
    pub scroll: CellId,
    pub focus: CellId,
    pub armed: CellId,
    /// `floor + scroll` when the header last settled at the floor.
    pub last_scroll: CellId,
}

pub struct SearchHeader {
    engine: Engine,
    config: HeaderConfig,
    cells: HeaderCells,
    height_clock: ClockId,
    height: OutputId,
    padding_top: OutputId,
    input: SearchInput,
    scroll_binding: EventBinding,
    scroll_position: Exported,
    phase: Rc<Cell<HeaderPhase>>,
    pending_scroll: Option<f32>,
}

impl SearchHeader {
    /// Validates `config`, builds the graph and runs the initial pass.
    pub fn new(config: HeaderConfig, time: impl TimeSource) -> Result<Self> {
        config.validate()?;
        let mut engine = Engine::new(time);

        let big = config.big_header_height;
        let floor = config.collapsed_header_height;

        let cells = HeaderCells {
            scroll: engine.create_cell("header.scroll", 0.0),
            focus: engine.create_cell("header.focus", FocusState::Unset.code()),
            armed: engine.create_cell("header.armed", Armed::Forward.code()),
            last_scroll: engine.create_cell("header.last_scroll", 0.0),
        };
        let height_clock = engine.create_clock("header.height");

        let current = sub(big, cells.scroll);
        let clamped = max(&current, floor);
        let running = clock_running(height_clock);

        let collapse = run_timing_with(
            &mut engine,
            height_clock,
            &clamped,
            floor,
            Some(effects(vec![
                set(cells.armed, Armed::Back.code()),
                set(cells.last_scroll, add(floor, cells.scroll)),
            ])),
            config.timing,
        );
        let expand = run_timing_with(
            &mut engine,
            height_clock,
            floor,
            &clamped,
            Some(effects(vec![
                set(cells.armed, Armed::Forward.code()),
                set(cells.focus, FocusState::Unset.code()),
            ])),
            config.timing,
        );

        // An animation cut off by a phase change.
        let settle_collapsed = cond(
            &running,
            effects(vec![
                stop_clock(height_clock),
                set(cells.last_scroll, add(floor, cells.scroll)),
            ]),
            0.0,
        );
        // Tracking holds no animation. A blurred header here never finished
        // collapsing and goes back to idle; a focused one is at or below the
        // floor already and counts as collapsed.
        let settle_tracking = effects(vec![
            cond(&running, stop_clock(height_clock), 0.0),
            cond(
                eq(cells.focus, FocusState::Blurred.code()),
                set(cells.focus, FocusState::Unset.code()),
                0.0,
            ),
            cond(
                and(
                    eq(cells.focus, FocusState::Focused.code()),
                    eq(cells.armed, Armed::Forward.code()),
                ),
                effects(vec![
                    set(cells.armed, Armed::Back.code()),
                    set(cells.last_scroll, add(floor, cells.scroll)),
                ]),
                0.0,
            ),
        ]);

        let phase_node = map(
            vec![cell(cells.focus), current, cell(cells.armed), constant(floor)],
            phase_index,
        );
        // Arms in `HeaderPhase::index` order.
        let arms = vec![
            collapse,
            block(vec![settle_collapsed], floor),
            expand,
            block(vec![settle_tracking], &clamped),
        ];
        let height = engine.register_output("header.height", switch(phase_node, arms));

        let padding_top = engine.register_output(
            "header.padding_top",
            cond(
                eq(cells.focus, FocusState::Unset.code()),
                big,
                cond(&running, add(output(height), cells.scroll), cells.last_scroll),
            ),
        );

        let input = SearchInput::new(&mut engine, &config, cells.focus);
        let scroll_binding = EventBinding::new().bind(CONTENT_OFFSET_Y, cells.scroll);

        let scroll_position = Exported::new(0.0);
        let exported = scroll_position.clone();
        engine.observe(&[cells.scroll], move |v| {
            if let Some(&y) = v.first() {
                exported.set(y);
            }
        });

        let phase = Rc::new(Cell::new(HeaderPhase::Tracking));
        let last_phase = phase.clone();
        engine.observe(&[cells.focus, cells.scroll, cells.armed], move |v| {
            let &[focus, scroll, armed] = v else { return };
            let next = HeaderPhase::classify(
                FocusState::from_code(focus),
                big - scroll,
                Armed::from_code(armed),
                floor,
            );
            let prev = last_phase.replace(next);
            if prev != next {
                log::debug!("header: {prev:?} -> {next:?}");
            }
        });

        engine.run_pass(PassTrigger::INITIAL)?;

        Ok(Self {
            engine,
            config,
            cells,
            height_clock,
            height,
            padding_top,
            input,
            scroll_binding,
            scroll_position,
            phase,
            pending_scroll: None,
        })
    }

    pub fn on_scroll(&mut self, offset: f32) -> Result<()> {
        self.on_scroll_event(&NativeEvent::new().with(CONTENT_OFFSET_Y, offset))
    }

    /// Feeds a raw scroll event; only `contentOffset.y` is read.
    pub fn on_scroll_event(&mut self, event: &NativeEvent) -> Result<()> {
        self.scroll_binding.dispatch(&mut self.engine, event)?;
        Ok(())
    }

    pub fn on_focus(&mut self) -> Result<()> {
        self.input.handle_focus(&mut self.engine)
    }

    /// Organic blur reported by the text field.
    pub fn on_blur(&mut self) -> Result<()> {
        self.input.handle_blur(&mut self.engine, None)
    }

    /// Cancel button: force `field` to drop focus, then blur.
    pub fn on_cancel(&mut self, field: &mut dyn TextFieldHost) -> Result<()> {
        self.input.handle_blur(&mut self.engine, Some(field))
    }

    /// Drag release on the list.
    ///
    /// Snapping the header to the floor past a drag threshold is not
    /// implemented; without a defined threshold this hook does nothing.
    pub fn on_scroll_end_drag(&mut self) {
        log::trace!(
            "header: drag released at {}, no snap",
            self.scroll_position.get()
        );
    }

    /// Requests a list scroll. The request is held until the host's next frame
    /// callback hands it over with [`flush_scroll`](Self::flush_scroll); a
    /// newer request replaces an unflushed one.
    pub fn scroll_to(&mut self, offset: f32) {
        if let Some(prev) = self.pending_scroll.replace(offset) {
            log::debug!("header: scroll_to({offset}) replaces pending scroll_to({prev})");
        }
    }

    pub fn flush_scroll(&mut self, host: &mut dyn ScrollHost) -> bool {
        match self.pending_scroll.take() {
            Some(offset) => {
                host.scroll_to(offset);
                true
            }
            None => false,
        }
    }

    /// True while an animation runs, an output is stale or a scroll request
    /// waits for a frame.
    pub fn needs_frame(&self) -> bool {
        self.engine.needs_frame() || self.pending_scroll.is_some()
    }

    pub fn frame(&mut self) -> Result<()> {
        self.engine.frame()?;
        Ok(())
    }

    pub fn outputs(&self) -> Result<HeaderOutputs> {
        Ok(HeaderOutputs {
            header_height: self.engine.output(self.height)?,
            content_padding_top: self.engine.output(self.padding_top)?,
            input_margin_right: self.input.margin_right(&self.engine)?,
            cancel_translate_x: self.input.cancel_translate_x(&self.engine)?,
        })
    }

    /// Phase as of the latest pass.
    pub fn phase(&self) -> HeaderPhase {
        self.phase.get()
    }

    pub fn focus(&self) -> Result<FocusState> {
        Ok(FocusState::from_code(self.engine.read(self.cells.focus)?))
    }

    pub fn armed(&self) -> Result<Armed> {
        Ok(Armed::from_code(self.engine.read(self.cells.armed)?))
    }

    pub fn should_animate_forward(&self) -> Result<bool> {
        Ok(self.armed()? == Armed::Forward)
    }

    pub fn should_animate_back(&self) -> Result<bool> {
        Ok(self.armed()? == Armed::Back)
    }

    pub fn last_scroll(&self) -> Result<f32> {
        Ok(self.engine.read(self.cells.last_scroll)?)
    }

    pub fn is_animating(&self) -> Result<bool> {
        Ok(self.engine.is_clock_running(self.height_clock)?)
    }

    /// Scroll offset as of the latest pass. Informational only: the graph
    /// reads the scroll cell directly.
    pub fn scroll_position(&self) -> f32 {
        self.scroll_position.get()
    }

    /// Shared handle to the exported scroll offset.
    pub fn scroll_position_handle(&self) -> Exported {
        self.scroll_position.clone()
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    pub fn cells(&self) -> HeaderCells {
        self.cells
    }

    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}
