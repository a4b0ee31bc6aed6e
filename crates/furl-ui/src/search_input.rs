//! The search field's own animations: its right margin opens room for the
//! cancel button, which slides in from the right.
//!
//! Each value is a single interpolation whose endpoints flip with the local
//! focus, so toggling focus mid-flight retargets instead of restarting.

use furl_core::{CellId, ClockId, Engine, OutputId, cond, eq, run_timing_with};

use crate::config::HeaderConfig;
use crate::error::Result;
use crate::host::TextFieldHost;
use crate::state::FocusState;

pub struct SearchInput {
    focus: CellId,
    parent_focus: CellId,
    margin_clock: ClockId,
    cancel_clock: ClockId,
    margin_right: OutputId,
    cancel_translate_x: OutputId,
}

impl SearchInput {
    /// Builds the input's graph. `parent_focus` is the header's focus cell and
    /// is written together with the local one.
    pub fn new(engine: &mut Engine, config: &HeaderConfig, parent_focus: CellId) -> Self {
        let focus = engine.create_cell("input.focus", FocusState::Unset.code());
        let margin_clock = engine.create_clock("input.margin");
        let cancel_clock = engine.create_clock("input.cancel");

        let focused = eq(focus, FocusState::Focused.code());
        let unset = eq(focus, FocusState::Unset.code());

        let margin = run_timing_with(
            engine,
            margin_clock,
            cond(&focused, config.margin_idle, config.margin_focused),
            cond(&focused, config.margin_focused, config.margin_idle),
            None,
            config.timing,
        );
        let margin_right =
            engine.register_output("input.margin_right", cond(&unset, config.margin_idle, margin));

        let cancel = run_timing_with(
            engine,
            cancel_clock,
            cond(&focused, config.cancel_hidden, config.cancel_shown),
            cond(&focused, config.cancel_shown, config.cancel_hidden),
            None,
            config.timing,
        );
        let cancel_translate_x = engine.register_output(
            "input.cancel_translate_x",
            cond(&unset, config.cancel_hidden, cancel),
        );

        Self {
            focus,
            parent_focus,
            margin_clock,
            cancel_clock,
            margin_right,
            cancel_translate_x,
        }
    }

    pub fn handle_focus(&self, engine: &mut Engine) -> Result<()> {
        let code = FocusState::Focused.code();
        engine.dispatch(&[(self.focus, code), (self.parent_focus, code)])?;
        Ok(())
    }

    /// Blurs the field (forcing `field` to drop focus first when given) and
    /// writes `Blurred` into both focus cells in one pass.
    ///
    /// A blur without a preceding focus only forwards to `field`: hosts report
    /// a blur of their own after [`TextFieldHost::blur`], and that echo must
    /// not disturb an expansion already in flight.
    pub fn handle_blur(
        &self,
        engine: &mut Engine,
        field: Option<&mut dyn TextFieldHost>,
    ) -> Result<()> {
        if let Some(field) = field {
            field.blur();
        }
        if self.focus(engine)? != FocusState::Focused {
            log::trace!("input: blur while not focused, ignored");
            return Ok(());
        }
        let code = FocusState::Blurred.code();
        engine.dispatch(&[(self.focus, code), (self.parent_focus, code)])?;
        Ok(())
    }

    pub fn focus(&self, engine: &Engine) -> Result<FocusState> {
        Ok(FocusState::from_code(engine.read(self.focus)?))
    }

    pub fn margin_right(&self, engine: &Engine) -> Result<f32> {
        Ok(engine.output(self.margin_right)?)
    }

    pub fn cancel_translate_x(&self, engine: &Engine) -> Result<f32> {
        Ok(engine.output(self.cancel_translate_x)?)
    }

    pub fn is_animating(&self, engine: &Engine) -> Result<bool> {
        Ok(engine.is_clock_running(self.margin_clock)?
            || engine.is_clock_running(self.cancel_clock)?)
    }
}
