//! # Frame evaluator
//!
//! [`Engine`] owns the cells, clocks and registered outputs of one component
//! instance and re-evaluates the outputs in passes:
//!
//! - an EVENT pass runs right after a host event wrote its cells
//!   ([`Engine::dispatch`]);
//! - a FRAME pass runs once per animation frame while a clock is running or an
//!   output is stale ([`Engine::frame`]).
//!
//! A pass only evaluates stale outputs. An output goes stale when
//!
//! - a cell it reads is changed by anyone but itself,
//! - a clock it reads is running at the start of the pass, or
//! - an output it reads through [`output`](crate::node::output) is stale.
//!
//! An output's writes to its own inputs (timing state, completion callbacks)
//! never make it stale again, so a finished interpolation keeps its final
//! value until something outside it changes.
//!
//! Passes need `&mut Engine`, so two passes can never overlap.

use std::collections::HashMap;

use bitflags::bitflags;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use web_time::Instant;

use crate::cell::{CellStore, flag, truthy};
use crate::clock::ClockStore;
use crate::error::{GraphError, Result};
use crate::node::{BinaryOp, Dependencies, Node, NodeRef};
use crate::time::{TimeSource, WallTime};
use crate::{CellId, ClockId};

new_key_type! {
    /// Handle to a registered output.
    pub struct OutputId;
    /// Handle to a registered observer.
    pub struct ObserverId;
}

bitflags! {
    /// Why a pass ran.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PassTrigger: u8 {
        const INITIAL = 1;
        const EVENT = 1 << 1;
        const FRAME = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PassReport {
    pub pass: u64,
    pub trigger: PassTrigger,
    /// Ms since the engine was created.
    pub now_ms: f64,
    /// Outputs re-evaluated in this pass.
    pub evaluated: usize,
    /// Whether a clock is still running after the pass.
    pub clocks_running: bool,
}

struct OutputSlot {
    name: String,
    node: NodeRef,
    deps: Dependencies,
    value: f32,
    dirty: bool,
    evaluated_in: u64,
}

struct Observer {
    cells: SmallVec<[CellId; 4]>,
    callback: Box<dyn FnMut(&[f32])>,
}

pub struct Engine {
    cells: CellStore,
    clocks: ClockStore,
    outputs: SlotMap<OutputId, OutputSlot>,
    order: Vec<OutputId>,
    // cell -> outputs that read it
    readers: HashMap<CellId, SmallVec<[OutputId; 4]>>,
    observers: SlotMap<ObserverId, Observer>,
    time: Box<dyn TimeSource>,
    epoch: Instant,
    // frame instant of the current pass
    now: Instant,
    now_ms: f64,
    pass: u64,
    // outputs currently being evaluated, innermost last
    evaluating: SmallVec<[OutputId; 4]>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(WallTime)
    }
}

impl Engine {
    pub fn new(time: impl TimeSource) -> Self {
        let epoch = time.now();
        Self {
            cells: CellStore::new(),
            clocks: ClockStore::new(),
            outputs: SlotMap::with_key(),
            order: Vec::new(),
            readers: HashMap::new(),
            observers: SlotMap::with_key(),
            time: Box::new(time),
            epoch,
            now: epoch,
            now_ms: 0.0,
            pass: 0,
            evaluating: SmallVec::new(),
        }
    }

    pub fn create_cell(&mut self, name: impl Into<String>, initial: f32) -> CellId {
        self.cells.create(name, initial)
    }

    pub fn create_clock(&mut self, name: impl Into<String>) -> ClockId {
        self.clocks.create(name)
    }

    pub fn read(&self, cell: CellId) -> Result<f32> {
        self.cells.read(cell)
    }

    /// Writes a cell. Outputs reading it go stale, except the output doing the
    /// writing. Does not run a pass.
    pub fn write(&mut self, cell: CellId, value: f32) -> Result<()> {
        if self.cells.write(cell, value)? {
            self.mark_readers(cell);
        }
        Ok(())
    }

    /// Writes all cells of one host event, then runs a single EVENT pass.
    pub fn dispatch(&mut self, writes: &[(CellId, f32)]) -> Result<PassReport> {
        for &(cell, value) in writes {
            self.write(cell, value)?;
        }
        self.run_pass(PassTrigger::EVENT)
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    pub fn clocks(&self) -> &ClockStore {
        &self.clocks
    }

    pub fn is_clock_running(&self, clock: ClockId) -> Result<bool> {
        self.clocks.is_running(clock)
    }

    pub fn clock_name(&self, clock: ClockId) -> Option<&str> {
        self.clocks.get(clock).map(|c| c.name.as_str())
    }

    /// Frame time of the latest pass, in ms since the engine was created.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn pass_count(&self) -> u64 {
        self.pass
    }

    /// Registers a node as an output. It is evaluated on the next pass and then
    /// whenever it goes stale. Outputs are evaluated in registration order; a
    /// node can only reference outputs registered before it, so output
    /// references never form a cycle.
    pub fn register_output(&mut self, name: impl Into<String>, node: NodeRef) -> OutputId {
        let deps = Dependencies::of(&node);
        let name = name.into();
        let id = self.outputs.insert(OutputSlot {
            name,
            node,
            deps,
            value: 0.0,
            dirty: true,
            evaluated_in: 0,
        });
        for &cell in &self.outputs[id].deps.cells {
            self.readers.entry(cell).or_default().push(id);
        }
        self.order.push(id);
        id
    }

    /// Latest value of an output.
    pub fn output(&self, id: OutputId) -> Result<f32> {
        self.outputs
            .get(id)
            .map(|o| o.value)
            .ok_or(GraphError::UnknownOutput(id))
    }

    pub fn output_name(&self, id: OutputId) -> Option<&str> {
        self.outputs.get(id).map(|o| o.name.as_str())
    }

    /// Registers a hook invoked once at the end of every pass with the current
    /// values of `cells`.
    pub fn observe(
        &mut self,
        cells: &[CellId],
        callback: impl FnMut(&[f32]) + 'static,
    ) -> ObserverId {
        self.observers.insert(Observer {
            cells: cells.iter().copied().collect(),
            callback: Box::new(callback),
        })
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let removed = self.observers.remove(id).is_some();
        if !removed {
            log::warn!("unobserve: observer {id:?} is not registered");
        }
        removed
    }

    /// True while a clock runs or an output is stale.
    pub fn needs_frame(&self) -> bool {
        self.clocks.any_running() || self.outputs.values().any(|o| o.dirty)
    }

    /// Runs a FRAME pass if one is needed.
    pub fn frame(&mut self) -> Result<Option<PassReport>> {
        if !self.needs_frame() {
            return Ok(None);
        }
        self.run_pass(PassTrigger::FRAME).map(Some)
    }

    pub fn run_pass(&mut self, trigger: PassTrigger) -> Result<PassReport> {
        self.now = self.time.now();
        let since_epoch = self.now.saturating_duration_since(self.epoch);
        self.now_ms = since_epoch.as_micros() as f64 / 1000.0;
        self.pass += 1;

        for slot in self.outputs.values_mut() {
            if slot
                .deps
                .clocks
                .iter()
                .any(|&c| self.clocks.is_running(c).unwrap_or(false))
            {
                slot.dirty = true;
            }
        }
        self.propagate_staleness();

        let mut evaluated = 0;
        for i in 0..self.order.len() {
            let id = self.order[i];
            let slot = &self.outputs[id];
            if slot.dirty && slot.evaluated_in != self.pass {
                self.evaluate_output(id)?;
                evaluated += 1;
            }
        }

        self.notify_observers()?;

        let report = PassReport {
            pass: self.pass,
            trigger,
            now_ms: self.now_ms,
            evaluated,
            clocks_running: self.clocks.any_running(),
        };
        log::trace!("{report:?}");
        Ok(report)
    }

    fn mark_readers(&mut self, cell: CellId) {
        let writer = self.evaluating.last().copied();
        if let Some(readers) = self.readers.get(&cell) {
            for &out in readers {
                if Some(out) != writer
                    && let Some(slot) = self.outputs.get_mut(out)
                {
                    slot.dirty = true;
                }
            }
        }
    }

    fn propagate_staleness(&mut self) {
        loop {
            let stale: Vec<OutputId> = self
                .outputs
                .iter()
                .filter(|(_, o)| {
                    !o.dirty
                        && o.deps
                            .outputs
                            .iter()
                            .any(|d| self.outputs.get(*d).is_some_and(|d| d.dirty))
                })
                .map(|(id, _)| id)
                .collect();
            if stale.is_empty() {
                break;
            }
            for id in stale {
                self.outputs[id].dirty = true;
            }
        }
    }

    fn evaluate_output(&mut self, id: OutputId) -> Result<f32> {
        let slot = self.outputs.get_mut(id).ok_or(GraphError::UnknownOutput(id))?;
        // Cleared first so that writes by other outputs during this
        // evaluation leave it stale for the next pass.
        slot.dirty = false;
        let node = slot.node.clone();

        self.evaluating.push(id);
        let value = self.eval(&node);
        self.evaluating.pop();
        let value = value?;

        let slot = &mut self.outputs[id];
        slot.value = value;
        slot.evaluated_in = self.pass;
        Ok(value)
    }

    fn notify_observers(&mut self) -> Result<()> {
        for obs in self.observers.values_mut() {
            let values = obs
                .cells
                .iter()
                .map(|&c| self.cells.read(c))
                .collect::<Result<SmallVec<[f32; 4]>>>()?;
            (obs.callback)(&values);
        }
        Ok(())
    }

    fn eval(&mut self, node: &Node) -> Result<f32> {
        match node {
            Node::Const(v) => Ok(*v),
            Node::Cell(id) => self.cells.read(*id),
            Node::Unary(op, a) => {
                let a = self.eval(a)?;
                Ok(op.apply(a))
            }
            Node::Binary(BinaryOp::And, a, b) => {
                if !truthy(self.eval(a)?) {
                    return Ok(0.0);
                }
                Ok(flag(truthy(self.eval(b)?)))
            }
            Node::Binary(BinaryOp::Or, a, b) => {
                if truthy(self.eval(a)?) {
                    return Ok(1.0);
                }
                Ok(flag(truthy(self.eval(b)?)))
            }
            Node::Binary(op, a, b) => {
                let a = self.eval(a)?;
                let b = self.eval(b)?;
                Ok(op.apply(a, b))
            }
            Node::Cond {
                cond,
                then,
                otherwise,
            } => {
                if truthy(self.eval(cond)?) {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Node::Switch { index, arms } => {
                let index = self.eval(index)?;
                match arm_index(index, arms.len()) {
                    Some(i) => self.eval(&arms[i]),
                    None => Ok(0.0),
                }
            }
            Node::Block { steps, ret } => {
                for step in steps {
                    self.eval(step)?;
                }
                self.eval(ret)
            }
            Node::Set(cell, value) => {
                let value = self.eval(value)?;
                self.write(*cell, value)?;
                Ok(value)
            }
            Node::Call { cells, callback } => {
                let values = cells
                    .iter()
                    .map(|&c| self.cells.read(c))
                    .collect::<Result<SmallVec<[f32; 4]>>>()?;
                callback(&values);
                Ok(0.0)
            }
            Node::Map { inputs, f } => {
                let mut values = SmallVec::<[f32; 4]>::with_capacity(inputs.len());
                for input in inputs {
                    values.push(self.eval(input)?);
                }
                Ok(f(&values))
            }
            Node::ClockRunning(c) => self.clocks.is_running(*c).map(flag),
            Node::ClockTime(c) => self.clocks.elapsed_ms(*c, self.now),
            Node::StartClock(c) => {
                self.clocks.start(*c, self.now)?;
                Ok(0.0)
            }
            Node::StopClock(c) => {
                self.clocks.stop(*c)?;
                Ok(0.0)
            }
            Node::TimingStep(session) => {
                let now = self.clocks.elapsed_ms(session.clock, self.now)?;
                session.step(self, now)
            }
            Node::Output(id) => {
                let slot = self.outputs.get(*id).ok_or(GraphError::UnknownOutput(*id))?;
                if slot.dirty && slot.evaluated_in != self.pass {
                    self.evaluate_output(*id)
                } else {
                    Ok(slot.value)
                }
            }
        }
    }
}

fn arm_index(index: f32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if index.is_nan() {
        return Some(0);
    }
    Some((index.round().max(0.0) as usize).min(len - 1))
}
