//! # Expression nodes
//!
//! A graph is built once from these nodes and re-evaluated on every pass. Nodes
//! are immutable and shared through [`NodeRef`], so the same sub-expression can
//! appear in several places (the graph is a DAG, not a tree).
//!
//! ```rust
//! use furl_core::*;
//!
//! let mut engine = Engine::new(ManualTime::new());
//! let scroll = engine.create_cell("scroll", 0.0);
//!
//! // max(140 - scroll, 72)
//! let height = max(sub(140.0, scroll), 72.0);
//! let out = engine.register_output("height", height);
//!
//! engine.dispatch(&[(scroll, 100.0)]).unwrap();
//! assert_eq!(engine.output(out).unwrap(), 72.0);
//! ```
//!
//! Nodes are evaluated positionally. A node listed twice in a [`block`] runs
//! twice; only registered outputs are memoised within a pass (see
//! [`output`]).

use std::collections::HashSet;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::cell::{flag, truthy};
use crate::timing::TimingSession;
use crate::{CellId, ClockId, OutputId};

pub type NodeRef = Rc<Node>;
pub type Callback = Rc<dyn Fn(&[f32])>;
/// A pure function over already evaluated inputs.
pub type NativeFn = fn(&[f32]) -> f32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Abs,
}

impl UnaryOp {
    pub fn apply(self, a: f32) -> f32 {
        match self {
            UnaryOp::Not => flag(!truthy(a)),
            UnaryOp::Neg => -a,
            UnaryOp::Abs => a.abs(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
    /// Short-circuits: the right operand is not evaluated when the left is falsy.
    And,
    /// Short-circuits: the right operand is not evaluated when the left is truthy.
    Or,
}

impl BinaryOp {
    pub fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Min => a.min(b),
            BinaryOp::Max => a.max(b),
            BinaryOp::Eq => flag(a == b),
            BinaryOp::Neq => flag(a != b),
            BinaryOp::Gt => flag(a > b),
            BinaryOp::Ge => flag(a >= b),
            BinaryOp::Lt => flag(a < b),
            BinaryOp::Le => flag(a <= b),
            BinaryOp::And => flag(truthy(a) && truthy(b)),
            BinaryOp::Or => flag(truthy(a) || truthy(b)),
        }
    }
}

pub enum Node {
    Const(f32),
    Cell(CellId),
    Unary(UnaryOp, NodeRef),
    Binary(BinaryOp, NodeRef, NodeRef),
    /// Evaluates `cond` once, then exactly one branch.
    Cond {
        cond: NodeRef,
        then: NodeRef,
        otherwise: NodeRef,
    },
    /// Evaluates `index`, then exactly one arm. The index is rounded and
    /// clamped into range.
    Switch { index: NodeRef, arms: Vec<NodeRef> },
    /// Runs `steps` in order, then returns the value of `ret`.
    Block { steps: Vec<NodeRef>, ret: NodeRef },
    /// Writes the cell and yields the written value.
    Set(CellId, NodeRef),
    /// Reads the cells and hands their values to `callback`. Yields `0`.
    Call {
        cells: SmallVec<[CellId; 4]>,
        callback: Callback,
    },
    Map { inputs: Vec<NodeRef>, f: NativeFn },
    ClockRunning(ClockId),
    /// Ms since the clock was started, as of the current frame; `0` while
    /// stopped.
    ClockTime(ClockId),
    StartClock(ClockId),
    StopClock(ClockId),
    /// Advances one timing session by the time elapsed since its last step.
    TimingStep(TimingSession),
    /// Value of another registered output in the current pass.
    Output(OutputId),
}

/// Everything a node can read, used to decide when an output is stale.
#[derive(Clone, Debug, Default)]
pub struct Dependencies {
    pub cells: HashSet<CellId>,
    pub clocks: HashSet<ClockId>,
    pub outputs: HashSet<OutputId>,
}

impl Dependencies {
    pub fn of(node: &Node) -> Self {
        let mut deps = Self::default();
        let mut seen = HashSet::new();
        node.collect_dependencies(&mut deps, &mut seen);
        deps
    }
}

impl Node {
    fn collect_dependencies(&self, deps: &mut Dependencies, seen: &mut HashSet<*const Node>) {
        if !seen.insert(self as *const Node) {
            return;
        }
        let mut visit = |n: &NodeRef, deps: &mut Dependencies| n.collect_dependencies(deps, seen);
        match self {
            Node::Const(_) => {}
            Node::Cell(id) => {
                deps.cells.insert(*id);
            }
            Node::Unary(_, a) => visit(a, deps),
            Node::Binary(_, a, b) => {
                visit(a, deps);
                visit(b, deps);
            }
            Node::Cond {
                cond,
                then,
                otherwise,
            } => {
                visit(cond, deps);
                visit(then, deps);
                visit(otherwise, deps);
            }
            Node::Switch { index, arms } => {
                visit(index, deps);
                for arm in arms {
                    visit(arm, deps);
                }
            }
            Node::Block { steps, ret } => {
                for step in steps {
                    visit(step, deps);
                }
                visit(ret, deps);
            }
            Node::Set(_, value) => visit(value, deps),
            Node::Call { cells, .. } => deps.cells.extend(cells.iter().copied()),
            Node::Map { inputs, .. } => {
                for input in inputs {
                    visit(input, deps);
                }
            }
            Node::ClockRunning(c) | Node::ClockTime(c) | Node::StartClock(c) | Node::StopClock(c) => {
                deps.clocks.insert(*c);
            }
            Node::TimingStep(session) => {
                deps.clocks.insert(session.clock);
                deps.cells.extend(session.cells());
            }
            Node::Output(id) => {
                deps.outputs.insert(*id);
            }
        }
    }
}

/// Anything that can stand in for a node when building graphs.
pub trait IntoNode {
    fn into_node(self) -> NodeRef;
}

impl IntoNode for NodeRef {
    fn into_node(self) -> NodeRef {
        self
    }
}

impl IntoNode for &NodeRef {
    fn into_node(self) -> NodeRef {
        self.clone()
    }
}

impl IntoNode for f32 {
    fn into_node(self) -> NodeRef {
        Rc::new(Node::Const(self))
    }
}

// Unsuffixed float literals fall back to `f64`.
impl IntoNode for f64 {
    fn into_node(self) -> NodeRef {
        Rc::new(Node::Const(self as f32))
    }
}

impl IntoNode for CellId {
    fn into_node(self) -> NodeRef {
        Rc::new(Node::Cell(self))
    }
}

pub fn constant(v: f32) -> NodeRef {
    v.into_node()
}

pub fn cell(id: CellId) -> NodeRef {
    id.into_node()
}

fn unary(op: UnaryOp, a: impl IntoNode) -> NodeRef {
    Rc::new(Node::Unary(op, a.into_node()))
}

fn binary(op: BinaryOp, a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    Rc::new(Node::Binary(op, a.into_node(), b.into_node()))
}

pub fn not(a: impl IntoNode) -> NodeRef {
    unary(UnaryOp::Not, a)
}
pub fn neg(a: impl IntoNode) -> NodeRef {
    unary(UnaryOp::Neg, a)
}
pub fn abs(a: impl IntoNode) -> NodeRef {
    unary(UnaryOp::Abs, a)
}

pub fn add(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Add, a, b)
}
pub fn sub(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Sub, a, b)
}
pub fn mul(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Mul, a, b)
}
pub fn div(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Div, a, b)
}
pub fn min(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Min, a, b)
}
pub fn max(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Max, a, b)
}
pub fn eq(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Eq, a, b)
}
pub fn neq(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Neq, a, b)
}
pub fn gt(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Gt, a, b)
}
pub fn ge(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Ge, a, b)
}
pub fn lt(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Lt, a, b)
}
pub fn le(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Le, a, b)
}
pub fn and(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::And, a, b)
}
pub fn or(a: impl IntoNode, b: impl IntoNode) -> NodeRef {
    binary(BinaryOp::Or, a, b)
}

pub fn cond(c: impl IntoNode, then: impl IntoNode, otherwise: impl IntoNode) -> NodeRef {
    Rc::new(Node::Cond {
        cond: c.into_node(),
        then: then.into_node(),
        otherwise: otherwise.into_node(),
    })
}

pub fn switch(index: impl IntoNode, arms: Vec<NodeRef>) -> NodeRef {
    Rc::new(Node::Switch {
        index: index.into_node(),
        arms,
    })
}

/// Ordered effects with an explicit result.
pub fn block(steps: Vec<NodeRef>, ret: impl IntoNode) -> NodeRef {
    Rc::new(Node::Block {
        steps,
        ret: ret.into_node(),
    })
}

/// Ordered effects whose result is not consumed (yields `0`).
pub fn effects(steps: Vec<NodeRef>) -> NodeRef {
    block(steps, 0.0)
}

pub fn set(target: CellId, value: impl IntoNode) -> NodeRef {
    Rc::new(Node::Set(target, value.into_node()))
}

pub fn call(cells: &[CellId], callback: impl Fn(&[f32]) + 'static) -> NodeRef {
    Rc::new(Node::Call {
        cells: cells.iter().copied().collect(),
        callback: Rc::new(callback),
    })
}

pub fn map(inputs: Vec<NodeRef>, f: NativeFn) -> NodeRef {
    Rc::new(Node::Map { inputs, f })
}

pub fn clock_running(clock: ClockId) -> NodeRef {
    Rc::new(Node::ClockRunning(clock))
}
pub fn clock_time(clock: ClockId) -> NodeRef {
    Rc::new(Node::ClockTime(clock))
}
pub fn start_clock(clock: ClockId) -> NodeRef {
    Rc::new(Node::StartClock(clock))
}
pub fn stop_clock(clock: ClockId) -> NodeRef {
    Rc::new(Node::StopClock(clock))
}

pub fn output(id: OutputId) -> NodeRef {
    Rc::new(Node::Output(id))
}
