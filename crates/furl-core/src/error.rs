use thiserror::Error;

use crate::{CellId, ClockId, OutputId};

/// Structural failures of the graph. Numeric inputs never produce these; they
/// are clamped by the graphs that consume them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("cell {0:?} does not belong to this engine")]
    UnknownCell(CellId),
    #[error("clock {0:?} does not belong to this engine")]
    UnknownClock(ClockId),
    #[error("output {0:?} is not registered")]
    UnknownOutput(OutputId),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
