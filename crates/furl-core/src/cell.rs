use slotmap::{SlotMap, new_key_type};

use crate::error::{GraphError, Result};

new_key_type! {
    /// Handle to a mutable scalar cell.
    pub struct CellId;
}

struct Slot {
    name: String,
    value: f32,
}

/// The only mutable state a graph has. Flags are stored as `0.0` / `1.0`.
#[derive(Default)]
pub struct CellStore {
    slots: SlotMap<CellId, Slot>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, name: impl Into<String>, initial: f32) -> CellId {
        self.slots.insert(Slot {
            name: name.into(),
            value: initial,
        })
    }

    pub fn read(&self, id: CellId) -> Result<f32> {
        self.slots
            .get(id)
            .map(|s| s.value)
            .ok_or(GraphError::UnknownCell(id))
    }

    /// Returns `true` if the stored value changed.
    pub fn write(&mut self, id: CellId, value: f32) -> Result<bool> {
        let slot = self.slots.get_mut(id).ok_or(GraphError::UnknownCell(id))?;
        // NaN never compares equal, so it always counts as a change.
        let changed = slot.value != value;
        slot.value = value;
        Ok(changed)
    }

    pub fn name(&self, id: CellId) -> Option<&str> {
        self.slots.get(id).map(|s| s.name.as_str())
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

pub fn truthy(v: f32) -> bool {
    v != 0.0
}

pub fn flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}
