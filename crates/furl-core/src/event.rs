//! Host events mapped onto cells.
//!
//! A host event is a flat list of `(path, value)` pairs such as
//! `("contentOffset.y", 30.0)`. An [`EventBinding`] says which path lands in
//! which cell; dispatching writes every matched path and then runs one EVENT
//! pass, so all writes of one event are seen together.

use smallvec::SmallVec;

use crate::CellId;
use crate::engine::{Engine, PassReport};
use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NativeEvent {
    fields: SmallVec<[(String, f32); 2]>,
}

impl NativeEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, value: f32) -> Self {
        self.fields.push((path.into(), value));
        self
    }

    pub fn get(&self, path: &str) -> Option<f32> {
        self.fields
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, v)| *v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, f32)> {
        self.fields.iter().map(|(p, v)| (p.as_str(), *v))
    }
}

#[derive(Clone, Debug, Default)]
pub struct EventBinding {
    mappings: Vec<(String, CellId)>,
}

impl EventBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, path: impl Into<String>, cell: CellId) -> Self {
        self.mappings.push((path.into(), cell));
        self
    }

    pub fn dispatch(&self, engine: &mut Engine, event: &NativeEvent) -> Result<PassReport> {
        let writes: SmallVec<[(CellId, f32); 4]> = self
            .mappings
            .iter()
            .filter_map(|(path, cell)| event.get(path).map(|v| (*cell, v)))
            .collect();
        for (path, _) in event.fields() {
            if !self.mappings.iter().any(|(p, _)| p == path) {
                log::trace!("event field `{path}` has no binding");
            }
        }
        engine.dispatch(&writes)
    }
}
