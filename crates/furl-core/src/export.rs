use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type SubId = usize;

/// A value copied out of the graph for imperative code. Clones share the value.
///
/// The graph never reads it back; it is informational only.
#[derive(Clone, Default)]
pub struct Exported(Rc<Inner>);

#[derive(Default)]
struct Inner {
    value: Cell<f32>,
    subs: RefCell<Vec<Option<Rc<dyn Fn(f32)>>>>,
}

impl Exported {
    pub fn new(value: f32) -> Self {
        let e = Self::default();
        e.0.value.set(value);
        e
    }

    pub fn get(&self) -> f32 {
        self.0.value.get()
    }

    /// Stores `v` and notifies subscribers. Subscribers may subscribe or
    /// unsubscribe from inside the callback; changes apply from the next `set`.
    pub fn set(&self, v: f32) {
        self.0.value.set(v);
        let subs: Vec<Rc<dyn Fn(f32)>> =
            self.0.subs.borrow().iter().flatten().cloned().collect();
        for s in subs {
            s(v);
        }
    }

    pub fn subscribe(&self, f: impl Fn(f32) + 'static) -> SubId {
        let mut subs = self.0.subs.borrow_mut();
        subs.push(Some(Rc::new(f)));
        subs.len() - 1
    }

    pub fn unsubscribe(&self, id: SubId) {
        if let Some(slot) = self.0.subs.borrow_mut().get_mut(id) {
            *slot = None;
        }
    }
}
