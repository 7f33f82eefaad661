//! Lexically scoped symbol table.
//!
//! A `Scope` is a shared handle onto one environment frame; cloning the
//! handle shares the frame, which is how closures see later mutations of
//! their defining scope. Frames only reference their parent, never their
//! children, so the chain cannot form a cycle.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::value::Value;

#[derive(Debug, Default)]
struct Environment {
    bindings: AHashMap<String, Value>,
    outer: Option<Scope>,
}

/// Shared handle to an environment frame.
#[derive(Debug, Clone, Default)]
pub struct Scope(Rc<RefCell<Environment>>);

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh frame whose lookups fall back to this one.
    #[must_use]
    pub fn enclose(&self) -> Self {
        Self(Rc::new(RefCell::new(Environment {
            bindings: AHashMap::new(),
            outer: Some(self.clone()),
        })))
    }

    /// Walks outward and returns the first binding for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let env = self.0.borrow();
        if let Some(value) = env.bindings.get(name) {
            return Some(value.clone());
        }
        env.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Binds `name` in this frame. Only `let` introduces names, so this
    /// never touches outer frames.
    pub fn store(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Updates `name` in the frame that defines it. Returns false when no
    /// frame in the chain has the binding; assignment must not create one.
    pub fn replace(&self, name: &str, value: Value) -> bool {
        let mut env = self.0.borrow_mut();
        if let Some(slot) = env.bindings.get_mut(name) {
            *slot = value;
            return true;
        }
        match &env.outer {
            Some(outer) => outer.replace(name, value),
            None => false,
        }
    }

    /// Removes `name` from this frame only.
    pub fn delete(&self, name: &str) {
        self.0.borrow_mut().bindings.remove(name);
    }

    /// Names bound directly in this frame, for the REPL's inspection.
    #[must_use]
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.borrow().bindings.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
