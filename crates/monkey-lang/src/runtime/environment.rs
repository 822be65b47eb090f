//! Lexical scopes.
//!
//! An `Environment` is a shared handle to one scope. Function values hold a
//! handle to the scope they were defined in; each call gets a fresh scope
//! whose parent is that captured handle. `Rc` keeps the handle single-threaded,
//! so one root scope can never be shared by concurrent evaluations.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::runtime::value::Value;

struct Scope {
    bindings: FxHashMap<String, Value>,
    outer: Option<Environment>,
}

#[derive(Clone)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Environment {
    /// A root scope with no parent.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Scope { bindings: FxHashMap::default(), outer: None })))
    }

    /// A child scope of `outer`. Used once per function call.
    pub fn enclosed(outer: &Environment) -> Self {
        Self(Rc::new(RefCell::new(Scope {
            bindings: FxHashMap::default(),
            outer: Some(outer.clone()),
        })))
    }

    /// Looks `name` up here, then in each enclosing scope in turn.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let scope = current.0.borrow();
                if let Some(v) = scope.bindings.get(name) {
                    return Some(v.clone());
                }
                scope.outer.clone()?
            };
            current = next;
        }
    }

    /// Binds `name` in this scope only; enclosing scopes are never written.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Names bound in this scope, sorted.
    fn local_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.0.borrow().bindings.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Environment {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Environment {
    // Values are left out: a scope can hold a closure that captured it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.local_names())
            .field("has_outer", &self.0.borrow().outer.is_some())
            .finish()
    }
}
