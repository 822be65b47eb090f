//! Native functions callable from the language by name.
//!
//! The registry is consulted only after an identifier misses every scope, so
//! a `let len = ...` shadows the builtin.

use rustc_hash::FxHashMap;

use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::value::{Builtin, BuiltinFn, Value};

pub mod core;
pub mod arrays;

// ─── Runtime state ────────────────────────────────────────────────────────────

/// Interpreter-level state passed to every builtin call.
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// Lines written by `puts`, drained by the host.
    pub output: Vec<String>,
}

// ─── Registry ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BuiltinRegistry {
    entries: FxHashMap<&'static str, Builtin>,
}

impl BuiltinRegistry {
    /// An empty registry. Programs see no builtins at all.
    pub fn new() -> Self { Self { entries: FxHashMap::default() } }

    /// Adds or replaces `name`.
    pub fn register(&mut self, name: &'static str, func: BuiltinFn) {
        self.entries.insert(name, Builtin { name, func });
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.get(name).map(|b| Value::Builtin(*b))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn standard() -> Self {
        let mut r = Self::new();
        core::register(&mut r);
        arrays::register(&mut r);
        r
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self { Self::standard() }
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

pub(crate) fn check_argc(args: &[Value], n: usize) -> RuntimeResult<()> {
    if args.len() != n {
        Err(RuntimeError::WrongArgumentCount { got: args.len(), want: n })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(_: &[Value], _: &mut RuntimeState) -> RuntimeResult<Value> {
        Ok(Value::Integer(42))
    }

    #[test]
    fn standard_has_len() {
        let r = BuiltinRegistry::standard();
        assert!(matches!(r.get("len"), Some(Value::Builtin(b)) if b.name == "len"));
        assert_eq!(r.names(), vec!["first", "last", "len", "push", "puts", "rest"]);
    }

    #[test]
    fn empty_registry() {
        let r = BuiltinRegistry::new();
        assert!(r.get("len").is_none());
        assert!(r.names().is_empty());
    }

    #[test]
    fn host_registration() {
        let mut r = BuiltinRegistry::new();
        r.register("answer", answer);
        assert_eq!(r.names(), vec!["answer"]);
        let Some(Value::Builtin(b)) = r.get("answer") else { panic!("answer not registered") };
        assert_eq!((b.func)(&[], &mut RuntimeState::default()), Ok(Value::Integer(42)));
    }

    #[test]
    fn argc_check() {
        assert!(check_argc(&[Value::Null], 1).is_ok());
        assert_eq!(
            check_argc(&[], 1),
            Err(RuntimeError::WrongArgumentCount { got: 0, want: 1 })
        );
    }
}
