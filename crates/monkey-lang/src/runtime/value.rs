//! Runtime object model.
//!
//! `TRUE`, `FALSE` and `NULL` are the canonical boolean and null values. Every
//! boolean the evaluator produces is one of the two constants, so comparing
//! booleans or testing for null is a plain tag comparison.
//!
//! The "unwind with this value" signal of `return` is not a `Value` variant:
//! it travels on the error side of the evaluator's `Result` (see
//! `interpreter::Unwind`) and is unwrapped at function and program boundaries,
//! so it can never be observed from the language.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::builtins::RuntimeState;
use crate::error::RuntimeResult;
use crate::runtime::environment::Environment;
use crate::syntax::ast::Block;

pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);
pub const NULL: Value = Value::Null;

#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Str(String),
    Null,
    Array(Rc<Vec<Value>>),
    Hash(Rc<FxHashMap<HashKey, HashPair>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Error(String),
}

impl Value {
    /// Name used in error messages (`INTEGER`, `STRING`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_)  => "INTEGER",
            Value::Boolean(_)  => "BOOLEAN",
            Value::Str(_)      => "STRING",
            Value::Null        => "NULL",
            Value::Array(_)    => "ARRAY",
            Value::Hash(_)     => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_)  => "BUILTIN",
            Value::Error(_)    => "ERROR",
        }
    }

    /// Only `FALSE` and `NULL` are falsy. `0` and `""` are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// `None` for values that cannot key a hash.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(v) => Some(HashKey::Integer(*v)),
            Value::Boolean(v) => Some(HashKey::Boolean(*v)),
            Value::Str(s)     => Some(HashKey::Str(s.clone())),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b { TRUE } else { FALSE }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Structural equality for data, identity for functions. Used by tests and
/// hosts; the language's own `==` lives in `operators`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b))   => a == b,
            (Value::Boolean(a), Value::Boolean(b))   => a == b,
            (Value::Str(a), Value::Str(b))           => a == b,
            (Value::Null, Value::Null)               => true,
            (Value::Array(a), Value::Array(b))       => a == b,
            (Value::Hash(a), Value::Hash(b))         => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b))   => a.name == b.name,
            (Value::Error(a), Value::Error(b))       => a == b,
            _ => false,
        }
    }
}

// ─── Hash keys ────────────────────────────────────────────────────────────────

/// Canonical key of a hashable value. The variant is the type tag, so `1` and
/// `"1"` never collide, and equal values always produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    Str(String),
}

/// The original key is kept next to the value so a hash can be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

// ─── Callables ────────────────────────────────────────────────────────────────

/// A closure: parameters and body of a `fn` literal plus the environment it
/// was evaluated in.
pub struct Function {
    pub params: Rc<[String]>,
    pub body: Rc<Block>,
    pub env: Environment,
}

pub type BuiltinFn = fn(&[Value], &mut RuntimeState) -> RuntimeResult<Value>;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

// ─── Debug / Display ──────────────────────────────────────────────────────────

impl fmt::Debug for Function {
    // The captured environment may contain this very function.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Builtin").field(&self.name).finish()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v)  => f.debug_tuple("Integer").field(v).finish(),
            Value::Boolean(v)  => f.debug_tuple("Boolean").field(v).finish(),
            Value::Str(s)      => f.debug_tuple("Str").field(s).finish(),
            Value::Null        => f.write_str("Null"),
            Value::Array(a)    => f.debug_tuple("Array").field(a).finish(),
            Value::Hash(h)     => f.debug_tuple("Hash").field(h).finish(),
            Value::Function(x) => fmt::Debug::fmt(x, f),
            Value::Builtin(b)  => fmt::Debug::fmt(b, f),
            Value::Error(m)    => f.debug_tuple("Error").field(m).finish(),
        }
    }
}

/// The inspected form printed by the REPL and by `puts`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Str(s)     => f.write_str(s),
            Value::Null       => f.write_str("null"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, pair) in pairs.values().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => {
                write!(f, "fn(")?;
                for (i, p) in func.params.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    f.write_str(p)?;
                }
                write!(f, ") {{\n{}\n}}", func.body)
            }
            Value::Builtin(_) => f.write_str("builtin function"),
            Value::Error(m)   => write!(f, "ERROR: {m}"),
        }
    }
}
