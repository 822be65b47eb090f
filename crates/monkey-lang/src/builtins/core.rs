//! Always-available builtins that are not tied to a value type.

use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::value::{NULL, Value};
use super::{BuiltinRegistry, RuntimeState, check_argc};

pub fn register(r: &mut BuiltinRegistry) {
    r.register("len", len);
    r.register("puts", puts);
}

/// `len(s)`: byte length of a string. Nothing else has a length.
fn len(args: &[Value], _: &mut RuntimeState) -> RuntimeResult<Value> {
    check_argc(args, 1)?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Integer(s.len() as i64)),
        other => Err(RuntimeError::UnsupportedArgument { builtin: "len", ty: other.type_name() }),
    }
}

/// `puts(a, b, ...)`: one output line per argument.
fn puts(args: &[Value], state: &mut RuntimeState) -> RuntimeResult<Value> {
    state.output.extend(args.iter().map(|a| a.to_string()));
    Ok(NULL)
}
