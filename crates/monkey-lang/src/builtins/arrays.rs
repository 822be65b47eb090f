//! Array builtins. Arrays are immutable: `rest` and `push` build new ones.

use std::rc::Rc;

use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::value::{NULL, Value};
use super::{BuiltinRegistry, RuntimeState, check_argc};

pub fn register(r: &mut BuiltinRegistry) {
    r.register("first", first);
    r.register("last", last);
    r.register("rest", rest);
    r.register("push", push);
}

fn as_array<'v>(builtin: &'static str, v: &'v Value) -> RuntimeResult<&'v Rc<Vec<Value>>> {
    match v {
        Value::Array(items) => Ok(items),
        other => Err(RuntimeError::ExpectedArgument { builtin, expected: "ARRAY", ty: other.type_name() }),
    }
}

fn first(args: &[Value], _: &mut RuntimeState) -> RuntimeResult<Value> {
    check_argc(args, 1)?;
    let items = as_array("first", &args[0])?;
    Ok(items.first().cloned().unwrap_or(NULL))
}

fn last(args: &[Value], _: &mut RuntimeState) -> RuntimeResult<Value> {
    check_argc(args, 1)?;
    let items = as_array("last", &args[0])?;
    Ok(items.last().cloned().unwrap_or(NULL))
}

fn rest(args: &[Value], _: &mut RuntimeState) -> RuntimeResult<Value> {
    check_argc(args, 1)?;
    let items = as_array("rest", &args[0])?;
    match items.split_first() {
        Some((_, tail)) => Ok(Value::Array(Rc::new(tail.to_vec()))),
        None => Ok(NULL),
    }
}

fn push(args: &[Value], _: &mut RuntimeState) -> RuntimeResult<Value> {
    check_argc(args, 2)?;
    let items = as_array("push", &args[0])?;
    let mut extended = Vec::with_capacity(items.len() + 1);
    extended.extend(items.iter().cloned());
    extended.push(args[1].clone());
    Ok(Value::Array(Rc::new(extended)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(items: &[i64]) -> Value {
        Value::Array(Rc::new(items.iter().map(|&i| Value::Integer(i)).collect()))
    }

    fn call(f: fn(&[Value], &mut RuntimeState) -> RuntimeResult<Value>, args: &[Value]) -> RuntimeResult<Value> {
        f(args, &mut RuntimeState::default())
    }

    #[test]
    fn first_and_last() {
        assert_eq!(call(first, &[arr(&[1, 2, 3])]), Ok(Value::Integer(1)));
        assert_eq!(call(last, &[arr(&[1, 2, 3])]), Ok(Value::Integer(3)));
        assert_eq!(call(first, &[arr(&[])]), Ok(NULL));
        assert_eq!(call(last, &[arr(&[])]), Ok(NULL));
    }

    #[test]
    fn rest_drops_head() {
        assert_eq!(call(rest, &[arr(&[1, 2, 3])]), Ok(arr(&[2, 3])));
        assert_eq!(call(rest, &[arr(&[1])]), Ok(arr(&[])));
        assert_eq!(call(rest, &[arr(&[])]), Ok(NULL));
    }

    #[test]
    fn push_leaves_original_untouched() {
        let original = arr(&[1]);
        assert_eq!(call(push, &[original.clone(), Value::Integer(2)]), Ok(arr(&[1, 2])));
        assert_eq!(original, arr(&[1]));
    }

    #[test]
    fn type_and_arity_errors() {
        assert_eq!(
            call(first, &[Value::Integer(1)]).unwrap_err().to_string(),
            "argument to `first` must be ARRAY, got INTEGER"
        );
        assert_eq!(
            call(push, &[arr(&[])]).unwrap_err().to_string(),
            "wrong number of arguments. Got: 1, take: 2"
        );
    }
}
