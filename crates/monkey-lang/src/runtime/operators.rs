//! Prefix, infix and index semantics on already-evaluated operands.

use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::value::{NULL, Value};
use crate::syntax::ast::{BinOp, UnOp};

pub fn eval_prefix(op: UnOp, operand: Value) -> RuntimeResult<Value> {
    match op {
        UnOp::Not => Ok(Value::from(!operand.is_truthy())),
        UnOp::Neg => match operand {
            Value::Integer(v) => Ok(Value::Integer(v.wrapping_neg())),
            other => Err(RuntimeError::UnknownPrefix {
                op: op.symbol().to_string(),
                operand: other.type_name(),
            }),
        },
    }
}

pub fn eval_infix(op: BinOp, left: Value, right: Value) -> RuntimeResult<Value> {
    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => integer_infix(op, *a, *b),
        (Value::Str(a), Value::Str(b)) if op == BinOp::Add => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Value::Str(s))
        }
        (Value::Boolean(a), Value::Boolean(b)) if op == BinOp::Eq => Ok(Value::from(a == b)),
        (Value::Boolean(a), Value::Boolean(b)) if op == BinOp::NotEq => Ok(Value::from(a != b)),
        _ if left.type_name() != right.type_name() => Err(RuntimeError::TypeMismatch {
            left: left.type_name(),
            op: op.symbol().to_string(),
            right: right.type_name(),
        }),
        _ => Err(unknown_infix(op, &left, &right)),
    }
}

/// Integer arithmetic wraps on overflow; only division by zero is an error.
fn integer_infix(op: BinOp, a: i64, b: i64) -> RuntimeResult<Value> {
    let v = match op {
        BinOp::Add   => Value::Integer(a.wrapping_add(b)),
        BinOp::Sub   => Value::Integer(a.wrapping_sub(b)),
        BinOp::Mul   => Value::Integer(a.wrapping_mul(b)),
        BinOp::Div   => {
            if b == 0 { return Err(RuntimeError::DivisionByZero); }
            Value::Integer(a.wrapping_div(b))
        }
        BinOp::Lt    => Value::from(a < b),
        BinOp::Gt    => Value::from(a > b),
        BinOp::Eq    => Value::from(a == b),
        BinOp::NotEq => Value::from(a != b),
    };
    Ok(v)
}

fn unknown_infix(op: BinOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::UnknownInfix {
        left: left.type_name(),
        op: op.symbol().to_string(),
        right: right.type_name(),
    }
}

/// `target[index]`. Out-of-range array indices and missing hash keys are `NULL`.
pub fn eval_index(target: Value, index: Value) -> RuntimeResult<Value> {
    match (&target, &index) {
        (Value::Array(items), Value::Integer(i)) => {
            let item = usize::try_from(*i).ok().and_then(|i| items.get(i));
            Ok(item.cloned().unwrap_or(NULL))
        }
        (Value::Hash(pairs), _) => {
            let key = index.hash_key()
                .ok_or(RuntimeError::UnusableHashKey(index.type_name()))?;
            Ok(pairs.get(&key).map(|p| p.value.clone()).unwrap_or(NULL))
        }
        _ => Err(RuntimeError::IndexNotSupported(target.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::{FALSE, TRUE};
    use std::rc::Rc;

    fn int(v: i64) -> Value { Value::Integer(v) }

    #[test]
    fn bang_follows_truthiness() {
        assert_eq!(eval_prefix(UnOp::Not, TRUE), Ok(FALSE));
        assert_eq!(eval_prefix(UnOp::Not, FALSE), Ok(TRUE));
        assert_eq!(eval_prefix(UnOp::Not, NULL), Ok(TRUE));
        assert_eq!(eval_prefix(UnOp::Not, int(0)), Ok(FALSE));
        assert_eq!(eval_prefix(UnOp::Not, Value::from("")), Ok(FALSE));
    }

    #[test]
    fn negation_integer_only() {
        assert_eq!(eval_prefix(UnOp::Neg, int(5)), Ok(int(-5)));
        assert_eq!(
            eval_prefix(UnOp::Neg, Value::from("x")).unwrap_err().to_string(),
            "unknown operation: -STRING"
        );
    }

    #[test]
    fn integer_arithmetic() {
        assert_eq!(eval_infix(BinOp::Add, int(2), int(3)), Ok(int(5)));
        assert_eq!(eval_infix(BinOp::Sub, int(2), int(3)), Ok(int(-1)));
        assert_eq!(eval_infix(BinOp::Mul, int(4), int(3)), Ok(int(12)));
        assert_eq!(eval_infix(BinOp::Div, int(7), int(2)), Ok(int(3)));
        assert_eq!(eval_infix(BinOp::Div, int(-7), int(2)), Ok(int(-3)));
    }

    #[test]
    fn integer_overflow_wraps() {
        assert_eq!(eval_infix(BinOp::Add, int(i64::MAX), int(1)), Ok(int(i64::MIN)));
        assert_eq!(eval_infix(BinOp::Div, int(i64::MIN), int(-1)), Ok(int(i64::MIN)));
        assert_eq!(eval_prefix(UnOp::Neg, int(i64::MIN)), Ok(int(i64::MIN)));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(eval_infix(BinOp::Div, int(1), int(0)), Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn integer_comparison() {
        assert_eq!(eval_infix(BinOp::Lt, int(1), int(2)), Ok(TRUE));
        assert_eq!(eval_infix(BinOp::Gt, int(1), int(2)), Ok(FALSE));
        assert_eq!(eval_infix(BinOp::Eq, int(1), int(1)), Ok(TRUE));
        assert_eq!(eval_infix(BinOp::NotEq, int(1), int(1)), Ok(FALSE));
    }

    #[test]
    fn string_concatenation_only() {
        assert_eq!(eval_infix(BinOp::Add, "a".into(), "b".into()), Ok(Value::from("ab")));
        assert_eq!(
            eval_infix(BinOp::Eq, "a".into(), "a".into()).unwrap_err().to_string(),
            "unknown operation: STRING == STRING"
        );
    }

    #[test]
    fn boolean_equality() {
        assert_eq!(eval_infix(BinOp::Eq, TRUE, TRUE), Ok(TRUE));
        assert_eq!(eval_infix(BinOp::NotEq, TRUE, FALSE), Ok(TRUE));
        assert_eq!(
            eval_infix(BinOp::Lt, TRUE, FALSE).unwrap_err().to_string(),
            "unknown operation: BOOLEAN < BOOLEAN"
        );
    }

    #[test]
    fn mismatched_types() {
        assert_eq!(
            eval_infix(BinOp::Eq, int(1), TRUE).unwrap_err().to_string(),
            "type missmatch: INTEGER == BOOLEAN"
        );
        assert_eq!(
            eval_infix(BinOp::Add, "a".into(), int(1)).unwrap_err().to_string(),
            "type missmatch: STRING + INTEGER"
        );
    }

    #[test]
    fn null_has_no_operators() {
        assert_eq!(
            eval_infix(BinOp::Eq, NULL, NULL).unwrap_err().to_string(),
            "unknown operation: NULL == NULL"
        );
    }

    #[test]
    fn array_index_bounds() {
        let arr = Value::Array(Rc::new(vec![int(1), int(2), int(3)]));
        assert_eq!(eval_index(arr.clone(), int(0)), Ok(int(1)));
        assert_eq!(eval_index(arr.clone(), int(3)), Ok(NULL));
        assert_eq!(eval_index(arr.clone(), int(-1)), Ok(NULL));
        assert_eq!(
            eval_index(arr, TRUE).unwrap_err().to_string(),
            "index operator not supported: ARRAY"
        );
    }

    #[test]
    fn index_non_container() {
        assert_eq!(
            eval_index(int(1), int(0)).unwrap_err(),
            RuntimeError::IndexNotSupported("INTEGER")
        );
    }
}
