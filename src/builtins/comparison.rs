//! Numeric comparisons: =, <=
//!
//! Both accept two or more arguments and compare integers and doubles
//! interchangeably.

use super::{expect_args, number, Num};
use crate::error::{EvalError, ARITY_AT_LEAST_TWO};
use crate::eval::Interpreter;
use crate::heap::{Heap, ValueRef};

fn chain(
    interp: &mut Interpreter,
    function: &'static str,
    args: ValueRef,
    holds: fn(f64, f64) -> bool,
) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, function, args)?;
    if items.len() < 2 {
        return Err(EvalError::arity(function, ARITY_AT_LEAST_TWO, items.len()));
    }
    let mut previous: Option<Num> = None;
    let mut result = true;
    for (i, item) in items.iter().enumerate() {
        let current = number(interp, function, *item, i + 1)?;
        if let Some(previous) = previous {
            result = result && holds(previous.as_f64(), current.as_f64());
        }
        previous = Some(current);
    }
    Ok(Heap::bool_ref(result))
}

/// `#t` iff all arguments are numerically equal.
///
/// ```lisp
/// (= 1 1.0 1) => #t
/// (= 1 2) => #f
/// ```
pub fn prim_num_eq(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    chain(interp, "=", args, |a, b| a == b)
}

/// `#t` iff the arguments are non-decreasing.
///
/// ```lisp
/// (<= 1 2 2 3) => #t
/// (<= 2 1) => #f
/// ```
pub fn prim_leq(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    chain(interp, "<=", args, |a, b| a <= b)
}

pub fn register(interp: &mut Interpreter) {
    interp.define_primitive("=", prim_num_eq);
    interp.define_primitive("<=", prim_leq);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn arg_list(interp: &mut Interpreter, items: &[Value]) -> ValueRef {
        let refs: Vec<ValueRef> = items.iter().map(|v| interp.heap.alloc(v.clone())).collect();
        interp.list_from(refs)
    }

    fn expect_bool(interp: &Interpreter, result: ValueRef, expected: bool) {
        match interp.heap.get(result) {
            Value::Bool(b) => assert_eq!(*b, expected),
            other => panic!("expected Bool({}), got {:?}", expected, other),
        }
    }

    #[test]
    fn test_equality_chains_every_pair() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(1), Value::Int(1), Value::Int(1)]);
        let result = prim_num_eq(&mut interp, args).unwrap();
        expect_bool(&interp, result, true);

        // An early mismatch is not forgiven by a later equal pair.
        let args = arg_list(&mut interp, &[Value::Int(1), Value::Int(2), Value::Int(2)]);
        let result = prim_num_eq(&mut interp, args).unwrap();
        expect_bool(&interp, result, false);
    }

    #[test]
    fn test_equality_mixes_int_and_double() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(1), Value::Double(1.0)]);
        let result = prim_num_eq(&mut interp, args).unwrap();
        expect_bool(&interp, result, true);
    }

    #[test]
    fn test_leq_non_decreasing() {
        let mut interp = Interpreter::new();
        let args = arg_list(
            &mut interp,
            &[Value::Int(1), Value::Int(2), Value::Int(2), Value::Int(3)],
        );
        let result = prim_leq(&mut interp, args).unwrap();
        expect_bool(&interp, result, true);

        let args = arg_list(&mut interp, &[Value::Int(2), Value::Double(1.5)]);
        let result = prim_leq(&mut interp, args).unwrap();
        expect_bool(&interp, result, false);
    }

    #[test]
    fn test_comparisons_require_two_arguments() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(1)]);
        assert!(matches!(
            prim_num_eq(&mut interp, args),
            Err(EvalError::Arity { .. })
        ));
    }

    #[test]
    fn test_comparisons_require_numbers() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(1), Value::Str("x".to_string())]);
        assert!(matches!(
            prim_leq(&mut interp, args),
            Err(EvalError::TypeMismatch { position: 2, .. })
        ));
    }
}
