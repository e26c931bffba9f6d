//! Arithmetic operations: +, -, *, /, modulo, zero?
//!
//! Sums and products stay integers as long as every argument is an integer
//! and promote to doubles otherwise. Division always produces a double.

use super::{expect_args, number, Num};
use crate::error::{EvalError, ARITY_AT_LEAST_ONE, ARITY_ONE, ARITY_TWO};
use crate::eval::Interpreter;
use crate::heap::{Heap, ValueRef};
use crate::value::Value;

/// Returns the sum of all arguments.
///
/// ```lisp
/// (+ 1 2 3) => 6
/// (+ 1 2.5) => 3.500000
/// (+) => 0
/// ```
pub fn prim_add(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "+", args)?;
    let mut int_sum: i64 = 0;
    let mut dbl_sum = 0.0;
    let mut all_int = true;
    for (i, item) in items.iter().enumerate() {
        match number(interp, "+", *item, i + 1)? {
            Num::Int(n) => {
                int_sum += n;
                dbl_sum += n as f64;
            }
            Num::Double(d) => {
                all_int = false;
                dbl_sum += d;
            }
        }
    }
    Ok(if all_int {
        interp.heap.int(int_sum)
    } else {
        interp.heap.double(dbl_sum)
    })
}

/// Returns the product of all arguments (identity 1).
///
/// ```lisp
/// (* 2 3 4) => 24
/// (*) => 1
/// ```
pub fn prim_mul(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "*", args)?;
    let mut int_product: i64 = 1;
    let mut dbl_product = 1.0;
    let mut all_int = true;
    for (i, item) in items.iter().enumerate() {
        match number(interp, "*", *item, i + 1)? {
            Num::Int(n) => {
                int_product *= n;
                dbl_product *= n as f64;
            }
            Num::Double(d) => {
                all_int = false;
                dbl_product *= d;
            }
        }
    }
    Ok(if all_int {
        interp.heap.int(int_product)
    } else {
        interp.heap.double(dbl_product)
    })
}

/// Subtracts the sum of the remaining arguments from the first; a single
/// argument is negated.
///
/// ```lisp
/// (- 10 3 2) => 5
/// (- 5) => -5
/// ```
pub fn prim_sub(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "-", args)?;
    if items.is_empty() {
        return Err(EvalError::arity("-", ARITY_AT_LEAST_ONE, 0));
    }
    let first = number(interp, "-", items[0], 1)?;
    if items.len() == 1 {
        return Ok(match first {
            Num::Int(i) => interp.heap.int(-i),
            Num::Double(d) => interp.heap.double(-d),
        });
    }
    let mut int_rest: i64 = 0;
    let mut dbl_rest = 0.0;
    let mut all_int = matches!(first, Num::Int(_));
    for (i, item) in items[1..].iter().enumerate() {
        match number(interp, "-", *item, i + 2)? {
            Num::Int(n) => {
                int_rest += n;
                dbl_rest += n as f64;
            }
            Num::Double(d) => {
                all_int = false;
                dbl_rest += d;
            }
        }
    }
    Ok(match (all_int, first) {
        (true, Num::Int(i)) => interp.heap.int(i - int_rest),
        (_, first) => interp.heap.double(first.as_f64() - dbl_rest),
    })
}

/// Divides the first argument by the product of the rest; a single argument
/// yields its reciprocal. Always produces a double; any zero divisor errors.
///
/// ```lisp
/// (/ 20 4) => 5.000000
/// (/ 2) => 0.500000
/// ```
pub fn prim_div(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "/", args)?;
    if items.is_empty() {
        return Err(EvalError::arity("/", ARITY_AT_LEAST_ONE, 0));
    }
    let first = number(interp, "/", items[0], 1)?;
    if items.len() == 1 {
        if first.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        return Ok(interp.heap.double(1.0 / first.as_f64()));
    }
    let mut divisor = 1.0;
    for (i, item) in items[1..].iter().enumerate() {
        let n = number(interp, "/", *item, i + 2)?;
        if n.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        divisor *= n.as_f64();
    }
    Ok(interp.heap.double(first.as_f64() / divisor))
}

/// Integer modulo carrying the sign of a positive divisor.
///
/// ```lisp
/// (modulo 7 3) => 1
/// (modulo -7 3) => 2
/// ```
pub fn prim_modulo(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "modulo", args)?;
    if items.len() != 2 {
        return Err(EvalError::arity("modulo", ARITY_TWO, items.len()));
    }
    let ints: Vec<i64> = items
        .iter()
        .enumerate()
        .map(|(i, item)| match interp.heap.get(*item) {
            Value::Int(n) => Ok(*n),
            other => Err(EvalError::type_mismatch("modulo", "integer", other, i + 1)),
        })
        .collect::<Result<_, _>>()?;
    if ints[1] == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let mut remainder = ints[0] % ints[1];
    if remainder < 0 && ints[1] > 0 {
        remainder += ints[1];
    }
    Ok(interp.heap.int(remainder))
}

/// `#t` iff the argument is numerically zero.
pub fn prim_zero(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "zero?", args)?;
    if items.len() != 1 {
        return Err(EvalError::arity("zero?", ARITY_ONE, items.len()));
    }
    let n = number(interp, "zero?", items[0], 1)?;
    Ok(Heap::bool_ref(n.is_zero()))
}

pub fn register(interp: &mut Interpreter) {
    interp.define_primitive("+", prim_add);
    interp.define_primitive("-", prim_sub);
    interp.define_primitive("*", prim_mul);
    interp.define_primitive("/", prim_div);
    interp.define_primitive("modulo", prim_modulo);
    interp.define_primitive("zero?", prim_zero);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg_list(interp: &mut Interpreter, items: &[Value]) -> ValueRef {
        let refs: Vec<ValueRef> = items.iter().map(|v| interp.heap.alloc(v.clone())).collect();
        interp.list_from(refs)
    }

    fn expect_int(interp: &Interpreter, result: ValueRef, expected: i64) {
        match interp.heap.get(result) {
            Value::Int(i) => assert_eq!(*i, expected),
            other => panic!("expected Int({}), got {:?}", expected, other),
        }
    }

    fn expect_double(interp: &Interpreter, result: ValueRef, expected: f64) {
        match interp.heap.get(result) {
            Value::Double(d) => assert!((d - expected).abs() < 1e-9),
            other => panic!("expected Double({}), got {:?}", expected, other),
        }
    }

    #[test]
    fn test_add_preserves_integers() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(1), Value::Int(2), Value::Int(3)]);
        let result = prim_add(&mut interp, args).unwrap();
        expect_int(&interp, result, 6);
    }

    #[test]
    fn test_add_promotes_on_any_double() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(1), Value::Double(2.5)]);
        let result = prim_add(&mut interp, args).unwrap();
        expect_double(&interp, result, 3.5);
    }

    #[test]
    fn test_add_identity_is_zero() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[]);
        let result = prim_add(&mut interp, args).unwrap();
        expect_int(&interp, result, 0);
    }

    #[test]
    fn test_add_rejects_non_numbers() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(1), Value::Str("x".to_string())]);
        assert!(matches!(
            prim_add(&mut interp, args),
            Err(EvalError::TypeMismatch { position: 2, .. })
        ));
    }

    #[test]
    fn test_mul_identity_is_one() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[]);
        let result = prim_mul(&mut interp, args).unwrap();
        expect_int(&interp, result, 1);
    }

    #[test]
    fn test_sub_unary_negates_preserving_type() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(5)]);
        let result = prim_sub(&mut interp, args).unwrap();
        expect_int(&interp, result, -5);

        let args = arg_list(&mut interp, &[Value::Double(2.5)]);
        let result = prim_sub(&mut interp, args).unwrap();
        expect_double(&interp, result, -2.5);
    }

    #[test]
    fn test_sub_chains() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(10), Value::Int(3), Value::Int(2)]);
        let result = prim_sub(&mut interp, args).unwrap();
        expect_int(&interp, result, 5);

        let args = arg_list(&mut interp, &[Value::Int(10), Value::Double(0.5)]);
        let result = prim_sub(&mut interp, args).unwrap();
        expect_double(&interp, result, 9.5);
    }

    #[test]
    fn test_sub_requires_an_argument() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[]);
        assert!(matches!(
            prim_sub(&mut interp, args),
            Err(EvalError::Arity { .. })
        ));
    }

    #[test]
    fn test_div_is_always_double() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(20), Value::Int(4)]);
        let result = prim_div(&mut interp, args).unwrap();
        expect_double(&interp, result, 5.0);

        let args = arg_list(&mut interp, &[Value::Int(2)]);
        let result = prim_div(&mut interp, args).unwrap();
        expect_double(&interp, result, 0.5);
    }

    #[test]
    fn test_div_by_zero_errors() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(1), Value::Int(0)]);
        assert_eq!(prim_div(&mut interp, args), Err(EvalError::DivisionByZero));

        let args = arg_list(&mut interp, &[Value::Int(0)]);
        assert_eq!(prim_div(&mut interp, args), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_modulo_follows_positive_divisor_sign() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(7), Value::Int(3)]);
        let result = prim_modulo(&mut interp, args).unwrap();
        expect_int(&interp, result, 1);

        let args = arg_list(&mut interp, &[Value::Int(-7), Value::Int(3)]);
        let result = prim_modulo(&mut interp, args).unwrap();
        expect_int(&interp, result, 2);
    }

    #[test]
    fn test_modulo_requires_integers() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Double(7.0), Value::Int(3)]);
        assert!(matches!(
            prim_modulo(&mut interp, args),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_predicate() {
        let mut interp = Interpreter::new();
        let args = arg_list(&mut interp, &[Value::Int(0)]);
        let result = prim_zero(&mut interp, args).unwrap();
        assert!(matches!(interp.heap.get(result), Value::Bool(true)));

        let args = arg_list(&mut interp, &[Value::Double(0.1)]);
        let result = prim_zero(&mut interp, args).unwrap();
        assert!(matches!(interp.heap.get(result), Value::Bool(false)));
    }
}
