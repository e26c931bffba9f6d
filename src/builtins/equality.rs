//! Equality predicates: equal?, eq?
//!
//! `equal?` compares structure recursively; `eq?` compares atoms by value
//! and pairs, closures, and primitives by heap identity.

use super::expect_args;
use crate::error::{EvalError, ARITY_TWO};
use crate::eval::Interpreter;
use crate::heap::{Heap, ValueRef};
use crate::value::Value;

fn trees_equal(heap: &Heap, a: ValueRef, b: ValueRef) -> bool {
    match (heap.get(a), heap.get(b)) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Double(x), Value::Double(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Null, Value::Null) | (Value::Void, Value::Void) => true,
        (Value::Cons(car_a, cdr_a), Value::Cons(car_b, cdr_b)) => {
            let (car_a, cdr_a, car_b, cdr_b) = (*car_a, *cdr_a, *car_b, *cdr_b);
            trees_equal(heap, car_a, car_b) && trees_equal(heap, cdr_a, cdr_b)
        }
        (Value::Closure(_), Value::Closure(_)) | (Value::Primitive(_), Value::Primitive(_)) => {
            a == b
        }
        _ => false,
    }
}

/// Structural equality: same tag, same structure, same leaves by value.
///
/// ```lisp
/// (equal? (list 1 2) (list 1 2)) => #t
/// (equal? 1 1.0) => #f
/// ```
pub fn prim_equal(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "equal?", args)?;
    if items.len() != 2 {
        return Err(EvalError::arity("equal?", ARITY_TWO, items.len()));
    }
    Ok(Heap::bool_ref(trees_equal(&interp.heap, items[0], items[1])))
}

/// Value equality for atoms; identity for pairs, closures, and primitives.
///
/// ```lisp
/// (eq? 'a 'a) => #t
/// (eq? (list 1 2) (list 1 2)) => #f
/// ```
pub fn prim_eq(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "eq?", args)?;
    if items.len() != 2 {
        return Err(EvalError::arity("eq?", ARITY_TWO, items.len()));
    }
    let (a, b) = (items[0], items[1]);
    let result = match (interp.heap.get(a), interp.heap.get(b)) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Double(x), Value::Double(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Null, Value::Null) | (Value::Void, Value::Void) => true,
        (Value::Cons(..), Value::Cons(..))
        | (Value::Closure(_), Value::Closure(_))
        | (Value::Primitive(_), Value::Primitive(_)) => a == b,
        _ => false,
    };
    Ok(Heap::bool_ref(result))
}

pub fn register(interp: &mut Interpreter) {
    interp.define_primitive("equal?", prim_equal);
    interp.define_primitive("eq?", prim_eq);
}
