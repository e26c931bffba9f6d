//! List operations: cons, car, cdr, list, append, null?, pair?
//!
//! Pairs are heap cells; a list is `()` or a pair whose cdr is a list, and
//! improper lists are permitted as the general pair graph.

use super::expect_args;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::eval::Interpreter;
use crate::heap::{self, Heap, ValueRef};
use crate::value::Value;

/// Builds a pair.
///
/// ```lisp
/// (cons 1 '(2 3)) => (1 2 3)
/// (cons 1 2) => (1 . 2)
/// ```
pub fn prim_cons(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "cons", args)?;
    if items.len() != 2 {
        return Err(EvalError::arity("cons", ARITY_TWO, items.len()));
    }
    Ok(interp.heap.cons(items[0], items[1]))
}

/// The car of a pair.
pub fn prim_car(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "car", args)?;
    if items.len() != 1 {
        return Err(EvalError::arity("car", ARITY_ONE, items.len()));
    }
    match interp.heap.get(items[0]) {
        Value::Cons(car, _) => Ok(*car),
        other => Err(EvalError::type_mismatch("car", "pair", other, 1)),
    }
}

/// The cdr of a pair.
pub fn prim_cdr(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "cdr", args)?;
    if items.len() != 1 {
        return Err(EvalError::arity("cdr", ARITY_ONE, items.len()));
    }
    match interp.heap.get(items[0]) {
        Value::Cons(_, cdr) => Ok(*cdr),
        other => Err(EvalError::type_mismatch("cdr", "pair", other, 1)),
    }
}

/// Returns its argument list verbatim.
///
/// ```lisp
/// (list 1 2 3) => (1 2 3)
/// (list) => ()
/// ```
pub fn prim_list(_interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    Ok(args)
}

/// Concatenates lists. Every argument but the last must be a proper list
/// and is copied; the last is shared verbatim, so an improper tail is
/// permitted there.
///
/// ```lisp
/// (append '(1 2) '(3)) => (1 2 3)
/// (append '(1) 2) => (1 . 2)
/// (append) => ()
/// ```
pub fn prim_append(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "append", args)?;
    let Some((last, init)) = items.split_last() else {
        return Ok(heap::NULL);
    };
    let mut prefix = Vec::new();
    for (i, list) in init.iter().enumerate() {
        let elements = interp.try_list(*list).ok_or_else(|| {
            EvalError::type_mismatch("append", "list", interp.heap.get(*list), i + 1)
        })?;
        prefix.extend(elements);
    }
    let mut result = *last;
    for element in prefix.into_iter().rev() {
        result = interp.heap.cons(element, result);
    }
    Ok(result)
}

/// `#t` iff the argument is the empty list.
pub fn prim_null(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "null?", args)?;
    if items.len() != 1 {
        return Err(EvalError::arity("null?", ARITY_ONE, items.len()));
    }
    Ok(Heap::bool_ref(matches!(
        interp.heap.get(items[0]),
        Value::Null
    )))
}

/// `#t` iff the argument is a pair.
pub fn prim_pair(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "pair?", args)?;
    if items.len() != 1 {
        return Err(EvalError::arity("pair?", ARITY_ONE, items.len()));
    }
    Ok(Heap::bool_ref(matches!(
        interp.heap.get(items[0]),
        Value::Cons(..)
    )))
}

pub fn register(interp: &mut Interpreter) {
    interp.define_primitive("cons", prim_cons);
    interp.define_primitive("car", prim_car);
    interp.define_primitive("cdr", prim_cdr);
    interp.define_primitive("list", prim_list);
    interp.define_primitive("append", prim_append);
    interp.define_primitive("null?", prim_null);
    interp.define_primitive("pair?", prim_pair);
}
