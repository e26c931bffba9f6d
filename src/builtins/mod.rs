//! # Built-in Procedures
//!
//! Native procedures installed in the global frame, organized by category:
//!
//! - **[arithmetic]** (6): `+`, `-`, `*`, `/`, `modulo`, `zero?`
//! - **[comparison]** (2): `=`, `<=`
//! - **[lists]** (7): `cons`, `car`, `cdr`, `list`, `append`, `null?`, `pair?`
//! - **[equality]** (2): `equal?`, `eq?`
//! - **[control]** (2): `apply`, `error`
//!
//! Each category is a sub-module with a `register` function that installs
//! its bindings. Every primitive validates arity and argument types and
//! fails with a descriptive error on mismatch.

use crate::error::EvalError;
use crate::eval::Interpreter;
use crate::heap::ValueRef;
use crate::value::Value;

pub mod arithmetic;
pub mod comparison;
pub mod control;
pub mod equality;
pub mod lists;

/// Register all built-in procedures in the global frame.
pub fn register_builtins(interp: &mut Interpreter) {
    arithmetic::register(interp);
    comparison::register(interp);
    lists::register(interp);
    equality::register(interp);
    control::register(interp);
}

/// The elements of a primitive's argument list. Arguments arrive as a
/// proper list; anything else indicates a malformed `apply` call.
pub(crate) fn expect_args(
    interp: &Interpreter,
    function: &'static str,
    args: ValueRef,
) -> Result<Vec<ValueRef>, EvalError> {
    interp
        .try_list(args)
        .ok_or_else(|| EvalError::bad_form(function, "expected a proper argument list"))
}

/// A numeric argument, preserving its integer/double distinction.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Num {
    Int(i64),
    Double(f64),
}

impl Num {
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Double(d) => d,
        }
    }

    pub(crate) fn is_zero(self) -> bool {
        match self {
            Num::Int(i) => i == 0,
            Num::Double(d) => d == 0.0,
        }
    }
}

pub(crate) fn number(
    interp: &Interpreter,
    function: &'static str,
    value: ValueRef,
    position: usize,
) -> Result<Num, EvalError> {
    match interp.heap.get(value) {
        Value::Int(i) => Ok(Num::Int(*i)),
        Value::Double(d) => Ok(Num::Double(*d)),
        other => Err(EvalError::type_mismatch(function, "number", other, position)),
    }
}
