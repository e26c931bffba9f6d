//! Procedure application and aborts: apply, error

use super::expect_args;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::eval::Interpreter;
use crate::heap::ValueRef;
use crate::value::Value;

/// Applies a procedure to a list of arguments.
///
/// ```lisp
/// (apply + (list 1 2 3)) => 6
/// ```
pub fn prim_apply(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "apply", args)?;
    if items.len() != 2 {
        return Err(EvalError::arity("apply", ARITY_TWO, items.len()));
    }
    match interp.heap.get(items[0]) {
        Value::Closure(_) | Value::Primitive(_) => interp.apply(items[0], items[1]),
        other => Err(EvalError::type_mismatch("apply", "procedure", other, 1)),
    }
}

/// Aborts evaluation with the given message.
///
/// ```lisp
/// (error "unreachable state")
/// ```
pub fn prim_error(interp: &mut Interpreter, args: ValueRef) -> Result<ValueRef, EvalError> {
    let items = expect_args(interp, "error", args)?;
    if items.len() != 1 {
        return Err(EvalError::arity("error", ARITY_ONE, items.len()));
    }
    match interp.heap.get(items[0]) {
        Value::Str(message) => Err(EvalError::Raised(message.clone())),
        other => Err(EvalError::type_mismatch("error", "string", other, 1)),
    }
}

pub fn register(interp: &mut Interpreter) {
    interp.define_primitive("apply", prim_apply);
    interp.define_primitive("error", prim_error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env;
    use crate::heap;

    #[test]
    fn test_apply_invokes_a_primitive() {
        let mut interp = Interpreter::new();
        let global = interp.global();
        let plus = env::lookup(&interp.heap, global, "+").unwrap();
        let one = interp.heap.int(1);
        let two = interp.heap.int(2);
        let arg_list = interp.list_from(vec![one, two]);

        let args = interp.list_from(vec![plus, arg_list]);
        let result = prim_apply(&mut interp, args).unwrap();
        assert!(matches!(interp.heap.get(result), Value::Int(3)));
    }

    #[test]
    fn test_apply_rejects_non_procedures() {
        let mut interp = Interpreter::new();
        let one = interp.heap.int(1);
        let args = interp.list_from(vec![one, heap::NULL]);
        assert!(matches!(
            prim_apply(&mut interp, args),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_error_raises_its_message() {
        let mut interp = Interpreter::new();
        let message = interp.heap.string("boom");
        let args = interp.list_from(vec![message]);
        assert_eq!(
            prim_error(&mut interp, args),
            Err(EvalError::Raised("boom".to_string()))
        );
    }

    #[test]
    fn test_error_requires_a_string() {
        let mut interp = Interpreter::new();
        let n = interp.heap.int(5);
        let args = interp.list_from(vec![n]);
        assert!(matches!(
            prim_error(&mut interp, args),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}
