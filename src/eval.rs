// ABOUTME: Evaluator executing parsed expressions against environment frames

use crate::builtins;
use crate::env::{self, Frame};
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO, ARITY_TWO_OR_THREE};
use crate::heap::{self, FrameRef, Heap, ValueRef};
use crate::printer::{show, PrintStyle};
use crate::value::{Closure, Primitive, PrimitiveFn, Value};
use std::io;

/// Names seeded into the global frame bound to their own symbol value. The
/// evaluator recognizes them after evaluating a combination head, so a later
/// `define` of the same name shadows the form.
const SPECIAL_FORMS: &[&str] = &[
    "if", "quote", "lambda", "let", "let*", "letrec", "define", "set!", "and", "or", "begin",
    "cond", "else",
];

pub struct Interpreter {
    pub heap: Heap,
    global: FrameRef,
    in_cond: bool,
}

impl Interpreter {
    /// A fresh interpreter with special forms and primitives installed in
    /// the global frame.
    pub fn new() -> Self {
        let mut heap = Heap::new();
        let global = heap.alloc_frame(Frame::global());
        let mut interp = Interpreter {
            heap,
            global,
            in_cond: false,
        };
        for name in SPECIAL_FORMS {
            let sym = interp.heap.symbol(*name);
            env::define(&mut interp.heap, global, *name, sym);
        }
        builtins::register_builtins(&mut interp);
        interp
    }

    pub fn global(&self) -> FrameRef {
        self.global
    }

    pub fn define_primitive(&mut self, name: &'static str, func: PrimitiveFn) {
        let value = self.heap.alloc(Value::Primitive(Primitive { name, func }));
        env::define(&mut self.heap, self.global, name, value);
    }

    /// Evaluate each top-level form of `program` in the global environment,
    /// render every non-Void result to `out`, and sweep the heap between
    /// forms with the remaining program and the global frame as roots.
    pub fn run<W: io::Write>(&mut self, program: ValueRef, out: &mut W) -> Result<(), EvalError> {
        let mut remaining = program;
        while let Value::Cons(form, rest) = self.heap.get(remaining).clone() {
            let result = self.eval(form, self.global)?;
            if !matches!(self.heap.get(result), Value::Void) {
                writeln!(out, "{}", show(&self.heap, result, PrintStyle::Result))
                    .map_err(|e| EvalError::Raised(format!("broken output stream: {}", e)))?;
            }
            remaining = rest;
            self.heap.sweep(&[remaining], &[self.global]);
        }
        Ok(())
    }

    pub fn eval(&mut self, expr: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        match self.heap.get(expr).clone() {
            // Self-evaluating
            Value::Int(_)
            | Value::Double(_)
            | Value::Str(_)
            | Value::Bool(_)
            | Value::Null
            | Value::Void
            | Value::Closure(_)
            | Value::Primitive(_) => Ok(expr),

            Value::Symbol(name) => env::lookup(&self.heap, frame, &name),

            Value::Cons(head, tail) => self.eval_combination(expr, head, tail, frame),
        }
    }

    /// Apply a procedure to a proper list of already-evaluated arguments.
    pub fn apply(&mut self, proc: ValueRef, args: ValueRef) -> Result<ValueRef, EvalError> {
        match self.heap.get(proc).clone() {
            Value::Primitive(p) => (p.func)(self, args),
            Value::Closure(c) => {
                let child = self.heap.alloc_frame(Frame::child_of(c.env));
                match self.heap.get(c.params).clone() {
                    // Variadic: the single parameter receives the whole list.
                    Value::Symbol(name) => env::define(&mut self.heap, child, name, args),
                    Value::Null | Value::Cons(..) => {
                        let params = self
                            .try_list(c.params)
                            .ok_or(EvalError::ArgumentMismatch)?;
                        let values = self.try_list(args).ok_or(EvalError::ArgumentMismatch)?;
                        if params.len() != values.len() {
                            return Err(EvalError::ArgumentMismatch);
                        }
                        for (param, value) in params.into_iter().zip(values) {
                            match self.heap.get(param).clone() {
                                Value::Symbol(name) => {
                                    env::define(&mut self.heap, child, name, value);
                                }
                                _ => {
                                    return Err(EvalError::bad_form(
                                        "lambda",
                                        "non-symbol as parameter name",
                                    ));
                                }
                            }
                        }
                    }
                    _ => {
                        return Err(EvalError::bad_form(
                            "lambda",
                            "parameters should be a list or symbol",
                        ));
                    }
                }
                self.eval(c.body, child)
            }
            _ => Err(EvalError::NotCallable),
        }
    }

    fn eval_combination(
        &mut self,
        expr: ValueRef,
        head: ValueRef,
        tail: ValueRef,
        frame: FrameRef,
    ) -> Result<ValueRef, EvalError> {
        let op = self.eval(head, frame)?;
        match self.heap.get(op).clone() {
            Value::Symbol(name) => match name.as_str() {
                "if" => self.eval_if(tail, frame),
                "quote" => self.eval_quote(tail),
                "lambda" => self.eval_lambda(tail, frame),
                "let" => self.eval_let(tail, frame),
                "let*" => self.eval_let_star(tail, frame),
                "letrec" => self.eval_letrec(tail, frame),
                "define" => self.eval_define(tail),
                "set!" => self.eval_set(tail, frame),
                "and" => self.eval_and(tail, frame),
                "or" => self.eval_or(tail, frame),
                "begin" => self.eval_begin(tail, frame),
                "cond" => self.eval_cond(tail, frame),
                "else" => {
                    if self.in_cond {
                        Ok(expr)
                    } else {
                        Err(EvalError::ElseOutsideCond)
                    }
                }
                _ => Err(EvalError::UnrecognizedForm),
            },
            Value::Closure(_) | Value::Primitive(_) => {
                let args = self.eval_args(tail, frame)?;
                self.apply(op, args)
            }
            _ => Err(EvalError::NotCallable),
        }
    }

    /// Evaluate a combination's operands left-to-right into a fresh list.
    fn eval_args(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let operands = self
            .try_list(tail)
            .ok_or_else(|| EvalError::bad_form("application", "improper argument list"))?;
        let mut values = Vec::with_capacity(operands.len());
        for operand in operands {
            values.push(self.eval(operand, frame)?);
        }
        Ok(self.list_from(values))
    }

    // ===== Special forms =====

    fn eval_if(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("if", tail)?;
        if items.len() < 2 || items.len() > 3 {
            return Err(EvalError::arity("if", ARITY_TWO_OR_THREE, items.len()));
        }
        let test = self.eval(items[0], frame)?;
        if self.heap.get(test).is_false() {
            match items.get(2) {
                Some(alternative) => self.eval(*alternative, frame),
                None => Ok(heap::VOID),
            }
        } else {
            self.eval(items[1], frame)
        }
    }

    fn eval_quote(&mut self, tail: ValueRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("quote", tail)?;
        if items.len() != 1 {
            return Err(EvalError::arity("quote", ARITY_ONE, items.len()));
        }
        Ok(items[0])
    }

    fn eval_lambda(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("lambda", tail)?;
        if items.len() != 2 {
            return Err(EvalError::arity("lambda", ARITY_TWO, items.len()));
        }
        self.validate_params("lambda", items[0])?;
        Ok(self.heap.alloc(Value::Closure(Closure {
            params: items[0],
            body: items[1],
            env: frame,
        })))
    }

    fn eval_let(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("let", tail)?;
        if items.len() < 2 {
            return Err(EvalError::bad_form(
                "let",
                "bad syntax (missing binding pairs or body)",
            ));
        }
        let pairs = self.binding_pairs("let", items[0])?;
        let child = self.heap.alloc_frame(Frame::child_of(frame));
        for (name, init) in pairs {
            if env::bound_in_frame(&self.heap, child, &name) {
                return Err(EvalError::bad_form(
                    "let",
                    format!("duplicate symbol '{}'", name),
                ));
            }
            // Inits see the enclosing frame, not each other.
            let value = self.eval(init, frame)?;
            env::define(&mut self.heap, child, name, value);
        }
        self.eval_body(&items[1..], child)
    }

    fn eval_let_star(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("let*", tail)?;
        if items.len() < 2 {
            return Err(EvalError::bad_form(
                "let*",
                "bad syntax (missing binding pairs or body)",
            ));
        }
        let pairs = self.binding_pairs("let*", items[0])?;
        let mut seen: Vec<String> = Vec::new();
        let mut current = frame;
        for (name, init) in pairs {
            if seen.contains(&name) {
                return Err(EvalError::bad_form(
                    "let*",
                    format!("duplicate symbol '{}'", name),
                ));
            }
            // Each init sees the bindings introduced before it.
            let value = self.eval(init, current)?;
            let child = self.heap.alloc_frame(Frame::child_of(current));
            env::define(&mut self.heap, child, name.clone(), value);
            seen.push(name);
            current = child;
        }
        self.eval_body(&items[1..], current)
    }

    fn eval_letrec(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("letrec", tail)?;
        if items.len() < 2 {
            return Err(EvalError::bad_form(
                "letrec",
                "bad syntax (missing binding pairs or body)",
            ));
        }
        let pairs = self.binding_pairs("letrec", items[0])?;
        let child = self.heap.alloc_frame(Frame::child_of(frame));
        for (name, _) in &pairs {
            if env::bound_in_frame(&self.heap, child, name) {
                return Err(EvalError::bad_form(
                    "letrec",
                    format!("duplicate symbol '{}'", name),
                ));
            }
            // Placeholder until the init is evaluated below.
            env::define(&mut self.heap, child, name.clone(), heap::NULL);
        }
        for (index, (_, init)) in pairs.iter().enumerate() {
            let value = self.eval(*init, child)?;
            self.heap.frame_mut(child).bindings[index].value = value;
        }
        self.eval_body(&items[1..], child)
    }

    fn eval_define(&mut self, tail: ValueRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("define", tail)?;
        if items.len() != 2 {
            return Err(EvalError::arity("define", ARITY_TWO, items.len()));
        }
        let global = self.global;
        match self.heap.get(items[0]).clone() {
            Value::Symbol(name) => {
                // Always evaluated in and bound into the global frame.
                let value = self.eval(items[1], global)?;
                env::define(&mut self.heap, global, name, value);
                Ok(heap::VOID)
            }
            // Function shorthand: (define (f a b) body)
            Value::Cons(name_ref, params) => {
                let Value::Symbol(name) = self.heap.get(name_ref).clone() else {
                    return Err(EvalError::bad_form(
                        "define",
                        "function name must be a symbol",
                    ));
                };
                self.validate_params("define", params)?;
                let closure = self.heap.alloc(Value::Closure(Closure {
                    params,
                    body: items[1],
                    env: global,
                }));
                env::define(&mut self.heap, global, name, closure);
                Ok(heap::VOID)
            }
            _ => Err(EvalError::bad_form(
                "define",
                "assignment to non-symbol value",
            )),
        }
    }

    fn eval_set(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("set!", tail)?;
        if items.len() != 2 {
            return Err(EvalError::arity("set!", ARITY_TWO, items.len()));
        }
        let Value::Symbol(name) = self.heap.get(items[0]).clone() else {
            return Err(EvalError::bad_form(
                "set!",
                "assignment to non-symbol value",
            ));
        };
        let value = self.eval(items[1], frame)?;
        env::assign(&mut self.heap, frame, &name, value)?;
        Ok(heap::VOID)
    }

    fn eval_and(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("and", tail)?;
        if items.len() != 2 {
            return Err(EvalError::arity("and", ARITY_TWO, items.len()));
        }
        let first = self.eval(items[0], frame)?;
        if self.heap.get(first).is_false() {
            Ok(first)
        } else {
            self.eval(items[1], frame)
        }
    }

    fn eval_or(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("or", tail)?;
        if items.len() != 2 {
            return Err(EvalError::arity("or", ARITY_TWO, items.len()));
        }
        let first = self.eval(items[0], frame)?;
        if self.heap.get(first).is_false() {
            self.eval(items[1], frame)
        } else {
            Ok(first)
        }
    }

    fn eval_begin(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let items = self.form_items("begin", tail)?;
        if items.is_empty() {
            return Ok(heap::NULL);
        }
        self.eval_body(&items, frame)
    }

    fn eval_cond(&mut self, tail: ValueRef, frame: FrameRef) -> Result<ValueRef, EvalError> {
        let clauses = self.form_items("cond", tail)?;
        for clause in clauses {
            let parts = self
                .try_list(clause)
                .filter(|parts| !parts.is_empty())
                .ok_or_else(|| EvalError::bad_form("cond", "clause must be a list"))?;
            match parts.len() {
                // A lone expression is the result when its clause is reached.
                1 => return self.eval(parts[0], frame),
                2 => {
                    self.in_cond = true;
                    let test = self.eval(parts[0], frame);
                    self.in_cond = false;
                    let test = test?;
                    if !self.heap.get(test).is_false() {
                        return self.eval(parts[1], frame);
                    }
                }
                _ => {
                    return Err(EvalError::bad_form(
                        "cond",
                        "clause must have one or two expressions",
                    ));
                }
            }
        }
        Ok(heap::VOID)
    }

    // ===== Shared helpers =====

    /// Evaluate body forms in order; yield the last.
    fn eval_body(&mut self, forms: &[ValueRef], frame: FrameRef) -> Result<ValueRef, EvalError> {
        let mut result = heap::VOID;
        for form in forms {
            result = self.eval(*form, frame)?;
        }
        Ok(result)
    }

    /// The elements of a proper list, or None for an improper one.
    pub(crate) fn try_list(&self, mut list: ValueRef) -> Option<Vec<ValueRef>> {
        let mut items = Vec::new();
        loop {
            match self.heap.get(list) {
                Value::Null => return Some(items),
                Value::Cons(car, cdr) => {
                    items.push(*car);
                    list = *cdr;
                }
                _ => return None,
            }
        }
    }

    /// Build a proper list from evaluated items.
    pub(crate) fn list_from(&mut self, items: Vec<ValueRef>) -> ValueRef {
        let mut list = heap::NULL;
        for item in items.into_iter().rev() {
            list = self.heap.cons(item, list);
        }
        list
    }

    fn form_items(
        &self,
        form: &'static str,
        tail: ValueRef,
    ) -> Result<Vec<ValueRef>, EvalError> {
        self.try_list(tail)
            .ok_or_else(|| EvalError::bad_form(form, "malformed expression"))
    }

    /// Params must be Null, a proper list of distinct symbols, or a single
    /// symbol (variadic).
    fn validate_params(&self, form: &'static str, params: ValueRef) -> Result<(), EvalError> {
        match self.heap.get(params) {
            Value::Null | Value::Symbol(_) => Ok(()),
            Value::Cons(..) => {
                let items = self.try_list(params).ok_or_else(|| {
                    EvalError::bad_form(form, "parameters should be a list or symbol")
                })?;
                let mut names: Vec<&str> = Vec::with_capacity(items.len());
                for item in &items {
                    match self.heap.get(*item) {
                        Value::Symbol(name) => {
                            if names.contains(&name.as_str()) {
                                return Err(EvalError::bad_form(form, "duplicate argument names"));
                            }
                            names.push(name);
                        }
                        _ => {
                            return Err(EvalError::bad_form(form, "non-symbol as parameter name"));
                        }
                    }
                }
                Ok(())
            }
            _ => Err(EvalError::bad_form(
                form,
                "parameters should be a list or symbol",
            )),
        }
    }

    fn binding_pairs(
        &self,
        form: &'static str,
        bindings: ValueRef,
    ) -> Result<Vec<(String, ValueRef)>, EvalError> {
        let pairs = self
            .try_list(bindings)
            .ok_or_else(|| EvalError::bad_form(form, "bindings must be a list"))?;
        let mut out = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let items = self
                .try_list(pair)
                .filter(|items| items.len() == 2)
                .ok_or_else(|| EvalError::bad_form(form, "binding must be a (symbol value) pair"))?;
            match self.heap.get(items[0]).clone() {
                Value::Symbol(name) => out.push((name, items[1])),
                _ => {
                    return Err(EvalError::bad_form(form, "assignment to non-symbol value"));
                }
            }
        }
        Ok(out)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
