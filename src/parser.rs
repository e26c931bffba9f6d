// ABOUTME: Parser turning tokens into a heap-allocated S-expression forest

use crate::error::SyntaxError;
use crate::heap::{self, Heap, ValueRef};
use crate::lexer::Token;
use crate::value::Value;

enum StackItem {
    Open,
    Quote,
    Dot,
    Datum(ValueRef),
}

/// Shift/reduce over a stack: every non-paren token is pushed; `)` pops back
/// to the nearest `(` and packages the popped items into a list, honoring a
/// single `.` improper-tail marker. Returns the top-level forms in source
/// order as a proper list.
pub fn parse(tokens: &[Token], heap: &mut Heap) -> Result<ValueRef, SyntaxError> {
    let mut stack: Vec<StackItem> = Vec::new();
    let mut depth: i32 = 0;

    for token in tokens {
        match token {
            Token::Open => {
                depth += 1;
                stack.push(StackItem::Open);
            }
            Token::Quote => stack.push(StackItem::Quote),
            Token::Dot => stack.push(StackItem::Dot),
            Token::Close => {
                depth -= 1;
                if depth < 0 {
                    return Err(SyntaxError::TooManyCloseParens);
                }
                let list = reduce_list(&mut stack, heap)?;
                push_datum(&mut stack, heap, list);
            }
            Token::Int(i) => {
                let v = heap.int(*i);
                push_datum(&mut stack, heap, v);
            }
            Token::Double(d) => {
                let v = heap.double(*d);
                push_datum(&mut stack, heap, v);
            }
            Token::Str(s) => {
                let v = heap.string(s.clone());
                push_datum(&mut stack, heap, v);
            }
            Token::Symbol(s) => {
                let v = heap.symbol(s.clone());
                push_datum(&mut stack, heap, v);
            }
            Token::Bool(b) => push_datum(&mut stack, heap, Heap::bool_ref(*b)),
        }
    }

    if depth > 0 {
        return Err(SyntaxError::NotEnoughCloseParens);
    }

    // Collect the remaining top-level data, restoring source order.
    let mut forms = heap::NULL;
    for item in stack.into_iter().rev() {
        match item {
            StackItem::Datum(v) => forms = heap.cons(v, forms),
            StackItem::Quote => return Err(SyntaxError::DanglingQuote),
            StackItem::Dot => return Err(SyntaxError::IllegalDot),
            StackItem::Open => return Err(SyntaxError::NotEnoughCloseParens),
        }
    }
    Ok(forms)
}

/// Pop back to the nearest Open marker, building the list popped-in-reverse.
/// A Dot marker must sit before exactly one final datum and after at least
/// one element.
fn reduce_list(stack: &mut Vec<StackItem>, heap: &mut Heap) -> Result<ValueRef, SyntaxError> {
    let mut acc = heap::NULL;
    let mut after_dot = 0usize;
    let mut saw_dot = false;
    loop {
        match stack.pop() {
            Some(StackItem::Open) => {
                if saw_dot && after_dot == 0 {
                    return Err(SyntaxError::IllegalDot);
                }
                return Ok(acc);
            }
            Some(StackItem::Datum(v)) => {
                acc = heap.cons(v, acc);
                after_dot += 1;
            }
            Some(StackItem::Dot) => {
                if saw_dot || after_dot != 1 {
                    return Err(SyntaxError::IllegalDot);
                }
                // Unwrap the single-element list into a bare tail.
                if let Value::Cons(tail, _) = heap.get(acc) {
                    acc = *tail;
                }
                saw_dot = true;
                after_dot = 0;
            }
            Some(StackItem::Quote) => return Err(SyntaxError::DanglingQuote),
            None => return Err(SyntaxError::TooManyCloseParens),
        }
    }
}

/// Push a datum, expanding any pending quote markers right-associatively:
/// `''x` becomes `(quote (quote x))`.
fn push_datum(stack: &mut Vec<StackItem>, heap: &mut Heap, mut datum: ValueRef) {
    while matches!(stack.last(), Some(StackItem::Quote)) {
        stack.pop();
        let quote = heap.symbol("quote");
        let rest = heap.cons(datum, heap::NULL);
        datum = heap.cons(quote, rest);
    }
    stack.push(StackItem::Datum(datum));
}
