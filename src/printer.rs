// ABOUTME: Renders values back to Scheme notation

use crate::heap::{Heap, ValueRef};
use crate::value::Value;
use std::fmt;

/// The two display contexts share one printer; they differ only in whether
/// strings keep their quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintStyle {
    /// Parse-tree display: strings are quoted.
    Tree,
    /// Top-level result display: strings are bare.
    Result,
}

/// A value borrowed from the heap, ready for `{}` formatting.
pub struct Shown<'a> {
    heap: &'a Heap,
    value: ValueRef,
    style: PrintStyle,
}

pub fn show(heap: &Heap, value: ValueRef, style: PrintStyle) -> Shown<'_> {
    Shown { heap, value, style }
}

impl fmt::Display for Shown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(self.value, f)
    }
}

impl Shown<'_> {
    fn write(&self, value: ValueRef, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.heap.get(value) {
            Value::Int(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{:.6}", d),
            Value::Str(s) => match self.style {
                PrintStyle::Tree => write!(f, "\"{}\"", s),
                PrintStyle::Result => write!(f, "{}", s),
            },
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::Null => write!(f, "()"),
            Value::Void => Ok(()),
            Value::Closure(_) | Value::Primitive(_) => write!(f, "#procedure"),
            Value::Cons(car, cdr) => {
                write!(f, "(")?;
                self.write(*car, f)?;
                let mut rest = *cdr;
                loop {
                    match self.heap.get(rest) {
                        Value::Cons(car, cdr) => {
                            write!(f, " ")?;
                            self.write(*car, f)?;
                            rest = *cdr;
                        }
                        Value::Null => break,
                        _ => {
                            write!(f, " . ")?;
                            self.write(rest, f)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{FALSE, NULL, TRUE, VOID};

    fn result_of(heap: &Heap, v: ValueRef) -> String {
        show(heap, v, PrintStyle::Result).to_string()
    }

    #[test]
    fn test_atoms() {
        let mut heap = Heap::new();
        let i = heap.int(42);
        let d = heap.double(3.14);
        let s = heap.symbol("foo");
        assert_eq!(result_of(&heap, i), "42");
        assert_eq!(result_of(&heap, d), "3.140000");
        assert_eq!(result_of(&heap, s), "foo");
        assert_eq!(result_of(&heap, TRUE), "#t");
        assert_eq!(result_of(&heap, FALSE), "#f");
        assert_eq!(result_of(&heap, NULL), "()");
    }

    #[test]
    fn test_void_renders_nothing() {
        let heap = Heap::new();
        assert_eq!(result_of(&heap, VOID), "");
    }

    #[test]
    fn test_string_quoting_depends_on_style() {
        let mut heap = Heap::new();
        let s = heap.string("hi");
        assert_eq!(show(&heap, s, PrintStyle::Tree).to_string(), "\"hi\"");
        assert_eq!(show(&heap, s, PrintStyle::Result).to_string(), "hi");
    }

    #[test]
    fn test_proper_and_improper_lists() {
        let mut heap = Heap::new();
        let one = heap.int(1);
        let two = heap.int(2);
        let three = heap.int(3);

        let proper = {
            let tail = heap.cons(three, NULL);
            let mid = heap.cons(two, tail);
            heap.cons(one, mid)
        };
        assert_eq!(result_of(&heap, proper), "(1 2 3)");

        let improper = {
            let tail = heap.cons(two, three);
            heap.cons(one, tail)
        };
        assert_eq!(result_of(&heap, improper), "(1 2 . 3)");
    }

    #[test]
    fn test_nested_lists() {
        let mut heap = Heap::new();
        let one = heap.int(1);
        let two = heap.int(2);
        let inner = heap.cons(two, NULL);
        let outer_tail = heap.cons(inner, NULL);
        let outer = heap.cons(one, outer_tail);
        assert_eq!(result_of(&heap, outer), "(1 (2))");
    }
}
