// ABOUTME: Environment frames for managing variable bindings and scopes

use crate::error::EvalError;
use crate::heap::{FrameRef, Heap, ValueRef};

/// A link in the lexical environment: a parent pointer plus a binding list.
/// The global frame is the only one without a parent. Bindings are scanned
/// newest-first so the most recent binding shadows earlier entries within
/// the same frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub parent: Option<FrameRef>,
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub value: ValueRef,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: ValueRef) -> Self {
        Binding {
            name: name.into(),
            value,
        }
    }
}

impl Frame {
    pub fn global() -> Self {
        Frame {
            parent: None,
            bindings: Vec::new(),
        }
    }

    pub fn child_of(parent: FrameRef) -> Self {
        Frame {
            parent: Some(parent),
            bindings: Vec::new(),
        }
    }
}

/// Add a binding to THIS frame (doesn't walk the parent chain).
pub fn define(heap: &mut Heap, frame: FrameRef, name: impl Into<String>, value: ValueRef) {
    heap.frame_mut(frame).bindings.push(Binding::new(name, value));
}

/// Look up a symbol in this frame and its ancestors.
pub fn lookup(heap: &Heap, frame: FrameRef, name: &str) -> Result<ValueRef, EvalError> {
    let mut current = Some(frame);
    while let Some(r) = current {
        let frame = heap.frame(r);
        if let Some(binding) = frame.bindings.iter().rev().find(|b| b.name == name) {
            return Ok(binding.value);
        }
        current = frame.parent;
    }
    Err(EvalError::UndefinedSymbol(name.to_string()))
}

/// Replace the value of the nearest enclosing binding in place (set!).
pub fn assign(
    heap: &mut Heap,
    frame: FrameRef,
    name: &str,
    value: ValueRef,
) -> Result<(), EvalError> {
    let mut current = Some(frame);
    while let Some(r) = current {
        let frame = heap.frame_mut(r);
        if let Some(binding) = frame.bindings.iter_mut().rev().find(|b| b.name == name) {
            binding.value = value;
            return Ok(());
        }
        current = heap.frame(r).parent;
    }
    Err(EvalError::SetUndefined(name.to_string()))
}

/// True when the symbol is already bound directly in this frame. Used by
/// the let family to reject duplicate names in a binding list.
pub fn bound_in_frame(heap: &Heap, frame: FrameRef, name: &str) -> bool {
    heap.frame(frame).bindings.iter().any(|b| b.name == name)
}
