// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Scope tracking for the type checker.
//!
//! A stack of frames mapping identifiers to their declared types. Frames
//! nest with the lexical structure being checked:
//! - one frame per class in the ancestor chain (attributes; root first,
//!   so a descendant's declaration shadows an ancestor's)
//! - one frame per method (formals)
//! - one frame per `let` body and per `case` branch
//!
//! Every frame entered is exited exactly once, in reverse order, by the
//! construct that entered it — including on error paths, since checking
//! recovers rather than unwinding.

use crate::ast::Symbol;
use crate::source_analysis::Span;
use std::collections::HashMap;

/// Tracks identifier bindings across nested scopes.
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    frames: Vec<Frame>,
}

#[derive(Debug, Clone, Default)]
struct Frame {
    bindings: HashMap<Symbol, Binding>,
}

/// What introduced a binding into scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// A class attribute (own or inherited).
    Attribute,
    /// A method formal parameter.
    Formal,
    /// A `let`-bound identifier.
    Let,
    /// A `case` branch pattern variable.
    CaseVar,
}

/// An identifier binding: its declared type and provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// The declared type (a class name or `SELF_TYPE`).
    pub declared_ty: Symbol,
    /// What introduced the binding.
    pub kind: BindingKind,
    /// Where the binding was declared.
    pub defined_at: Span,
}

impl ScopeTable {
    /// Creates an empty scope table with no frames.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a new innermost frame.
    pub fn enter(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Exits the innermost frame.
    ///
    /// Returns `false` (a no-op) if no frame is open; unbalanced exits
    /// never panic.
    pub fn exit(&mut self) -> bool {
        self.frames.pop().is_some()
    }

    /// Binds an identifier in the innermost frame, shadowing any binding
    /// of the same name in outer frames.
    ///
    /// Binding with no open frame is a caller bug; the binding is dropped
    /// in release builds.
    pub fn bind(&mut self, name: Symbol, declared_ty: Symbol, kind: BindingKind, span: Span) {
        debug_assert!(!self.frames.is_empty(), "bind with no open scope frame");
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(
                name,
                Binding {
                    declared_ty,
                    kind,
                    defined_at: span,
                },
            );
        }
    }

    /// Looks up an identifier, searching frames from innermost to
    /// outermost.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(name))
    }

    /// Returns the number of open frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
