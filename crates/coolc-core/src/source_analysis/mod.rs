// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location and diagnostic vocabulary.
//!
//! The parser (out of scope for this crate) stamps every AST node with a
//! [`Span`]; semantic analysis reports everything it finds as a
//! [`Diagnostic`] anchored to one of those spans. Nothing in this module
//! knows about Cool semantics — it is the shared reporting substrate.

mod diagnostic;
mod span;

pub use diagnostic::{Diagnostic, Severity};
pub use span::Span;
