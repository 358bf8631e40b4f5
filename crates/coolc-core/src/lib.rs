// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Cool compiler semantic core.
//!
//! This crate contains the semantic middle of the compiler:
//! - Class hierarchy construction and validation
//! - Feature (attribute/method) resolution with override checking
//! - Expression-level type inference and checking
//!
//! Lexing/parsing and code generation live outside this crate; the
//! analyser consumes a finished [`ast::Program`] and hands back the same
//! tree with every expression's static type filled in, plus diagnostics.

#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod semantic_analysis;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{ClassDecl, Expr, ExprKind, Feature, Program, Symbol};
    pub use crate::semantic_analysis::{Analysis, analyse};
    pub use crate::source_analysis::{Diagnostic, Severity, Span};
}
