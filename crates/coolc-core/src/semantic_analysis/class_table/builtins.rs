// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The five basic Cool classes.
//!
//! These are synthesized as ordinary [`ClassDecl`] values so the rest of
//! the analyser treats them exactly like user classes: they live in the
//! class table, their signatures go through feature resolution, and
//! dispatch resolves against them. Their method bodies are
//! [`ExprKind::NoExpr`] placeholders — the implementations are part of
//! the runtime, not this crate.

use crate::ast::{Attribute, ClassDecl, Expr, Feature, Formal, Method, Symbol};
use crate::semantic_analysis::well_known::{BOOL, INT, IO, OBJECT, PRIM_SLOT, SELF_TYPE, STRING};
use crate::source_analysis::Span;

fn method(name: &str, formals: &[(&str, &str)], return_ty: &str) -> Feature {
    Feature::Method(Method {
        name: name.into(),
        formals: formals
            .iter()
            .map(|(formal, ty)| Formal {
                name: Symbol::from(*formal),
                declared_ty: Symbol::from(*ty),
                span: Span::default(),
            })
            .collect(),
        return_ty: return_ty.into(),
        body: Expr::no_expr(Span::default()),
        span: Span::default(),
    })
}

fn attribute(name: &str, declared_ty: &str) -> Feature {
    Feature::Attribute(Attribute {
        name: name.into(),
        declared_ty: declared_ty.into(),
        init: Expr::no_expr(Span::default()),
        span: Span::default(),
    })
}

fn class(name: &str, parent: Option<&str>, features: Vec<Feature>) -> ClassDecl {
    ClassDecl {
        name: name.into(),
        parent: parent.map(Symbol::from),
        features,
        span: Span::default(),
    }
}

/// Returns the basic class declarations, root first.
#[must_use]
pub(super) fn basic_classes() -> Vec<ClassDecl> {
    vec![
        class(
            OBJECT,
            None,
            vec![
                method("abort", &[], OBJECT),
                method("type_name", &[], STRING),
                method("copy", &[], SELF_TYPE),
            ],
        ),
        class(
            IO,
            Some(OBJECT),
            vec![
                method("out_string", &[("x", STRING)], SELF_TYPE),
                method("out_int", &[("x", INT)], SELF_TYPE),
                method("in_string", &[], STRING),
                method("in_int", &[], INT),
            ],
        ),
        class(INT, Some(OBJECT), vec![attribute("val", PRIM_SLOT)]),
        class(BOOL, Some(OBJECT), vec![attribute("val", PRIM_SLOT)]),
        class(
            STRING,
            Some(OBJECT),
            vec![
                attribute("val", INT),
                attribute("str_field", PRIM_SLOT),
                method("length", &[], INT),
                method("concat", &[("s", STRING)], STRING),
                method("substr", &[("i", INT), ("l", INT)], STRING),
            ],
        ),
    ]
}
