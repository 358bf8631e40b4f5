// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared AST builders for semantic analysis tests.
//!
//! Tests construct programs directly (the parser lives outside this
//! crate), so these helpers keep them readable. All nodes get default
//! spans; tests that assert on locations build their nodes by hand.

use crate::ast::{
    ArithOp, Attribute, CaseBranch, ClassDecl, CompareOp, Expr, ExprKind, Feature, Formal, Method,
    Program, Symbol,
};
use crate::source_analysis::Span;

pub(crate) fn program(classes: Vec<ClassDecl>) -> Program {
    Program::new(classes, Span::default())
}

pub(crate) fn class(name: &str, parent: &str, features: Vec<Feature>) -> ClassDecl {
    ClassDecl {
        name: name.into(),
        parent: Some(parent.into()),
        features,
        span: Span::default(),
    }
}

pub(crate) fn attribute(name: &str, declared_ty: &str, init: Expr) -> Feature {
    Feature::Attribute(Attribute {
        name: name.into(),
        declared_ty: declared_ty.into(),
        init,
        span: Span::default(),
    })
}

pub(crate) fn method(name: &str, formals: &[(&str, &str)], return_ty: &str, body: Expr) -> Feature {
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
        body,
        span: Span::default(),
    })
}

pub(crate) fn no_expr() -> Expr {
    Expr::no_expr(Span::default())
}

pub(crate) fn int(value: i64) -> Expr {
    Expr::new(ExprKind::IntLit(value), Span::default())
}

pub(crate) fn boolean(value: bool) -> Expr {
    Expr::new(ExprKind::BoolLit(value), Span::default())
}

pub(crate) fn string(value: &str) -> Expr {
    Expr::new(ExprKind::StrLit(value.into()), Span::default())
}

pub(crate) fn ident(name: &str) -> Expr {
    Expr::new(ExprKind::Ident(name.into()), Span::default())
}

pub(crate) fn self_ref() -> Expr {
    ident("self")
}

pub(crate) fn assign(target: &str, value: Expr) -> Expr {
    Expr::new(
        ExprKind::Assign {
            target: target.into(),
            value: Box::new(value),
        },
        Span::default(),
    )
}

pub(crate) fn dispatch(receiver: Expr, method: &str, args: Vec<Expr>) -> Expr {
    Expr::new(
        ExprKind::Dispatch {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
        },
        Span::default(),
    )
}

pub(crate) fn static_dispatch(receiver: Expr, static_ty: &str, method: &str, args: Vec<Expr>) -> Expr {
    Expr::new(
        ExprKind::StaticDispatch {
            receiver: Box::new(receiver),
            static_ty: static_ty.into(),
            method: method.into(),
            args,
        },
        Span::default(),
    )
}

pub(crate) fn cond(pred: Expr, then_branch: Expr, else_branch: Expr) -> Expr {
    Expr::new(
        ExprKind::Cond {
            pred: Box::new(pred),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        },
        Span::default(),
    )
}

pub(crate) fn while_loop(pred: Expr, body: Expr) -> Expr {
    Expr::new(
        ExprKind::Loop {
            pred: Box::new(pred),
            body: Box::new(body),
        },
        Span::default(),
    )
}

pub(crate) fn block(body: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Block { body }, Span::default())
}

pub(crate) fn let_in(name: &str, declared_ty: &str, init: Expr, body: Expr) -> Expr {
    Expr::new(
        ExprKind::Let {
            name: name.into(),
            declared_ty: declared_ty.into(),
            init: Box::new(init),
            body: Box::new(body),
        },
        Span::default(),
    )
}

pub(crate) fn case(scrutinee: Expr, branches: Vec<CaseBranch>) -> Expr {
    Expr::new(
        ExprKind::Case {
            scrutinee: Box::new(scrutinee),
            branches,
        },
        Span::default(),
    )
}

pub(crate) fn branch(name: &str, declared_ty: &str, body: Expr) -> CaseBranch {
    CaseBranch {
        name: name.into(),
        declared_ty: declared_ty.into(),
        body,
        span: Span::default(),
    }
}

pub(crate) fn new_instance(class: &str) -> Expr {
    Expr::new(
        ExprKind::New {
            class: class.into(),
        },
        Span::default(),
    )
}

pub(crate) fn isvoid(operand: Expr) -> Expr {
    Expr::new(ExprKind::IsVoid(Box::new(operand)), Span::default())
}

pub(crate) fn neg(operand: Expr) -> Expr {
    Expr::new(ExprKind::Neg(Box::new(operand)), Span::default())
}

pub(crate) fn not(operand: Expr) -> Expr {
    Expr::new(ExprKind::Not(Box::new(operand)), Span::default())
}

pub(crate) fn arith(op: ArithOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(
        ExprKind::Arith {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        Span::default(),
    )
}

pub(crate) fn compare(op: CompareOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(
        ExprKind::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        Span::default(),
    )
}

pub(crate) fn equals(lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(
        ExprKind::Eq {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        Span::default(),
    )
}

/// A minimal valid program: `class Main { main() : Object { 0 } };` —
/// with an `Int` body conforming to `Object`.
pub(crate) fn minimal_main() -> ClassDecl {
    class(
        "Main",
        "Object",
        vec![method("main", &[], "Object", int(0))],
    )
}
