// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for semantic analysis.
//!
//! These verify the lattice laws the type checker leans on and that the
//! pipeline never panics, whatever hierarchy or expression tree it is
//! fed:
//!
//! 1. **`analyse` never panics** — any generated program is analysed to
//!    completion (or rejected with the one fatal error), never crashed
//! 2. **LUB laws** — idempotent, commutative, absorbed by `Object`
//! 3. **Conformance laws** — reflexive, transitive
//! 4. **Ancestor chains terminate** — and end at `Object` for every
//!    valid class
//! 5. **Error counting** — the error count always matches the number of
//!    error-severity diagnostics

use proptest::prelude::*;

use super::analyse;
use super::class_table::ClassTable;
use super::diagnostics::Diagnostics;
use super::test_helpers::{class, method, program};
use super::well_known::OBJECT;
use crate::ast::{ArithOp, CaseBranch, ClassDecl, CompareOp, Expr, ExprKind, Symbol};
use crate::source_analysis::{Severity, Span};

// ============================================================================
// Generators
// ============================================================================

/// A small pool of class names so generated hierarchies actually collide:
/// duplicates, cycles, unknown parents all come up at this size.
const CLASS_POOL: &[&str] = &["A", "B", "C", "D", "E"];

/// Parent candidates: pool members, valid roots, and an undefined name.
/// The sealed basic classes are excluded — inheriting them is the fatal
/// path, exercised separately.
const PARENT_POOL: &[&str] = &["A", "B", "C", "D", "E", "Object", "IO", "Missing"];

const IDENT_POOL: &[&str] = &["x", "y", "count", "ghost", "self"];
const TYPE_POOL: &[&str] = &["A", "Object", "IO", "Int", "String", "Ghost", "SELF_TYPE"];
const METHOD_POOL: &[&str] = &["copy", "type_name", "length", "vanish", "f"];

fn arb_hierarchy() -> impl Strategy<Value = Vec<ClassDecl>> {
    prop::collection::vec(
        (
            prop::sample::select(CLASS_POOL),
            prop::sample::select(PARENT_POOL),
        ),
        0..8,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(name, parent)| class(name, parent, vec![]))
            .collect()
    })
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(|n| Expr::new(ExprKind::IntLit(n), Span::default())),
        any::<bool>().prop_map(|b| Expr::new(ExprKind::BoolLit(b), Span::default())),
        "[a-z]{0,6}".prop_map(|s| Expr::new(ExprKind::StrLit(s.into()), Span::default())),
        prop::sample::select(IDENT_POOL)
            .prop_map(|name| Expr::new(ExprKind::Ident(name.into()), Span::default())),
        prop::sample::select(TYPE_POOL).prop_map(|ty| Expr::new(
            ExprKind::New { class: ty.into() },
            Span::default()
        )),
    ];

    leaf.prop_recursive(4, 32, 3, |inner| {
        let arith_op = prop_oneof![
            Just(ArithOp::Add),
            Just(ArithOp::Sub),
            Just(ArithOp::Mul),
            Just(ArithOp::Div),
        ];
        let compare_op = prop_oneof![Just(CompareOp::Lt), Just(CompareOp::Le)];
        let operators = prop_oneof![
            (arith_op, inner.clone(), inner.clone()).prop_map(|(op, lhs, rhs)| Expr::new(
                ExprKind::Arith {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                Span::default()
            )),
            (compare_op, inner.clone(), inner.clone()).prop_map(|(op, lhs, rhs)| Expr::new(
                ExprKind::Compare {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                Span::default()
            )),
            (inner.clone(), inner.clone()).prop_map(|(lhs, rhs)| Expr::new(
                ExprKind::Eq {
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                Span::default()
            )),
            inner
                .clone()
                .prop_map(|e| Expr::new(ExprKind::Not(Box::new(e)), Span::default())),
            inner
                .clone()
                .prop_map(|e| Expr::new(ExprKind::Neg(Box::new(e)), Span::default())),
            inner
                .clone()
                .prop_map(|e| Expr::new(ExprKind::IsVoid(Box::new(e)), Span::default())),
        ];
        let control_flow = prop_oneof![
            prop::collection::vec(inner.clone(), 1..3)
                .prop_map(|body| Expr::new(ExprKind::Block { body }, Span::default())),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(p, t, e)| Expr::new(
                ExprKind::Cond {
                    pred: Box::new(p),
                    then_branch: Box::new(t),
                    else_branch: Box::new(e),
                },
                Span::default()
            )),
            (inner.clone(), inner.clone()).prop_map(|(p, b)| Expr::new(
                ExprKind::Loop {
                    pred: Box::new(p),
                    body: Box::new(b),
                },
                Span::default()
            )),
            (
                prop::sample::select(IDENT_POOL),
                prop::sample::select(TYPE_POOL),
                inner.clone(),
                inner.clone(),
            )
                .prop_map(|(name, ty, init, body)| Expr::new(
                    ExprKind::Let {
                        name: name.into(),
                        declared_ty: ty.into(),
                        init: Box::new(init),
                        body: Box::new(body),
                    },
                    Span::default()
                )),
            (
                inner.clone(),
                prop::collection::vec(
                    (
                        prop::sample::select(IDENT_POOL),
                        prop::sample::select(TYPE_POOL),
                        inner.clone(),
                    ),
                    1..3,
                ),
            )
                .prop_map(|(scrutinee, raw_branches)| {
                    let branches = raw_branches
                        .into_iter()
                        .map(|(name, ty, body)| CaseBranch {
                            name: name.into(),
                            declared_ty: ty.into(),
                            body,
                            span: Span::default(),
                        })
                        .collect();
                    Expr::new(
                        ExprKind::Case {
                            scrutinee: Box::new(scrutinee),
                            branches,
                        },
                        Span::default(),
                    )
                }),
        ];
        let sends = prop_oneof![
            (
                inner.clone(),
                prop::sample::select(METHOD_POOL),
                prop::collection::vec(inner.clone(), 0..2),
            )
                .prop_map(|(receiver, name, args)| Expr::new(
                    ExprKind::Dispatch {
                        receiver: Box::new(receiver),
                        method: name.into(),
                        args,
                    },
                    Span::default()
                )),
            (
                inner.clone(),
                prop::sample::select(TYPE_POOL),
                prop::sample::select(METHOD_POOL),
                prop::collection::vec(inner.clone(), 0..2),
            )
                .prop_map(|(receiver, ty, name, args)| Expr::new(
                    ExprKind::StaticDispatch {
                        receiver: Box::new(receiver),
                        static_ty: ty.into(),
                        method: name.into(),
                        args,
                    },
                    Span::default()
                )),
            (prop::sample::select(IDENT_POOL), inner.clone()).prop_map(|(target, value)| {
                Expr::new(
                    ExprKind::Assign {
                        target: target.into(),
                        value: Box::new(value),
                    },
                    Span::default(),
                )
            }),
        ];
        prop_oneof![operators, control_flow, sends]
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Builds and validates a class table, tolerating every recoverable
/// error the generator can produce.
fn build_table(classes: &[ClassDecl]) -> (ClassTable, Diagnostics) {
    let mut table = ClassTable::new();
    let mut diagnostics = Diagnostics::new();
    for decl in classes {
        // The parent pool excludes sealed classes, so registration
        // cannot be fatal here.
        table
            .register(decl, &mut diagnostics)
            .expect("generator never inherits a sealed class");
    }
    table.validate(&mut diagnostics);
    (table, diagnostics)
}

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(256),
        ..default
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: the full pipeline never panics on generated programs,
    /// valid or otherwise.
    #[test]
    fn analyse_never_panics(hierarchy in arb_hierarchy(), body in arb_expr()) {
        let mut classes = hierarchy;
        classes.push(class("Main", "Object", vec![method("main", &[], "Object", body)]));
        let mut prog = program(classes);
        let _ = analyse(&mut prog);
    }

    /// Property 2a: LUB is idempotent over every registered class.
    #[test]
    fn lub_is_idempotent(hierarchy in arb_hierarchy()) {
        let (table, _) = build_table(&hierarchy);
        for name in table.class_names() {
            if table.is_valid(name) {
                prop_assert_eq!(table.least_upper_bound(name, name), name.clone());
            }
        }
    }

    /// Property 2b: LUB is commutative over every pair of valid classes.
    /// (Classes invalidated by cycles only promise safe recovery values,
    /// not lattice laws.)
    #[test]
    fn lub_is_commutative(hierarchy in arb_hierarchy()) {
        let (table, _) = build_table(&hierarchy);
        let names: Vec<Symbol> = table
            .class_names()
            .filter(|name| table.is_valid(name))
            .cloned()
            .collect();
        for a in &names {
            for b in &names {
                prop_assert_eq!(
                    table.least_upper_bound(a, b),
                    table.least_upper_bound(b, a),
                    "lub({}, {}) not commutative",
                    a,
                    b
                );
            }
        }
    }

    /// Property 2c: `Object` absorbs every valid class.
    #[test]
    fn lub_with_object_is_object(hierarchy in arb_hierarchy()) {
        let (table, _) = build_table(&hierarchy);
        for name in table.class_names() {
            if table.is_valid(name) {
                let lub = table.least_upper_bound(name, OBJECT);
                prop_assert_eq!(
                    lub.as_str(),
                    OBJECT
                );
            }
        }
    }

    /// Property 3a: conformance is reflexive.
    #[test]
    fn subclass_relation_is_reflexive(hierarchy in arb_hierarchy()) {
        let (table, _) = build_table(&hierarchy);
        for name in table.class_names() {
            prop_assert!(table.is_subclass_of(name, name));
        }
    }

    /// Property 3b: conformance is transitive across every sampled
    /// triple.
    #[test]
    fn subclass_relation_is_transitive(hierarchy in arb_hierarchy()) {
        let (table, _) = build_table(&hierarchy);
        let names: Vec<Symbol> = table.class_names().cloned().collect();
        for a in &names {
            for b in &names {
                for c in &names {
                    if table.is_subclass_of(a, b) && table.is_subclass_of(b, c) {
                        prop_assert!(
                            table.is_subclass_of(a, c),
                            "{} <= {} and {} <= {} but not {} <= {}",
                            a, b, b, c, a, c
                        );
                    }
                }
            }
        }
    }

    /// Property 4: ancestor chains terminate, and every valid class's
    /// chain ends at `Object`.
    #[test]
    fn ancestor_chains_end_at_object(hierarchy in arb_hierarchy()) {
        let (table, _) = build_table(&hierarchy);
        for name in table.class_names() {
            let chain = table.ancestors(name);
            if table.is_valid(name) && name != OBJECT {
                prop_assert_eq!(chain.last().map(Symbol::as_str), Some(OBJECT));
            }
        }
    }

    /// Property 5: the error counter always matches the entries.
    #[test]
    fn error_count_matches_entries(hierarchy in arb_hierarchy(), body in arb_expr()) {
        let mut classes = hierarchy;
        classes.push(class("Main", "Object", vec![method("main", &[], "Object", body)]));
        let mut prog = program(classes);
        if let Ok(analysis) = analyse(&mut prog) {
            let errors = analysis
                .diagnostics()
                .iter()
                .filter(|d| d.severity == Severity::Error)
                .count();
            prop_assert_eq!(analysis.error_count(), errors);
        }
    }
}
