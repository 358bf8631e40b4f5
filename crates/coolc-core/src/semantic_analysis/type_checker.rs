// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression type checking and inference.
//!
//! Phase 3 of semantic analysis. Walks every method body and attribute
//! initializer, synthesising a static type for each expression bottom-up
//! and writing it into the node's type slot for the code generator.
//!
//! The walk has two faces folded into one recursion: scope setup happens
//! *before* a node's children are visited (entering the frame for a
//! `let` body, binding a `case` branch variable), and type synthesis
//! happens *after*, since a node's type depends on its children's.
//! Matching on [`ExprKind`] is exhaustive, so adding an expression form
//! without a typing rule is a compile error rather than a silent no-op.
//!
//! # Failure semantics
//!
//! A failed check reports one diagnostic and recovers with `Object` (or
//! keeps the declared type, where the rule says so), then keeps going.
//! The checker never aborts on first error: one broken expression still
//! lets siblings, the rest of the method, and the rest of the program
//! surface their own independent errors in the same run.
//!
//! # SELF_TYPE
//!
//! `SELF_TYPE` flows through inference only via the literal `self`
//! expression; an identifier merely *declared* `SELF_TYPE` is annotated
//! with the concrete current class at the reference site. A
//! `SELF_TYPE`-returning method therefore stays polymorphic for
//! `self`-receivers and collapses to the receiver's static type
//! everywhere else.

use super::class_table::ClassTable;
use super::diagnostics::Diagnostics;
use super::error::{
    BoolContext, DispatchKind, SemanticError, SemanticErrorKind, UndefinedTypeContext,
};
use super::features::FeatureTables;
use super::scope::{BindingKind, ScopeTable};
use super::well_known::{BOOL, INT, NO_TYPE, OBJECT, SELF, SELF_TYPE, STRING};
use crate::ast::{Attribute, ClassDecl, Expr, ExprKind, Feature, Method, Program, Symbol};
use crate::source_analysis::Span;

/// Type-checks every class body in the program, annotating expressions
/// in place.
pub fn check_program(
    program: &mut Program,
    classes: &ClassTable,
    features: &FeatureTables,
    diagnostics: &mut Diagnostics,
) {
    for class in &mut program.classes {
        let mut checker = TypeChecker {
            classes,
            features,
            scope: ScopeTable::new(),
            current_class: class.name.clone(),
            diagnostics: &mut *diagnostics,
        };
        checker.check_class(class);
    }
}

/// The checking context for one class at a time: the validated class
/// table, the resolved feature tables, the live scope stack, and the
/// class whose bodies are being checked.
struct TypeChecker<'a> {
    classes: &'a ClassTable,
    features: &'a FeatureTables,
    scope: ScopeTable,
    current_class: Symbol,
    diagnostics: &'a mut Diagnostics,
}

impl TypeChecker<'_> {
    fn check_class(&mut self, class: &mut ClassDecl) {
        // One frame per class in the ancestor chain, root first, binding
        // that class's own attributes: a descendant's binding shadows an
        // ancestor's, and every inherited attribute is visible in every
        // body. `self` needs no binding; the identifier rule special-cases
        // it.
        let mut chain = self.classes.ancestors(&class.name);
        chain.reverse();
        chain.push(class.name.clone());
        let frames = chain.len();
        for class_name in &chain {
            self.scope.enter();
            let attrs: Vec<(Symbol, Symbol, Span)> = self
                .features
                .own_attributes(class_name)
                .map(|attr| (attr.name.clone(), attr.declared_ty.clone(), attr.span))
                .collect();
            for (name, declared_ty, span) in attrs {
                self.scope
                    .bind(name, declared_ty, BindingKind::Attribute, span);
            }
        }

        for feature in &mut class.features {
            match feature {
                Feature::Attribute(attr) => self.check_attribute(attr),
                Feature::Method(method) => self.check_method(method),
            }
        }

        for _ in 0..frames {
            self.scope.exit();
        }
    }

    /// Checks a method body against its declared return type.
    fn check_method(&mut self, method: &mut Method) {
        self.scope.enter();
        for formal in &method.formals {
            self.scope.bind(
                formal.name.clone(),
                formal.declared_ty.clone(),
                BindingKind::Formal,
                formal.span,
            );
        }

        let body_ty = self.check_expr(&mut method.body);

        let found = self.resolve_self_ty(&body_ty);
        let expected = self.resolve_self_ty(&method.return_ty);
        if self.both_defined(&found, &expected) && !self.conforms(&found, &expected) {
            self.report(
                SemanticErrorKind::ReturnTypeMismatch {
                    method: method.name.clone(),
                    found,
                    expected,
                },
                method.span,
            );
        }

        self.scope.exit();
    }

    /// Checks an attribute initializer against the declared type.
    fn check_attribute(&mut self, attr: &mut Attribute) {
        let init_ty = self.check_expr(&mut attr.init);
        if init_ty == NO_TYPE {
            return;
        }
        let found = self.resolve_self_ty(&init_ty);
        let expected = self.resolve_self_ty(&attr.declared_ty);
        if self.both_defined(&found, &expected) && !self.conforms(&found, &expected) {
            self.report(
                SemanticErrorKind::AttributeInitMismatch {
                    name: attr.name.clone(),
                    found,
                    expected,
                },
                attr.span,
            );
        }
    }

    /// Synthesises the static type of an expression, writing it into the
    /// node's type slot and returning it for the parent's rule.
    #[allow(clippy::too_many_lines)] // one arm per expression form
    fn check_expr(&mut self, expr: &mut Expr) -> Symbol {
        let span = expr.span;
        let ty: Symbol = match &mut expr.kind {
            ExprKind::IntLit(_) => INT.into(),
            ExprKind::BoolLit(_) => BOOL.into(),
            ExprKind::StrLit(_) => STRING.into(),

            ExprKind::Ident(name) => {
                if name == SELF {
                    SELF_TYPE.into()
                } else if let Some(binding) = self.scope.lookup(name) {
                    // A declared SELF_TYPE is pinned to the concrete
                    // current class here; only the literal `self` keeps
                    // the polymorphic marker.
                    let declared = binding.declared_ty.clone();
                    self.resolve_self_ty(&declared)
                } else {
                    self.report(
                        SemanticErrorKind::UndeclaredIdentifier { name: name.clone() },
                        span,
                    );
                    OBJECT.into()
                }
            }

            ExprKind::Assign { target, value } => {
                let target = target.clone();
                let value_ty = self.check_expr(value);
                self.finish_assign(span, &target, value_ty)
            }

            ExprKind::Dispatch {
                receiver,
                method,
                args,
            } => {
                let method = method.clone();
                let recv_ty = self.check_expr(receiver);
                let arg_tys = self.check_args(args);
                self.finish_dispatch(span, recv_ty, None, &method, &arg_tys)
            }

            ExprKind::StaticDispatch {
                receiver,
                static_ty,
                method,
                args,
            } => {
                let method = method.clone();
                let static_ty = static_ty.clone();
                let recv_ty = self.check_expr(receiver);
                let arg_tys = self.check_args(args);
                self.finish_dispatch(span, recv_ty, Some(static_ty), &method, &arg_tys)
            }

            ExprKind::Cond {
                pred,
                then_branch,
                else_branch,
            } => {
                let pred_ty = self.check_expr(pred);
                let then_ty = self.check_expr(then_branch);
                let else_ty = self.check_expr(else_branch);

                let pred_res = self.resolve_self_ty(&pred_ty);
                if !self.conforms(&pred_res, BOOL) {
                    self.report(
                        SemanticErrorKind::NonBooleanCondition {
                            context: BoolContext::If,
                        },
                        span,
                    );
                    OBJECT.into()
                } else if then_ty == SELF_TYPE && else_ty == SELF_TYPE {
                    SELF_TYPE.into()
                } else {
                    let then_res = self.resolve_self_ty(&then_ty);
                    let else_res = self.resolve_self_ty(&else_ty);
                    self.classes.least_upper_bound(&then_res, &else_res)
                }
            }

            ExprKind::Loop { pred, body } => {
                let pred_ty = self.check_expr(pred);
                self.check_expr(body);
                let pred_res = self.resolve_self_ty(&pred_ty);
                if !self.conforms(&pred_res, BOOL) {
                    self.report(
                        SemanticErrorKind::NonBooleanCondition {
                            context: BoolContext::While,
                        },
                        span,
                    );
                }
                OBJECT.into()
            }

            ExprKind::Block { body } => {
                let mut last = Symbol::from(NO_TYPE);
                for item in body {
                    last = self.check_expr(item);
                }
                last
            }

            ExprKind::Let {
                name,
                declared_ty,
                init,
                body,
            } => {
                let name = name.clone();
                let declared_ty = declared_ty.clone();

                if name == SELF {
                    self.report(SemanticErrorKind::SelfBoundInLet, span);
                }

                let ty_defined =
                    declared_ty == SELF_TYPE || self.classes.is_registered(&declared_ty);
                if !ty_defined {
                    self.report(
                        SemanticErrorKind::UndefinedType {
                            context: UndefinedTypeContext::LetBinding {
                                ty: declared_ty.clone(),
                                name: name.clone(),
                            },
                        },
                        span,
                    );
                }

                // The initializer is checked outside the binding's scope.
                let init_ty = self.check_expr(init);
                if init_ty != NO_TYPE && ty_defined {
                    let found = self.resolve_self_ty(&init_ty);
                    let expected = self.resolve_self_ty(&declared_ty);
                    if self.both_defined(&found, &expected) && !self.conforms(&found, &expected) {
                        self.report(
                            SemanticErrorKind::LetInitMismatch {
                                name: name.clone(),
                                found: init_ty,
                                expected: declared_ty.clone(),
                            },
                            span,
                        );
                    }
                }

                self.scope.enter();
                if name != SELF {
                    self.scope.bind(name, declared_ty, BindingKind::Let, span);
                }
                let body_ty = self.check_expr(body);
                self.scope.exit();
                body_ty
            }

            ExprKind::Case {
                scrutinee,
                branches,
            } => {
                self.check_expr(scrutinee);
                let mut branch_tys = Vec::with_capacity(branches.len());
                for branch in branches.iter_mut() {
                    if branch.name == SELF {
                        self.report(SemanticErrorKind::SelfBoundInCase, branch.span);
                    }
                    if branch.declared_ty == SELF_TYPE {
                        self.report(
                            SemanticErrorKind::SelfTypeInCaseBranch {
                                name: branch.name.clone(),
                            },
                            branch.span,
                        );
                    } else if !self.classes.is_registered(&branch.declared_ty) {
                        self.report(
                            SemanticErrorKind::UndefinedType {
                                context: UndefinedTypeContext::CaseBranch {
                                    ty: branch.declared_ty.clone(),
                                    name: branch.name.clone(),
                                },
                            },
                            branch.span,
                        );
                    }

                    self.scope.enter();
                    if branch.name != SELF {
                        self.scope.bind(
                            branch.name.clone(),
                            branch.declared_ty.clone(),
                            BindingKind::CaseVar,
                            branch.span,
                        );
                    }
                    let body_ty = self.check_expr(&mut branch.body);
                    self.scope.exit();
                    branch_tys.push(self.resolve_self_ty(&body_ty));
                }
                self.classes.least_upper_bound_all(&branch_tys)
            }

            ExprKind::New { class } => {
                if class == SELF_TYPE {
                    SELF_TYPE.into()
                } else if self.classes.is_registered(class) {
                    class.clone()
                } else {
                    let kind = SemanticErrorKind::UndefinedType {
                        context: UndefinedTypeContext::New { ty: class.clone() },
                    };
                    self.report(kind, span);
                    OBJECT.into()
                }
            }

            ExprKind::IsVoid(operand) => {
                self.check_expr(operand);
                BOOL.into()
            }

            ExprKind::Neg(operand) => {
                let operand_ty = self.check_expr(operand);
                if operand_ty != INT {
                    self.report(
                        SemanticErrorKind::NonIntegerComplement { found: operand_ty },
                        span,
                    );
                }
                INT.into()
            }

            ExprKind::Not(operand) => {
                let operand_ty = self.check_expr(operand);
                if operand_ty != BOOL {
                    self.report(
                        SemanticErrorKind::NonBooleanOperand { found: operand_ty },
                        span,
                    );
                }
                BOOL.into()
            }

            ExprKind::Arith { op, lhs, rhs } => {
                let op = *op;
                let lhs_ty = self.check_expr(lhs);
                let rhs_ty = self.check_expr(rhs);
                if lhs_ty != INT || rhs_ty != INT {
                    self.report(
                        SemanticErrorKind::NonIntegerOperands {
                            op: op.symbol(),
                            lhs: lhs_ty,
                            rhs: rhs_ty,
                        },
                        span,
                    );
                }
                INT.into()
            }

            ExprKind::Compare { op, lhs, rhs } => {
                let op = *op;
                let lhs_ty = self.check_expr(lhs);
                let rhs_ty = self.check_expr(rhs);
                if lhs_ty != INT || rhs_ty != INT {
                    self.report(
                        SemanticErrorKind::NonIntegerOperands {
                            op: op.symbol(),
                            lhs: lhs_ty,
                            rhs: rhs_ty,
                        },
                        span,
                    );
                }
                BOOL.into()
            }

            ExprKind::Eq { lhs, rhs } => {
                let lhs_ty = self.check_expr(lhs);
                let rhs_ty = self.check_expr(rhs);
                let lhs_res = self.resolve_self_ty(&lhs_ty);
                let rhs_res = self.resolve_self_ty(&rhs_ty);
                let basic = |ty: &Symbol| ty == INT || ty == BOOL || ty == STRING;
                if (basic(&lhs_res) || basic(&rhs_res)) && lhs_res != rhs_res {
                    self.report(SemanticErrorKind::IllegalBasicTypeComparison, span);
                }
                BOOL.into()
            }

            ExprKind::NoExpr => NO_TYPE.into(),
        };
        expr.set_ty(ty)
    }

    /// Checks dispatch arguments, returning their `SELF_TYPE`-resolved
    /// inferred types for conformance validation.
    fn check_args(&mut self, args: &mut [Expr]) -> Vec<Symbol> {
        let mut arg_tys = Vec::with_capacity(args.len());
        for arg in args {
            let ty = self.check_expr(arg);
            arg_tys.push(self.resolve_self_ty(&ty));
        }
        arg_tys
    }

    /// Finishes an assignment once the value is typed: a declared,
    /// non-`self` target, a conforming value, and the target's declared
    /// type as the result.
    fn finish_assign(&mut self, span: Span, target: &Symbol, value_ty: Symbol) -> Symbol {
        if target == SELF {
            self.report(SemanticErrorKind::AssignToSelf, span);
            return OBJECT.into();
        }

        let Some(binding) = self.scope.lookup(target) else {
            self.report(
                SemanticErrorKind::UndeclaredIdentifier {
                    name: target.clone(),
                },
                span,
            );
            return OBJECT.into();
        };
        let declared = binding.declared_ty.clone();

        let found = self.resolve_self_ty(&value_ty);
        let expected = self.resolve_self_ty(&declared);
        if self.both_defined(&found, &expected) && !self.conforms(&found, &expected) {
            self.report(
                SemanticErrorKind::AssignmentTypeMismatch {
                    name: target.clone(),
                    found: value_ty,
                    expected: declared.clone(),
                },
                span,
            );
        }
        declared
    }

    /// Finishes a dispatch once receiver and arguments are typed.
    ///
    /// Both forms resolve the method, validate arity and argument
    /// conformance, and substitute the receiver's type for a `SELF_TYPE`
    /// return — dynamic dispatch keeps the receiver's *inferred* type
    /// (so `self`-receivers stay polymorphic), static dispatch pins the
    /// receiver's concrete class.
    fn finish_dispatch(
        &mut self,
        span: Span,
        recv_ty: Symbol,
        static_ty: Option<Symbol>,
        method_name: &Symbol,
        arg_tys: &[Symbol],
    ) -> Symbol {
        let dispatch_kind = if static_ty.is_some() {
            DispatchKind::Static
        } else {
            DispatchKind::Dynamic
        };

        if let Some(static_ty) = &static_ty {
            if static_ty == SELF_TYPE {
                self.report(SemanticErrorKind::StaticDispatchToSelfType, span);
                return OBJECT.into();
            }
            if !self.classes.is_registered(static_ty) {
                self.report(
                    SemanticErrorKind::UndefinedType {
                        context: UndefinedTypeContext::StaticDispatch {
                            ty: static_ty.clone(),
                        },
                    },
                    span,
                );
                return OBJECT.into();
            }
        }

        let recv_class = self.resolve_self_ty(&recv_ty);
        if !self.classes.is_registered(&recv_class) {
            self.report(
                SemanticErrorKind::UndefinedType {
                    context: UndefinedTypeContext::Dispatch { ty: recv_class },
                },
                span,
            );
            return OBJECT.into();
        }

        if let Some(static_ty) = &static_ty {
            if !self.classes.is_subclass_of(&recv_class, static_ty) {
                self.report(
                    SemanticErrorKind::StaticDispatchConformance {
                        found: recv_class,
                        expected: static_ty.clone(),
                    },
                    span,
                );
                return OBJECT.into();
            }
        }

        // Static dispatch resolves against the named ancestor, bypassing
        // the receiver's own class.
        let callee_class = static_ty.as_ref().unwrap_or(&recv_class);

        let Some(return_ty) = self
            .features
            .lookup_method(self.classes, callee_class, method_name)
            .map(|method| method.return_ty.clone())
        else {
            self.report(
                SemanticErrorKind::UndefinedMethod {
                    method: method_name.clone(),
                    kind: dispatch_kind,
                },
                span,
            );
            return OBJECT.into();
        };

        let valid = self.features.validate_dispatch(
            self.classes,
            callee_class,
            method_name,
            arg_tys,
            span,
            self.diagnostics,
        );
        if !valid {
            return OBJECT.into();
        }

        if return_ty == SELF_TYPE {
            match dispatch_kind {
                DispatchKind::Static => recv_class,
                DispatchKind::Dynamic => recv_ty,
            }
        } else {
            return_ty
        }
    }

    /// Substitutes the current class for `SELF_TYPE`.
    fn resolve_self_ty(&self, ty: &Symbol) -> Symbol {
        if ty == SELF_TYPE {
            self.current_class.clone()
        } else {
            ty.clone()
        }
    }

    /// Conformance over resolved types: `sub` is `sup` or inherits from
    /// it; the no-expression sentinel conforms to everything.
    fn conforms(&self, sub: &str, sup: &str) -> bool {
        sub == NO_TYPE || self.classes.is_subclass_of(sub, sup)
    }

    /// True when both resolved types name registered classes (or the
    /// sentinel), so a conformance failure is a real mismatch rather
    /// than fallout from an earlier undefined-type error.
    fn both_defined(&self, a: &str, b: &str) -> bool {
        let defined = |ty: &str| ty == NO_TYPE || self.classes.is_registered(ty);
        defined(a) && defined(b)
    }

    fn report(&mut self, kind: SemanticErrorKind, span: Span) {
        self.diagnostics.report(SemanticError::new(kind, span));
    }
}
