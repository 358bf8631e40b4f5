// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Feature resolution: per-class attribute and method tables.
//!
//! Phase 2 of semantic analysis. Classes are processed ancestors-first
//! over the validated hierarchy, so every override and shadowing check
//! can consult the parent's already-populated table.
//!
//! A feature table holds only the features a class declares itself;
//! lookup misses delegate to the parent class's table. Every class
//! therefore sees its full inherited feature set without any copying,
//! and a descendant's own declaration always shadows an ancestor's.
//!
//! A declaration that fails a check is reported and *not* inserted, so
//! the inherited entry (if any) stays visible — a malformed override
//! never hides the signature dispatches actually resolve to.

use super::class_table::ClassTable;
use super::diagnostics::Diagnostics;
use super::error::{SemanticError, SemanticErrorKind, UndefinedTypeContext};
use super::well_known::{MAIN, MAIN_METH, NO_TYPE, PRIM_SLOT, SELF_TYPE};
use crate::ast::{Attribute, Feature, Method, Symbol};
use crate::source_analysis::Span;
use std::collections::{HashMap, HashSet};

/// The resolved feature tables for every class in the program.
///
/// Populated by [`resolve_features`]; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct FeatureTables {
    tables: HashMap<Symbol, FeatureTable>,
}

/// The features a single class declares itself.
#[derive(Debug, Clone, Default)]
struct FeatureTable {
    features: HashMap<Symbol, Feature>,
}

impl FeatureTables {
    /// Looks up a method on `class`, delegating to ancestors on a miss.
    ///
    /// Returns the most specific declaration: a class's own table is
    /// consulted before its parent's. The walk is visited-set bounded.
    #[must_use]
    pub fn lookup_method<'a>(
        &'a self,
        classes: &ClassTable,
        class: &str,
        name: &str,
    ) -> Option<&'a Method> {
        self.lookup_chain(classes, class, name, |feature| match feature {
            Feature::Method(method) => Some(method),
            Feature::Attribute(_) => None,
        })
    }

    /// Looks up an attribute on `class`, delegating to ancestors on a
    /// miss.
    #[must_use]
    pub fn lookup_attribute<'a>(
        &'a self,
        classes: &ClassTable,
        class: &str,
        name: &str,
    ) -> Option<&'a Attribute> {
        self.lookup_chain(classes, class, name, |feature| match feature {
            Feature::Attribute(attr) => Some(attr),
            Feature::Method(_) => None,
        })
    }

    fn lookup_chain<'a, T: 'a>(
        &'a self,
        classes: &ClassTable,
        class: &str,
        name: &str,
        select: impl Fn(&'a Feature) -> Option<&'a T>,
    ) -> Option<&'a T> {
        let mut visited = HashSet::new();
        let mut current = Some(Symbol::from(class));
        while let Some(class_name) = current {
            if !visited.insert(class_name.clone()) {
                break;
            }
            if let Some(found) = self
                .tables
                .get(&class_name)
                .and_then(|table| table.features.get(name))
                .and_then(&select)
            {
                return Some(found);
            }
            current = classes
                .get(&class_name)
                .and_then(|decl| decl.parent.clone());
        }
        None
    }

    /// Returns the attributes `class` declares itself, in arbitrary
    /// order. Inherited attributes are reachable via the parent's table.
    pub fn own_attributes<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a Attribute> {
        self.tables
            .get(class)
            .into_iter()
            .flat_map(|table| table.features.values())
            .filter_map(|feature| match feature {
                Feature::Attribute(attr) => Some(attr),
                Feature::Method(_) => None,
            })
    }

    /// Validates a call against the resolved signature of
    /// `method` on `callee_class`: argument count, then positional
    /// conformance of each (already-inferred, `SELF_TYPE`-resolved)
    /// argument type against the formal's declared type.
    ///
    /// Reports what it finds and returns `false` on any mismatch, so the
    /// caller can substitute a recovery type and keep checking siblings.
    /// An unresolvable method returns `false` without a report — the
    /// caller has already diagnosed that.
    pub fn validate_dispatch(
        &self,
        classes: &ClassTable,
        callee_class: &str,
        method_name: &str,
        arg_tys: &[Symbol],
        span: Span,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        let Some(method) = self.lookup_method(classes, callee_class, method_name) else {
            return false;
        };

        if method.formals.len() != arg_tys.len() {
            diagnostics.report(SemanticError::new(
                SemanticErrorKind::DispatchArityMismatch {
                    method: method.name.clone(),
                },
                span,
            ));
            return false;
        }

        let mut ok = true;
        for (formal, arg_ty) in method.formals.iter().zip(arg_tys) {
            let conforms = arg_ty == NO_TYPE || classes.is_subclass_of(arg_ty, &formal.declared_ty);
            if !conforms {
                diagnostics.report(SemanticError::new(
                    SemanticErrorKind::DispatchArgTypeMismatch {
                        method: method.name.clone(),
                        formal: formal.name.clone(),
                        found: arg_ty.clone(),
                        expected: formal.declared_ty.clone(),
                    },
                    span,
                ));
                ok = false;
            }
        }
        ok
    }
}

/// Resolves every class's features over a validated class table.
#[must_use]
pub fn resolve_features(classes: &ClassTable, diagnostics: &mut Diagnostics) -> FeatureTables {
    let mut resolver = FeatureResolver {
        classes,
        tables: FeatureTables::default(),
        diagnostics,
    };
    resolver.resolve_all();
    resolver.tables
}

/// The end-of-phase entry point gate: the program must declare a `Main`
/// class with a `main` method.
///
/// Emits exactly one diagnostic: a missing class, or a present class
/// missing the method — never both.
pub fn check_program_entry(
    tables: &FeatureTables,
    classes: &ClassTable,
    program_span: Span,
    diagnostics: &mut Diagnostics,
) {
    let Some(main_class) = classes.get(MAIN) else {
        diagnostics.report(SemanticError::new(
            SemanticErrorKind::MainNotDefined,
            program_span,
        ));
        return;
    };
    if tables.lookup_method(classes, MAIN, MAIN_METH).is_none() {
        diagnostics.report(SemanticError::new(
            SemanticErrorKind::NoMainMethod,
            main_class.span,
        ));
    }
}

struct FeatureResolver<'a> {
    classes: &'a ClassTable,
    tables: FeatureTables,
    diagnostics: &'a mut Diagnostics,
}

impl FeatureResolver<'_> {
    /// Processes every registered class, ancestors before descendants.
    ///
    /// Sorting by hierarchy depth gives a topological order over a
    /// validated tree; the name tiebreak keeps diagnostics deterministic.
    fn resolve_all(&mut self) {
        let mut order: Vec<Symbol> = self.classes.class_names().cloned().collect();
        order.sort_by_key(|name| (self.classes.depth(name), name.clone()));

        for class_name in order {
            self.tables
                .tables
                .insert(class_name.clone(), FeatureTable::default());
            let Some(decl) = self.classes.get(&class_name) else {
                continue;
            };
            for feature in decl.features.clone() {
                match feature {
                    Feature::Attribute(attr) => self.register_attribute(&class_name, attr),
                    Feature::Method(method) => self.register_method(&class_name, method),
                }
            }
        }
    }

    /// Registers an attribute, enforcing the no-shadowing rules.
    fn register_attribute(&mut self, class: &Symbol, attr: Attribute) {
        if self.declared_in_class(class, &attr.name) {
            self.report(
                SemanticErrorKind::DuplicateAttribute {
                    class: class.clone(),
                    name: attr.name.clone(),
                },
                attr.span,
            );
            return;
        }

        if let Some(parent) = self.parent_of(class) {
            if self
                .tables
                .lookup_attribute(self.classes, &parent, &attr.name)
                .is_some()
            {
                self.report(
                    SemanticErrorKind::InheritedAttributeRedeclared {
                        name: attr.name.clone(),
                    },
                    attr.span,
                );
                return;
            }
        }

        if !self.type_is_defined(&attr.declared_ty) {
            self.report(
                SemanticErrorKind::UndefinedType {
                    context: UndefinedTypeContext::Attribute {
                        ty: attr.declared_ty.clone(),
                        name: attr.name.clone(),
                    },
                },
                attr.span,
            );
            return;
        }

        self.insert(class, attr.name.clone(), Feature::Attribute(attr));
    }

    /// Registers a method, enforcing signature and override rules.
    fn register_method(&mut self, class: &Symbol, method: Method) {
        if self.declared_in_class(class, &method.name) {
            self.report(
                SemanticErrorKind::DuplicateMethod {
                    name: method.name.clone(),
                },
                method.span,
            );
            return;
        }

        let mut ok = true;
        for formal in &method.formals {
            if formal.declared_ty == SELF_TYPE {
                self.report(
                    SemanticErrorKind::IllegalSelfTypeFormal {
                        name: formal.name.clone(),
                    },
                    formal.span,
                );
                ok = false;
            } else if !self.type_is_defined(&formal.declared_ty) {
                self.report(
                    SemanticErrorKind::UndefinedType {
                        context: UndefinedTypeContext::Formal {
                            ty: formal.declared_ty.clone(),
                            name: formal.name.clone(),
                        },
                    },
                    formal.span,
                );
                ok = false;
            }
        }

        if !self.type_is_defined(&method.return_ty) {
            self.report(
                SemanticErrorKind::UndefinedType {
                    context: UndefinedTypeContext::MethodReturn {
                        ty: method.return_ty.clone(),
                        method: method.name.clone(),
                    },
                },
                method.span,
            );
            ok = false;
        }

        if !self.check_override(class, &method) {
            ok = false;
        }

        if ok {
            self.insert(class, method.name.clone(), Feature::Method(method));
        }
    }

    /// Checks an override against the nearest inherited signature.
    ///
    /// Cool overrides are invariant: the formal count, every formal type,
    /// and the return type must match the ancestor's declaration exactly.
    fn check_override(&mut self, class: &Symbol, method: &Method) -> bool {
        let Some(parent) = self.parent_of(class) else {
            return true;
        };
        let Some(inherited) = self
            .tables
            .lookup_method(self.classes, &parent, &method.name)
        else {
            return true;
        };

        if method.return_ty != inherited.return_ty {
            let kind = SemanticErrorKind::IncompatibleOverrideReturn {
                method: method.name.clone(),
                found: method.return_ty.clone(),
                expected: inherited.return_ty.clone(),
            };
            self.report(kind, method.span);
            return false;
        }

        if method.formals.len() != inherited.formals.len() {
            let kind = SemanticErrorKind::IncompatibleOverrideArity {
                method: method.name.clone(),
            };
            self.report(kind, method.span);
            return false;
        }

        let mut ok = true;
        let mismatches: Vec<(Symbol, Symbol)> = method
            .formals
            .iter()
            .zip(&inherited.formals)
            .filter(|(ours, theirs)| ours.declared_ty != theirs.declared_ty)
            .map(|(ours, theirs)| (ours.declared_ty.clone(), theirs.declared_ty.clone()))
            .collect();
        for (found, expected) in mismatches {
            self.report(
                SemanticErrorKind::IncompatibleOverrideParam {
                    method: method.name.clone(),
                    found,
                    expected,
                },
                method.span,
            );
            ok = false;
        }
        ok
    }

    /// True for registered classes, `SELF_TYPE`, and the internal slot
    /// type carried by the basic classes' value attributes.
    fn type_is_defined(&self, ty: &str) -> bool {
        ty == SELF_TYPE || ty == PRIM_SLOT || self.classes.is_registered(ty)
    }

    fn declared_in_class(&self, class: &Symbol, name: &str) -> bool {
        self.tables
            .tables
            .get(class)
            .is_some_and(|table| table.features.contains_key(name))
    }

    fn parent_of(&self, class: &Symbol) -> Option<Symbol> {
        self.classes.get(class).and_then(|decl| decl.parent.clone())
    }

    fn insert(&mut self, class: &Symbol, name: Symbol, feature: Feature) {
        if let Some(table) = self.tables.tables.get_mut(class) {
            table.features.insert(name, feature);
        }
    }

    fn report(&mut self, kind: SemanticErrorKind, span: Span) {
        self.diagnostics.report(SemanticError::new(kind, span));
    }
}
