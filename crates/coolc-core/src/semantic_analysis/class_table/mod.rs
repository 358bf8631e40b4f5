// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The class table: hierarchy construction, validation, and queries.
//!
//! Phase 1 of semantic analysis. Every class — the five basic classes
//! plus the user program's — is registered here, then the inheritance
//! graph is validated to be a tree rooted at `Object`: parents must
//! exist, the sealed value classes may not be inherited, and no cycles.
//!
//! After validation the table answers the queries the later phases live
//! on: ancestor chains, the subclass relation, and least upper bounds
//! over the class lattice. All chain walks are bounded by a visited set,
//! so they terminate even on the malformed graphs that validation
//! rejects.
//!
//! A class whose declared parent is unknown, or which is entangled in a
//! cycle, is marked permanently invalid: it stays in the table (name
//! lookups still work) but its ancestor chain stops at the break or the
//! first repeat, conformance sees only that partial chain, and least
//! upper bounds against unrelated classes recover to `Object`. The
//! lattice laws are only promised for classes that survive validation.

use super::diagnostics::Diagnostics;
use super::error::{FatalError, SemanticError, SemanticErrorKind};
use super::well_known::{OBJECT, is_sealed_basic};
use crate::ast::{ClassDecl, Symbol};
use crate::source_analysis::Span;
use std::collections::{HashMap, HashSet};

mod builtins;

/// The class table, keyed by class name.
///
/// Lifecycle: `register` every class, then `validate`, then query.
/// Queries before validation are a caller bug; they stay bounded but
/// their answers are unspecified.
#[derive(Debug, Clone)]
pub struct ClassTable {
    classes: HashMap<Symbol, ClassDecl>,
    invalid: HashSet<Symbol>,
    validated: bool,
}

impl ClassTable {
    /// Creates a table pre-populated with the basic classes.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            classes: HashMap::new(),
            invalid: HashSet::new(),
            validated: false,
        };
        for class in builtins::basic_classes() {
            table.classes.insert(class.name.clone(), class);
        }
        table
    }

    /// Registers a user class.
    ///
    /// A duplicate name (including a basic class name) is reported and
    /// discarded; the first registration wins. Naming a sealed value
    /// class as the parent is the one fatal condition: it invalidates
    /// every later hierarchy computation, so the pipeline stops here.
    ///
    /// # Errors
    ///
    /// Returns [`FatalError::IllegalInheritance`] when the class inherits
    /// `Int`, `String` or `Bool`.
    pub fn register(
        &mut self,
        class: &ClassDecl,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), FatalError> {
        if self.classes.contains_key(&class.name) {
            diagnostics.report(SemanticError::new(
                SemanticErrorKind::DuplicateClass {
                    name: class.name.clone(),
                },
                class.span,
            ));
            return Ok(());
        }

        if let Some(parent) = &class.parent {
            if is_sealed_basic(parent) {
                return Err(FatalError::IllegalInheritance {
                    class: class.name.clone(),
                    parent: parent.clone(),
                    span: class.span,
                });
            }
        }

        self.classes.insert(class.name.clone(), class.clone());
        Ok(())
    }

    /// Validates parent links and acyclicity, then marks every class
    /// whose ancestor chain fails to reach the root as invalid.
    pub fn validate(&mut self, diagnostics: &mut Diagnostics) {
        self.validate_parents(diagnostics);
        self.validate_acyclic(diagnostics);
        self.mark_unrooted();
        self.validated = true;
    }

    /// Checks that every class's declared parent is registered.
    ///
    /// A class with an unknown parent is reported; it keeps its table
    /// entry so feature lookups against it still resolve where possible.
    fn validate_parents(&mut self, diagnostics: &mut Diagnostics) {
        for class in self.classes.values() {
            let Some(parent) = &class.parent else {
                continue;
            };
            if !self.classes.contains_key(parent) {
                diagnostics.report(SemanticError::new(
                    SemanticErrorKind::UndefinedParent {
                        class: class.name.clone(),
                        parent: parent.clone(),
                    },
                    class.span,
                ));
            }
        }
    }

    /// Detects inheritance cycles.
    ///
    /// Every class whose ancestor chain enters a cycle is reported — the
    /// cycle members themselves and every descendant that inherits
    /// through them — so the user sees the full blast radius, not one
    /// representative.
    fn validate_acyclic(&mut self, diagnostics: &mut Diagnostics) {
        let mut implicated: Vec<(Symbol, Symbol, Span)> = Vec::new();

        for class in self.classes.values() {
            let mut visited = HashSet::new();
            visited.insert(class.name.clone());
            let mut current = class.parent.clone();
            while let Some(name) = current {
                if !visited.insert(name.clone()) {
                    implicated.push((class.name.clone(), name, class.span));
                    break;
                }
                current = self
                    .classes
                    .get(&name)
                    .and_then(|info| info.parent.clone());
            }
        }

        // Deterministic reporting order regardless of hash iteration.
        implicated.sort_by(|a, b| a.0.cmp(&b.0));
        for (class, member, span) in implicated {
            diagnostics.report(SemanticError::new(
                SemanticErrorKind::InheritanceCycle { class, member },
                span,
            ));
        }
    }

    /// Marks every class whose ancestor chain does not terminate at the
    /// root as permanently invalid: orphans, cycle members, and every
    /// class that inherits through one of them. Invalid classes keep
    /// their table entries but only promise safe recovery answers from
    /// the hierarchy queries.
    fn mark_unrooted(&mut self) {
        let mut unrooted = Vec::new();
        for class in self.classes.values() {
            let mut visited = HashSet::new();
            visited.insert(class.name.clone());
            let mut rooted = class.parent.is_none();
            let mut current = class.parent.clone();
            while let Some(name) = current.take() {
                if !visited.insert(name.clone()) {
                    break;
                }
                let Some(decl) = self.classes.get(&name) else {
                    break;
                };
                match &decl.parent {
                    None => {
                        rooted = true;
                        break;
                    }
                    Some(parent) => current = Some(parent.clone()),
                }
            }
            if !rooted {
                unrooted.push(class.name.clone());
            }
        }
        self.invalid.extend(unrooted);
    }

    /// Looks up a class declaration by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    /// Returns true if the name is registered (valid or not).
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Returns true if the class is registered and survived validation.
    #[must_use]
    pub fn is_valid(&self, name: &str) -> bool {
        self.classes.contains_key(name) && !self.invalid.contains(name)
    }

    /// Returns an iterator over all registered class names.
    pub fn class_names(&self) -> impl Iterator<Item = &Symbol> {
        self.classes.keys()
    }

    /// Returns the ordered ancestor chain of a class, excluding the
    /// class itself, ending at `Object` for every valid class.
    ///
    /// For an invalid class the chain stops at the broken link or at the
    /// first repeat, so the walk always terminates.
    #[must_use]
    pub fn ancestors(&self, name: &str) -> Vec<Symbol> {
        debug_assert!(self.validated, "ancestor query before validation");
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(Symbol::from(name));
        let mut current = self.classes.get(name).and_then(|c| c.parent.clone());
        while let Some(parent) = current {
            if !visited.insert(parent.clone()) {
                break;
            }
            current = self
                .classes
                .get(&parent)
                .and_then(|info| info.parent.clone());
            chain.push(parent);
        }
        chain
    }

    /// Returns the length of the ancestor chain — 0 for `Object`.
    #[must_use]
    pub fn depth(&self, name: &str) -> usize {
        self.ancestors(name).len()
    }

    /// Returns true iff `child` is `ancestor` or inherits from it.
    #[must_use]
    pub fn is_subclass_of(&self, child: &str, ancestor: &str) -> bool {
        if child == ancestor {
            return true;
        }
        self.ancestors(child).iter().any(|a| a == ancestor)
    }

    /// Computes the least upper bound of two classes: the most specific
    /// class both conform to. `Object` when nothing else is shared.
    #[must_use]
    pub fn least_upper_bound(&self, a: &str, b: &str) -> Symbol {
        let mut chain_a = vec![Symbol::from(a)];
        chain_a.extend(self.ancestors(a));
        let chain_b: HashSet<Symbol> = std::iter::once(Symbol::from(b))
            .chain(self.ancestors(b))
            .collect();

        chain_a
            .into_iter()
            .find(|entry| chain_b.contains(entry))
            .unwrap_or_else(|| Symbol::from(OBJECT))
    }

    /// Folds [`Self::least_upper_bound`] over any number of classes.
    ///
    /// An empty slice recovers to `Object`; a single class is its own
    /// bound.
    #[must_use]
    pub fn least_upper_bound_all(&self, classes: &[Symbol]) -> Symbol {
        let Some((first, rest)) = classes.split_first() else {
            return Symbol::from(OBJECT);
        };
        rest.iter().fold(first.clone(), |bound, class| {
            self.least_upper_bound(&bound, class)
        })
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}
