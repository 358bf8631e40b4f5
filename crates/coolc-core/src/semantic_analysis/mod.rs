// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis for Cool.
//!
//! Three strictly sequential phases over a parsed [`Program`]:
//!
//! 1. **Class table** ([`class_table`]) — register every class, validate
//!    parent links, sealed-class rules, and acyclicity.
//! 2. **Feature resolution** ([`features`]) — per-class attribute and
//!    method tables, override compatibility, the `Main`/`main` gate.
//! 3. **Type checking** ([`type_checker`]) — bottom-up type synthesis
//!    over every expression, annotating the tree in place.
//!
//! Each phase's correctness depends on invariants the previous phase
//! established, so a phase that leaves errors behind stops the pipeline:
//! feature resolution never sees an unvalidated hierarchy, and the type
//! checker never sees half-resolved feature tables. The one fatal
//! condition — inheriting from a sealed basic class — aborts the
//! pipeline with an `Err` instead.
//!
//! [`analyse`] is the entry point; everything else is exposed for tests
//! and for drivers that want to run phases individually.

use crate::ast::Program;
use crate::source_analysis::Diagnostic;
use tracing::debug;

pub mod class_table;
pub mod diagnostics;
pub mod error;
pub mod features;
pub mod scope;
pub mod type_checker;
pub mod well_known;

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
mod property_tests;

pub use class_table::ClassTable;
pub use diagnostics::Diagnostics;
pub use error::{FatalError, SemanticError, SemanticErrorKind};
pub use features::FeatureTables;

/// The result of a completed (non-fatal) analysis run.
///
/// Holds the validated class table, the resolved feature tables, and
/// every diagnostic the phases produced. When [`Analysis::had_errors`]
/// is true, later phases were skipped and the input tree is only
/// partially annotated; the driver should stop compilation.
#[derive(Debug, Clone)]
pub struct Analysis {
    classes: ClassTable,
    features: FeatureTables,
    diagnostics: Diagnostics,
}

impl Analysis {
    /// The validated class table.
    #[must_use]
    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// The resolved per-class feature tables.
    #[must_use]
    pub fn features(&self) -> &FeatureTables {
        &self.features
    }

    /// The collected diagnostics, in reporting order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    /// The number of error-severity diagnostics.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }

    /// True if any phase reported an error.
    #[must_use]
    pub fn had_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Runs the full semantic pipeline over a program, annotating every
/// expression's type slot on success.
///
/// # Errors
///
/// Returns [`FatalError`] when a class inherits from a sealed basic
/// class; every other problem is collected as a diagnostic in the
/// returned [`Analysis`].
pub fn analyse(program: &mut Program) -> Result<Analysis, FatalError> {
    let mut diagnostics = Diagnostics::new();

    let mut classes = ClassTable::new();
    for class in &program.classes {
        classes.register(class, &mut diagnostics)?;
    }
    classes.validate(&mut diagnostics);
    debug!(
        classes = program.classes.len(),
        errors = diagnostics.error_count(),
        "class hierarchy validated"
    );
    if diagnostics.has_errors() {
        return Ok(Analysis {
            classes,
            features: FeatureTables::default(),
            diagnostics,
        });
    }

    let features = features::resolve_features(&classes, &mut diagnostics);
    features::check_program_entry(&features, &classes, program.span, &mut diagnostics);
    debug!(
        errors = diagnostics.error_count(),
        "feature tables resolved"
    );
    if diagnostics.has_errors() {
        return Ok(Analysis {
            classes,
            features,
            diagnostics,
        });
    }

    type_checker::check_program(program, &classes, &features, &mut diagnostics);
    debug!(
        errors = diagnostics.error_count(),
        "expression bodies checked"
    );

    Ok(Analysis {
        classes,
        features,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::test_helpers::{
        attribute, class, dispatch, ident, int, method, minimal_main, no_expr, program, self_ref,
        string,
    };
    use super::*;
    use crate::ast::Feature;

    fn messages(analysis: &Analysis) -> Vec<&str> {
        analysis
            .diagnostics()
            .iter()
            .map(|d| d.message.as_str())
            .collect()
    }

    #[test]
    fn valid_program_analyses_cleanly_and_annotates() {
        let mut prog = program(vec![
            minimal_main(),
            class(
                "Greeter",
                "IO",
                vec![method(
                    "greet",
                    &[],
                    "SELF_TYPE",
                    dispatch(self_ref(), "out_string", vec![string("hello\n")]),
                )],
            ),
        ]);
        let analysis = analyse(&mut prog).expect("not fatal");
        assert!(!analysis.had_errors(), "unexpected: {:?}", messages(&analysis));

        // The tree is annotated for codegen.
        let greeter = prog.classes.iter().find(|c| c.name == "Greeter").unwrap();
        let Feature::Method(greet) = &greeter.features[0] else {
            panic!()
        };
        assert_eq!(greet.body.ty().unwrap().as_str(), "SELF_TYPE");
    }

    #[test]
    fn hierarchy_errors_gate_feature_resolution() {
        // The unknown parent is a phase-1 error; the duplicate attribute
        // in Broken would be a phase-2 error and must not be reported.
        let mut prog = program(vec![
            minimal_main(),
            class("Orphan", "Nowhere", vec![]),
            class(
                "Broken",
                "Object",
                vec![
                    attribute("x", "Int", no_expr()),
                    attribute("x", "Int", no_expr()),
                ],
            ),
        ]);
        let analysis = analyse(&mut prog).expect("not fatal");
        assert_eq!(
            messages(&analysis),
            vec!["Class Orphan inherits from an undefined class Nowhere."]
        );
    }

    #[test]
    fn feature_errors_gate_type_checking() {
        // The duplicate method is a phase-2 error; the undeclared
        // identifier in its body would be a phase-3 error.
        let mut prog = program(vec![
            minimal_main(),
            class(
                "A",
                "Object",
                vec![
                    method("f", &[], "Int", int(1)),
                    method("f", &[], "Int", ident("ghost")),
                ],
            ),
        ]);
        let analysis = analyse(&mut prog).expect("not fatal");
        assert_eq!(messages(&analysis), vec!["Method f is multiply defined."]);
    }

    #[test]
    fn inheriting_a_sealed_class_is_fatal() {
        let mut prog = program(vec![minimal_main(), class("MyBool", "Bool", vec![])]);
        let err = analyse(&mut prog).unwrap_err();
        assert_eq!(err.to_string(), "Class MyBool cannot inherit class Bool.");
    }

    #[test]
    fn missing_main_is_reported_in_phase_two() {
        let mut prog = program(vec![class("A", "Object", vec![])]);
        let analysis = analyse(&mut prog).expect("not fatal");
        assert_eq!(messages(&analysis), vec!["Class Main is not defined."]);
    }

    #[test]
    fn main_without_main_method_is_reported() {
        let mut prog = program(vec![class("Main", "Object", vec![])]);
        let analysis = analyse(&mut prog).expect("not fatal");
        assert_eq!(messages(&analysis), vec!["No 'main' method in class Main."]);
    }

    #[test]
    fn type_errors_are_batched_not_first_only() {
        let mut prog = program(vec![
            minimal_main(),
            class(
                "A",
                "Object",
                vec![
                    method("f", &[], "Int", string("wrong")),
                    method("g", &[], "Object", ident("ghost")),
                ],
            ),
        ]);
        let analysis = analyse(&mut prog).expect("not fatal");
        assert_eq!(analysis.error_count(), 2);
    }

    #[test]
    fn analysis_exposes_tables_for_downstream_phases() {
        let mut prog = program(vec![minimal_main()]);
        let analysis = analyse(&mut prog).expect("not fatal");
        assert!(analysis.classes().is_registered("Main"));
        assert!(
            analysis
                .features()
                .lookup_method(analysis.classes(), "Main", "main")
                .is_some()
        );
    }
}
