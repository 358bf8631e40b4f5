// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Accumulation of semantic diagnostics.
//!
//! All three analysis phases report into one [`Diagnostics`] sink, which
//! keeps diagnostics in the order they were raised and counts errors.
//! The pipeline consults [`Diagnostics::has_errors`] between phases to
//! decide whether the next phase may run.

use super::error::SemanticError;
use crate::source_analysis::Diagnostic;

/// An append-only collection of diagnostics with an error counter.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    error_count: usize,
}

impl Diagnostics {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a semantic error.
    pub fn report(&mut self, error: SemanticError) {
        self.push(error.into());
    }

    /// Records an already-built diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.entries.push(diagnostic);
    }

    /// Returns the collected diagnostics in reporting order.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Returns the number of error-severity diagnostics recorded so far.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Returns true if any error-severity diagnostic has been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count != 0
    }

    /// Consumes the sink, returning the diagnostics.
    #[must_use]
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
