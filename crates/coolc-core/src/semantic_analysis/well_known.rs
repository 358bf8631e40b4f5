// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Well-known class and identifier names.
//!
//! Cool's basic classes and the handful of special identifiers the
//! analyser treats specially. Comparing against these constants keeps the
//! spelling in one place; `Symbol` is `EcoString`, so `sym == OBJECT`
//! compares content directly.

/// The universal root class.
pub const OBJECT: &str = "Object";

/// The input/output class.
pub const IO: &str = "IO";

/// The integer class. Sealed: user classes may not inherit from it.
pub const INT: &str = "Int";

/// The boolean class. Sealed.
pub const BOOL: &str = "Bool";

/// The string class. Sealed.
pub const STRING: &str = "String";

/// The polymorphic "type of the receiver" marker.
pub const SELF_TYPE: &str = "SELF_TYPE";

/// The receiver identifier.
pub const SELF: &str = "self";

/// The class the program entry point must live in.
pub const MAIN: &str = "Main";

/// The entry-point method name.
pub const MAIN_METH: &str = "main";

/// Sentinel type of the "no expression" placeholder. Conforms to every
/// type, so absent initializers never fail conformance checks.
pub const NO_TYPE: &str = "_no_type";

/// Internal slot type of the basic classes' value attributes. Never
/// visible to user programs.
pub const PRIM_SLOT: &str = "_prim_slot";

/// Returns true if `name` is one of the three sealed value classes.
#[must_use]
pub fn is_sealed_basic(name: &str) -> bool {
    matches!(name, INT | BOOL | STRING)
}

/// Returns true if `name` is any of the five basic classes.
#[must_use]
pub fn is_basic_class(name: &str) -> bool {
    matches!(name, OBJECT | IO | INT | BOOL | STRING)
}
