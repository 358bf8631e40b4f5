// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Cool programs.
//!
//! The AST is produced by the parser (outside this crate) and consumed by
//! semantic analysis, which fills in the inferred-type slot on every
//! [`Expr`] for the code generator.
//!
//! # Design
//!
//! - **All nodes have spans** — required for precise diagnostics.
//! - **Closed expression enum** — [`ExprKind`] enumerates every Cool
//!   expression form, so both walker passes match exhaustively and a new
//!   variant is a compile error until every check handles it.
//! - **Write-once type slot** — [`Expr::ty`] starts `None` and is set by
//!   the type checker; later phases read it but never overwrite it.
//!
//! Dispatches always carry an explicit receiver: the parser desugars the
//! `m(args)` shorthand to `self.m(args)` before semantic analysis runs.

use crate::source_analysis::Span;
use ecow::EcoString;

/// An identifier: a class name, feature name, or variable name.
///
/// `EcoString` keeps short names inline and clones in O(1), so symbols are
/// passed around by value throughout the analyser.
pub type Symbol = EcoString;

/// Top-level container for a parsed Cool program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The class declarations, in source order.
    pub classes: Vec<ClassDecl>,
    /// Source location spanning the entire program.
    pub span: Span,
}

impl Program {
    /// Creates a new program from its class declarations.
    #[must_use]
    pub fn new(classes: Vec<ClassDecl>, span: Span) -> Self {
        Self { classes, span }
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Class name.
    pub name: Symbol,
    /// Declared parent class (`None` only for `Object`; the parser fills
    /// in `Object` for classes with no `inherits` clause).
    pub parent: Option<Symbol>,
    /// Attribute and method declarations, in source order.
    pub features: Vec<Feature>,
    /// Source location of the declaration.
    pub span: Span,
}

/// A feature declared by a class: an attribute or a method.
///
/// Attributes and methods share one namespace within a class.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    /// A typed attribute with an optional initializer.
    Attribute(Attribute),
    /// A method with typed formals and a declared return type.
    Method(Method),
}

impl Feature {
    /// Returns the declared name of this feature.
    #[must_use]
    pub fn name(&self) -> &Symbol {
        match self {
            Self::Attribute(attr) => &attr.name,
            Self::Method(method) => &method.name,
        }
    }

    /// Returns the source location of this feature.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Attribute(attr) => attr.span,
            Self::Method(method) => method.span,
        }
    }
}

/// An attribute declaration, e.g. `count : Int <- 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name.
    pub name: Symbol,
    /// Declared type (a class name or `SELF_TYPE`).
    pub declared_ty: Symbol,
    /// Initializer expression; [`ExprKind::NoExpr`] when absent.
    pub init: Expr,
    /// Source location of the declaration.
    pub span: Span,
}

/// A method declaration, e.g. `concat(s : String) : String { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Method name.
    pub name: Symbol,
    /// Formal parameters, in declaration order.
    pub formals: Vec<Formal>,
    /// Declared return type (a class name or `SELF_TYPE`).
    pub return_ty: Symbol,
    /// Method body.
    pub body: Expr,
    /// Source location of the declaration.
    pub span: Span,
}

/// A formal parameter of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    /// Parameter name.
    pub name: Symbol,
    /// Declared type. `SELF_TYPE` is not legal here; feature resolution
    /// rejects it.
    pub declared_ty: Symbol,
    /// Source location of the formal.
    pub span: Span,
}

/// A Cool expression.
///
/// The `ty` slot is `None` until the type checker runs; it is written
/// bottom-up exactly once per pass. The checker is deterministic, so
/// re-running it writes identical values.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The expression form and its children.
    pub kind: ExprKind,
    /// Source location of the expression.
    pub span: Span,
    ty: Option<Symbol>,
}

impl Expr {
    /// Creates an expression with an empty type slot.
    #[must_use]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
        }
    }

    /// Creates the "no expression" placeholder used for absent
    /// initializers.
    #[must_use]
    pub fn no_expr(span: Span) -> Self {
        Self::new(ExprKind::NoExpr, span)
    }

    /// Returns the inferred static type, if the checker has run.
    #[must_use]
    pub fn ty(&self) -> Option<&Symbol> {
        self.ty.as_ref()
    }

    /// Records the inferred static type for this expression.
    ///
    /// Returns the type back so checker arms can both annotate the node
    /// and hand the type to the parent in one statement.
    pub(crate) fn set_ty(&mut self, ty: Symbol) -> Symbol {
        self.ty = Some(ty.clone());
        ty
    }

    /// Returns true if this is the literal `self` reference.
    #[must_use]
    pub fn is_self_ref(&self) -> bool {
        matches!(&self.kind, ExprKind::Ident(name) if name == crate::semantic_analysis::well_known::SELF)
    }
}

/// The closed set of Cool expression forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// An integer literal.
    IntLit(i64),
    /// A boolean literal.
    BoolLit(bool),
    /// A string literal.
    StrLit(EcoString),

    /// An identifier reference, including the literal `self`.
    Ident(Symbol),

    /// An assignment, `target <- value`.
    Assign {
        /// The identifier being assigned to.
        target: Symbol,
        /// The value expression.
        value: Box<Expr>,
    },

    /// A dynamic dispatch, `receiver.method(args)`.
    Dispatch {
        /// The receiver expression.
        receiver: Box<Expr>,
        /// The method name.
        method: Symbol,
        /// Actual arguments, in order.
        args: Vec<Expr>,
    },

    /// A static dispatch, `receiver@Type.method(args)`, which resolves
    /// the method against `Type` rather than the receiver's own class.
    StaticDispatch {
        /// The receiver expression.
        receiver: Box<Expr>,
        /// The named ancestor class to dispatch through.
        static_ty: Symbol,
        /// The method name.
        method: Symbol,
        /// Actual arguments, in order.
        args: Vec<Expr>,
    },

    /// A conditional, `if pred then a else b fi`.
    Cond {
        /// The predicate.
        pred: Box<Expr>,
        /// The then-branch.
        then_branch: Box<Expr>,
        /// The else-branch.
        else_branch: Box<Expr>,
    },

    /// A loop, `while pred loop body pool`.
    Loop {
        /// The predicate.
        pred: Box<Expr>,
        /// The loop body.
        body: Box<Expr>,
    },

    /// A sequence of expressions, `{ e1; e2; ... }`. The grammar
    /// guarantees at least one element.
    Block {
        /// The expressions, in order.
        body: Vec<Expr>,
    },

    /// A let binding, `let name : ty <- init in body`. Multi-binding
    /// lets are desugared to nested single bindings by the parser.
    Let {
        /// The bound identifier.
        name: Symbol,
        /// Its declared type.
        declared_ty: Symbol,
        /// Initializer; [`ExprKind::NoExpr`] when absent.
        init: Box<Expr>,
        /// The body in which the binding is visible.
        body: Box<Expr>,
    },

    /// A case expression, `case scrutinee of branches esac`.
    Case {
        /// The scrutinized expression.
        scrutinee: Box<Expr>,
        /// The branches, in source order.
        branches: Vec<CaseBranch>,
    },

    /// An object creation, `new T`.
    New {
        /// The class to instantiate (a class name or `SELF_TYPE`).
        class: Symbol,
    },

    /// A void test, `isvoid e`.
    IsVoid(Box<Expr>),

    /// Integer negation, `~e`.
    Neg(Box<Expr>),

    /// Boolean complement, `not e`.
    Not(Box<Expr>),

    /// An arithmetic operation on integers.
    Arith {
        /// The operator.
        op: ArithOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },

    /// An ordering comparison on integers (`<` or `<=`).
    Compare {
        /// The operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },

    /// An equality test, `lhs = rhs`.
    Eq {
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },

    /// The "no expression" placeholder for absent initializers.
    NoExpr,
}

/// A branch of a `case` expression, `name : ty => body`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    /// The pattern variable bound within this branch.
    pub name: Symbol,
    /// The declared type tested by this branch.
    pub declared_ty: Symbol,
    /// The branch body.
    pub body: Expr,
    /// Source location of the branch.
    pub span: Span,
}

/// Arithmetic operators over `Int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl ArithOp {
    /// Returns the operator's source spelling, for diagnostics.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Ordering comparison operators over `Int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
}

impl CompareOp {
    /// Returns the operator's source spelling, for diagnostics.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}
