//! Score IR - Expression tree types for the Score rule language.
//!
//! This crate contains the data structures the evaluator consumes:
//! - `Expr` / `ExprKind`: a closed sum type over every expression node kind
//! - `VarRef` / `Qualifier` / `Selector`: dotted, indexed variable paths
//! - `BinaryOp` / `UnaryOp`: operators, with their token synonyms
//!
//! The grammar and tokenizer live outside this workspace. A parser produces
//! these trees; hosts without one (and the tests) use the constructor
//! functions on `Expr`.
//!
//! Every node keeps the source text it was parsed from, so diagnostics can
//! quote the offending expression.

pub mod ast;

pub use ast::{
    BinaryOp, Expr, ExprKind, Literal, LiteralKind, Qualifier, Selector, UnaryOp, UnknownOperator,
    VarRef,
};
