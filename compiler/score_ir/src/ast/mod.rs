//! AST node types for Score expressions.

mod expr;
mod operators;

pub use expr::{Expr, ExprKind, Literal, LiteralKind, Qualifier, Selector, VarRef};
pub use operators::{BinaryOp, UnaryOp, UnknownOperator};

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
