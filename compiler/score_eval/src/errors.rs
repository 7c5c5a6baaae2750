//! Centralized error types and constructors for the evaluator.
//!
//! Operator, value, and scope functions return `EvalResult`; the evaluator
//! catches every `Err` at the node that produced it, reports it to the error
//! sink, and yields an absent result. Nothing in here is fatal.
//!
//! Build errors with the `#[cold]` constructor functions rather than the
//! variants directly, so message wording stays in one place.

use score_ir::{BinaryOp, UnaryOp};

use crate::value::{Value, ValueType};

/// Result of an evaluation step.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Semantic error raised while evaluating a subexpression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// Literal text does not match the canonical format of its type.
    #[error("cannot parse `{text}` as {value_type}")]
    Parse { value_type: ValueType, text: String },

    /// Assignment of data the target cannot hold.
    #[error("type mismatch; cannot assign {got} to `{target}` of type {expected}")]
    TypeMismatch {
        target: String,
        expected: String,
        got: String,
    },

    /// Operator applied to operands it is not defined for.
    #[error("operator `{op}` cannot be applied to {operands}")]
    OperatorType { op: &'static str, operands: String },

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    /// Root scope prefix the namespace provider does not know.
    #[error("unknown symbol scope `{scope}`")]
    UnknownScope { scope: String },

    /// A node that needs a definite value got an absent one.
    #[error("missing operand for {context}")]
    MissingOperand { context: String },

    #[error("unsupported operation; {operation}")]
    Unsupported { operation: String },

    /// Assignment target whose navigation broke before its final segment.
    #[error("cannot resolve path `{path}`")]
    UnresolvedPath { path: String },
}

/// Failures of otherwise well-typed arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("overflow in {0}")]
    Overflow(&'static str),
    /// Decimal quotient with no exact finite representation, e.g. `1/3`.
    #[error("non-terminating decimal expansion in division")]
    NonTerminating,
}

/// Fieldless error category, for matching without destructuring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    TypeMismatch,
    OperatorType,
    Arithmetic,
    UnknownScope,
    MissingOperand,
    Unsupported,
    UnresolvedPath,
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::Parse,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::OperatorType { .. } => ErrorKind::OperatorType,
            Self::Arithmetic(_) => ErrorKind::Arithmetic,
            Self::UnknownScope { .. } => ErrorKind::UnknownScope,
            Self::MissingOperand { .. } => ErrorKind::MissingOperand,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::UnresolvedPath { .. } => ErrorKind::UnresolvedPath,
        }
    }
}

// Value Errors

#[cold]
pub fn parse_error(value_type: ValueType, text: &str) -> EvalError {
    EvalError::Parse {
        value_type,
        text: text.to_string(),
    }
}

#[cold]
pub fn type_mismatch(target: &str, expected: &str, got: &str) -> EvalError {
    EvalError::TypeMismatch {
        target: target.to_string(),
        expected: expected.to_string(),
        got: got.to_string(),
    }
}

// Operator Errors

/// Operands of different, incompatible types.
#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::OperatorType {
        op: op.as_symbol(),
        operands: format!("`{left}` and `{right}`"),
    }
}

/// Operator not defined for a type it was given on both sides.
#[cold]
pub fn invalid_binary_op_for(type_name: &str, op: BinaryOp) -> EvalError {
    EvalError::OperatorType {
        op: op.as_symbol(),
        operands: type_name.to_string(),
    }
}

#[cold]
pub fn invalid_unary_op(op: UnaryOp, type_name: &str) -> EvalError {
    EvalError::OperatorType {
        op: op.as_symbol(),
        operands: format!("`{type_name}`"),
    }
}

#[cold]
pub fn division_by_zero() -> EvalError {
    ArithmeticError::DivisionByZero.into()
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    ArithmeticError::ModuloByZero.into()
}

#[cold]
pub fn non_terminating() -> EvalError {
    ArithmeticError::NonTerminating.into()
}

#[cold]
pub fn overflow(operation: &'static str) -> EvalError {
    ArithmeticError::Overflow(operation).into()
}

// Resolution Errors

#[cold]
pub fn unknown_scope(scope: &str) -> EvalError {
    EvalError::UnknownScope {
        scope: scope.to_string(),
    }
}

#[cold]
pub fn unresolved_path(path: &str) -> EvalError {
    EvalError::UnresolvedPath {
        path: path.to_string(),
    }
}

// Miscellaneous Errors

#[cold]
pub fn missing_operand(context: &str) -> EvalError {
    EvalError::MissingOperand {
        context: context.to_string(),
    }
}

#[cold]
pub fn unsupported(operation: impl Into<String>) -> EvalError {
    EvalError::Unsupported {
        operation: operation.into(),
    }
}
