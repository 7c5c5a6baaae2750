//! Score Eval - Evaluator for the Score rule language.
//!
//! Evaluates Score expression trees (`score_ir::Expr`) against a hierarchical
//! namespace of named, typed values, producing a typed result or reporting
//! semantic errors to an `ErrorSink`.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Value` / `ValueType`: typed scalars with canonical literal formats
//! - `evaluate_binary`: Direct enum-based binary operator dispatch
//! - `evaluate_unary`: Direct enum-based unary operator dispatch
//! - `Scope` / `RecordScope` / `SymbolResolver`: the namespace, one path step
//!   at a time
//! - `Evaluator`: tree walk over the expression, configured through
//!   `EvaluatorBuilder`
//!
//! Semantic errors never abort an evaluation: each failing node reports once
//! and yields an absent result.

mod environment;
pub mod errors;
pub mod interpreter;
mod operators;
mod trace_handler;
mod unary_operators;
mod value;

use std::sync::Once;

pub use environment::{
    Node, PathPredicate, PathStep, RecordScope, Scope, ScopeRef, SymbolResolver, ValueCell,
};
pub use errors::{ArithmeticError, ErrorKind, EvalError, EvalResult};
pub use interpreter::{EvalContext, Evaluator, EvaluatorBuilder};
pub use operators::evaluate_binary;
pub use trace_handler::{
    buffer_handler, log_handler, silent_handler, BufferTraceHandler, LogTraceHandler,
    SharedTraceHandler, TraceHandler,
};
pub use unary_operators::evaluate_unary;
pub use value::{Value, ValueData, ValueType};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Controlled by the `RUST_LOG` environment variable; does nothing when it
/// is unset. Safe to call more than once.
///
/// ```bash
/// RUST_LOG=score::semantic=warn,score_eval=debug cargo test -p score_eval
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
