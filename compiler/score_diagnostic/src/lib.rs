//! Semantic error reporting for the Score evaluator.
//!
//! The evaluator never aborts on a semantic error. It formats the error with
//! the offending source text and hands it to an `ErrorSink`, then carries on
//! with an absent result for that subexpression. What happens to the message
//! is the host's business:
//! - `LogErrorSink`: emits a `tracing` warning (default)
//! - `BufferErrorSink`: captures messages for inspection (tests, embedding)
//! - any `Fn(&str)` closure

mod sink;

pub use sink::{BufferErrorSink, ErrorSink, LogErrorSink, SharedErrorSink};
