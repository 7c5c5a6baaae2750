//! `EvaluatorBuilder` for creating Evaluator instances with various configurations.

use score_diagnostic::{ErrorSink, LogErrorSink};

use super::Evaluator;
use crate::environment::{Scope, SymbolResolver};
use crate::trace_handler::{log_handler, SharedTraceHandler};

static LOG_SINK: LogErrorSink = LogErrorSink;

/// Builder for creating Evaluator instances.
///
/// Defaults: errors go to a [`LogErrorSink`], tracing is off, scope notices
/// go to the logging trace handler, and references without a scope tag are
/// resolved under [`SymbolResolver::THIS`].
pub struct EvaluatorBuilder<'a> {
    root: &'a dyn Scope,
    error_sink: Option<&'a dyn ErrorSink>,
    trace: bool,
    trace_handler: Option<SharedTraceHandler>,
    default_scope: Option<String>,
}

impl<'a> EvaluatorBuilder<'a> {
    /// Create a new builder over the namespace rooted at `root`.
    pub fn new(root: &'a dyn Scope) -> Self {
        Self {
            root,
            error_sink: None,
            trace: false,
            trace_handler: None,
            default_scope: None,
        }
    }

    /// Set the sink that receives semantic error messages.
    #[must_use]
    pub fn error_sink(mut self, sink: &'a dyn ErrorSink) -> Self {
        self.error_sink = Some(sink);
        self
    }

    /// Announce every scope transition to the trace handler.
    #[must_use]
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Set the trace handler for scope notices.
    ///
    /// Has no effect unless tracing is on.
    #[must_use]
    pub fn trace_handler(mut self, handler: SharedTraceHandler) -> Self {
        self.trace_handler = Some(handler);
        self
    }

    /// Set the scope tag used by references that do not name one.
    #[must_use]
    pub fn default_scope(mut self, tag: impl Into<String>) -> Self {
        self.default_scope = Some(tag.into());
        self
    }

    /// Build the evaluator.
    pub fn build(self) -> Evaluator<'a> {
        Evaluator {
            root: self.root,
            error_sink: self.error_sink.unwrap_or(&LOG_SINK),
            trace: self.trace,
            trace_handler: self.trace_handler.unwrap_or_else(log_handler),
            default_scope: self
                .default_scope
                .unwrap_or_else(|| SymbolResolver::THIS.to_string()),
        }
    }
}
