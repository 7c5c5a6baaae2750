//! Error sinks.
//!
//! `ErrorSink` is the seam between the evaluator and its host. Sinks take
//! `&self` so a single sink can be shared by the evaluator and the code that
//! later reads it back; implementations needing state use interior
//! mutability.

use std::sync::Arc;

use parking_lot::Mutex;

/// Receives semantic error messages during evaluation.
///
/// Called zero or more times per evaluation. Must not panic; returning is
/// the only way to signal "handled", there is no way to halt traversal.
pub trait ErrorSink {
    fn on_error(&self, message: &str);
}

impl<F> ErrorSink for F
where
    F: Fn(&str),
{
    fn on_error(&self, message: &str) {
        self(message);
    }
}

/// Shared sink handle.
pub type SharedErrorSink = Arc<dyn ErrorSink + Send + Sync>;

/// Default sink: logs each message as a `tracing` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn on_error(&self, message: &str) {
        tracing::warn!(target: "score::semantic", "{message}");
    }
}

/// Sink that captures messages in order.
#[derive(Debug, Default)]
pub struct BufferErrorSink {
    messages: Mutex<Vec<String>>,
}

impl BufferErrorSink {
    pub fn new() -> Self {
        BufferErrorSink {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the captured messages.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Removes and returns everything captured so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl ErrorSink for BufferErrorSink {
    fn on_error(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

#[cfg(test)]
mod tests;
