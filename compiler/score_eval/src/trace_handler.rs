//! Trace handler for scope-transition notices.
//!
//! With tracing enabled, the evaluator announces every scope it enters
//! ("Current scope <name>"). Notices can go to different destinations:
//! - Log: `tracing::info!` events (default)
//! - Buffer: captured for assertions and embedding hosts
//! - Silent: discarded
//!
//! Uses enum dispatch instead of trait objects; the destinations are a
//! closed set.

use std::sync::Arc;

use parking_lot::Mutex;

/// Trace handler that emits notices as log events.
#[derive(Default)]
pub struct LogTraceHandler;

impl LogTraceHandler {
    pub fn notice(&self, msg: &str) {
        tracing::info!(target: "score::trace", "{msg}");
    }
}

/// Trace handler that captures notices, one per line.
pub struct BufferTraceHandler {
    buffer: Mutex<String>,
}

impl BufferTraceHandler {
    pub fn new() -> Self {
        BufferTraceHandler {
            buffer: Mutex::new(String::new()),
        }
    }

    pub fn notice(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    /// Get all captured notices.
    pub fn get_output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Default for BufferTraceHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Trace handler implementation using enum dispatch.
pub enum TraceHandler {
    /// Emits `tracing` events (default).
    Log(LogTraceHandler),
    /// Captures to a buffer.
    Buffer(BufferTraceHandler),
    /// Discards all notices.
    Silent,
}

impl TraceHandler {
    pub fn notice(&self, msg: &str) {
        match self {
            Self::Log(h) => h.notice(msg),
            Self::Buffer(h) => h.notice(msg),
            Self::Silent => {}
        }
    }

    /// Get all captured notices.
    ///
    /// Returns an empty string for handlers that don't capture (log, silent).
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_output(),
            Self::Log(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Shared trace handler that can be passed around.
pub type SharedTraceHandler = Arc<TraceHandler>;

/// Create the default logging trace handler.
pub fn log_handler() -> SharedTraceHandler {
    Arc::new(TraceHandler::Log(LogTraceHandler))
}

/// Create a buffer trace handler for capturing notices.
pub fn buffer_handler() -> SharedTraceHandler {
    Arc::new(TraceHandler::Buffer(BufferTraceHandler::new()))
}

/// Create a silent trace handler that discards all notices.
pub fn silent_handler() -> SharedTraceHandler {
    Arc::new(TraceHandler::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_handler_captures_one_line_per_notice() {
        let handler = BufferTraceHandler::new();
        handler.notice("Current scope trade");
        handler.notice("Current scope legs");
        assert_eq!(
            handler.get_output(),
            "Current scope trade\nCurrent scope legs\n"
        );
    }

    #[test]
    fn buffer_handler_clear() {
        let handler = BufferTraceHandler::new();
        handler.notice("Current scope trade");
        handler.clear();
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn shared_buffer_handler_dispatches() {
        let handler = buffer_handler();
        handler.notice("Current scope trade");
        assert_eq!(handler.get_output(), "Current scope trade\n");
        handler.clear();
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn silent_handler_discards() {
        let handler = silent_handler();
        handler.notice("Current scope trade");
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn log_handler_captures_nothing() {
        let handler = log_handler();
        handler.notice("Current scope trade");
        assert_eq!(handler.get_output(), "");
    }
}
