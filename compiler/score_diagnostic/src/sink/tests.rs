use std::cell::RefCell;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn buffer_sink_keeps_order() {
    let sink = BufferErrorSink::new();
    sink.on_error("first");
    sink.on_error("second");
    assert_eq!(sink.messages(), vec!["first".to_string(), "second".to_string()]);
    assert_eq!(sink.len(), 2);
}

#[test]
fn buffer_sink_take_drains() {
    let sink = BufferErrorSink::new();
    sink.on_error("only");
    assert_eq!(sink.take(), vec!["only".to_string()]);
    assert!(sink.is_empty());
}

#[test]
fn buffer_sink_clear() {
    let sink = BufferErrorSink::new();
    sink.on_error("gone");
    sink.clear();
    assert!(sink.messages().is_empty());
}

#[test]
fn closure_is_a_sink() {
    let seen = RefCell::new(Vec::new());
    let sink = |msg: &str| seen.borrow_mut().push(msg.len());
    sink.on_error("abc");
    sink.on_error("");
    assert_eq!(*seen.borrow(), vec![3, 0]);
}

#[test]
fn shared_sink_through_dyn() {
    let buffer = Arc::new(BufferErrorSink::new());
    let shared: SharedErrorSink = buffer.clone();
    shared.on_error("via arc");
    assert_eq!(buffer.messages(), vec!["via arc".to_string()]);
}

#[test]
fn log_sink_does_not_panic() {
    LogErrorSink.on_error("logged");
}
