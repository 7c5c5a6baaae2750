//! Per-evaluation traversal state.

use std::rc::Rc;

use crate::environment::{PathStep, ScopeRef, ValueCell};

/// The current-scope and current-path-step registers of one evaluation.
///
/// Created (or reset) at the start of every top-level evaluation and
/// threaded through the traversal by `&mut`. Variable resolution moves
/// `current_scope` down the namespace one step at a time; after an
/// evaluation finishes it holds the last scope entered.
#[derive(Default)]
pub struct EvalContext {
    current_scope: Option<ScopeRef>,
    path_step: Option<PathStep>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.current_scope = None;
        self.path_step = None;
    }

    pub fn current_scope(&self) -> Option<&ScopeRef> {
        self.current_scope.as_ref()
    }

    pub fn path_step(&self) -> Option<&PathStep> {
        self.path_step.as_ref()
    }

    pub(crate) fn enter(&mut self, scope: ScopeRef) {
        self.current_scope = Some(scope);
    }

    pub(crate) fn set_path_step(&mut self, step: PathStep) {
        self.path_step = Some(step);
    }

    pub(crate) fn scope_name(&self) -> Option<&str> {
        self.current_scope.as_ref().map(|scope| scope.name())
    }

    pub(crate) fn scope_handle(&self) -> Option<ScopeRef> {
        self.current_scope.as_ref().map(Rc::clone)
    }
}

/// Where a variable reference ended up.
pub(crate) enum Target {
    /// Resolved to a leaf value.
    Value(ValueCell),
    /// Every step but the last resolved; the last is unbound in the current
    /// scope. Assignment can bind it.
    Vacant,
    /// Resolved to a scope rather than a value.
    Scope,
    /// Navigation stopped before the last step.
    Broken,
}
