//! Root namespace provider.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::{Node, PathStep, Scope, ScopeRef, ValueCell};
use crate::errors::{unsupported, EvalResult};
use crate::value::Value;

/// Root of a namespace: scopes registered under their reference tags.
///
/// A variable reference starts at one of these scopes, selected by its
/// leading tag (`this.legs[0].qty`, `$total`). References without a tag use
/// the evaluator's default prefix, [`SymbolResolver::THIS`] unless configured
/// otherwise.
#[derive(Default)]
pub struct SymbolResolver {
    scopes: FxHashMap<String, ScopeRef>,
}

impl SymbolResolver {
    /// Tag of the record under evaluation.
    pub const THIS: &'static str = "this.";
    /// Tag of rule-local variables.
    pub const VARIABLES: &'static str = "$";
    /// Tag of code-set lookups.
    pub const CODES: &'static str = "^";

    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `scope` as the root for references tagged `tag`.
    ///
    /// Replaces any scope previously registered under the same tag.
    pub fn nest_scope(&mut self, tag: impl Into<String>, scope: ScopeRef) {
        let tag = tag.into();
        tracing::trace!(tag = %tag, scope = scope.name(), "nest scope");
        self.scopes.insert(tag, scope);
    }

    pub fn scope(&self, tag: &str) -> Option<ScopeRef> {
        self.scopes.get(tag).map(Rc::clone)
    }
}

impl Scope for SymbolResolver {
    fn name(&self) -> &str {
        "root"
    }

    fn resolve(&self, step: &PathStep) -> Option<Node> {
        if step.index().is_some() {
            return None;
        }
        self.scope(step.name()).map(Node::Scope)
    }

    fn assign(&self, step: &PathStep, _value: Value) -> EvalResult<ValueCell> {
        Err(unsupported(format!(
            "cannot assign `{step}` at the namespace root"
        )))
    }
}
