//! Hierarchical namespace for variable resolution.
//!
//! A namespace is a tree of scopes. Each scope maps names to nested scopes,
//! leaf values, or repeating groups (ordered instances addressed by a
//! zero-based index). Resolution is one path step at a time; the evaluator
//! walks a dotted reference by resolving each step against the scope the
//! previous step entered.
//!
//! # Thread Safety
//! Scopes and value cells use `Rc` and `RefCell`. They are not `Send`; the
//! namespace belongs to the thread evaluating against it.

mod resolver;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use score_ir::Expr;

use crate::errors::{type_mismatch, unresolved_path, EvalResult};
use crate::value::Value;

pub use resolver::SymbolResolver;

/// Filter attached to a path step (`legs{side=1}`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPredicate {
    pub name: String,
    pub expr: Expr,
}

/// One segment of a variable path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    name: String,
    index: Option<usize>,
    predicate: Option<PathPredicate>,
}

impl PathStep {
    pub fn new(name: impl Into<String>) -> Self {
        PathStep {
            name: name.into(),
            index: None,
            predicate: None,
        }
    }

    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn with_predicate(mut self, name: impl Into<String>, expr: Expr) -> Self {
        self.predicate = Some(PathPredicate {
            name: name.into(),
            expr,
        });
        self
    }

    pub fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn predicate(&self) -> Option<&PathPredicate> {
        self.predicate.as_ref()
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

/// A value's shared, mutable home inside a namespace.
///
/// Wraps `Rc<RefCell<Value>>` so every namespace allocation goes through
/// `ValueCell::new()`. Single-threaded.
#[repr(transparent)]
pub struct ValueCell(Rc<RefCell<Value>>);

impl ValueCell {
    #[inline]
    pub fn new(value: Value) -> Self {
        ValueCell(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, Value> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Value> {
        self.0.borrow_mut()
    }

    /// Owned snapshot of the current value.
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Whether both cells are the same binding.
    pub fn ptr_eq(&self, other: &ValueCell) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Clone for ValueCell {
    #[inline]
    fn clone(&self) -> Self {
        ValueCell(Rc::clone(&self.0))
    }
}

impl fmt::Debug for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueCell").field(&*self.0.borrow()).finish()
    }
}

/// Shared handle to a scope.
pub type ScopeRef = Rc<dyn Scope>;

/// Result of resolving one path step.
#[derive(Clone, Debug)]
pub enum Node {
    Scope(ScopeRef),
    Value(ValueCell),
}

/// A named resolution context.
pub trait Scope {
    fn name(&self) -> &str;

    /// Looks up one path step. A miss is `None`, not an error.
    fn resolve(&self, step: &PathStep) -> Option<Node>;

    /// Stores `value` under `step`.
    ///
    /// An existing leaf has its data replaced in place; otherwise a new leaf
    /// named after the step is bound. Returns the cell that now holds the
    /// data.
    fn assign(&self, step: &PathStep, value: Value) -> EvalResult<ValueCell>;
}

/// A binding inside a `RecordScope`.
#[derive(Clone, Debug)]
enum Binding {
    Scope(ScopeRef),
    Value(ValueCell),
    /// Repeating group: ordered instances, addressed by zero-based index.
    Group(Vec<Node>),
}

impl fmt::Debug for dyn Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({})", self.name())
    }
}

/// In-memory scope over a record of named fields.
pub struct RecordScope {
    name: String,
    bindings: RefCell<FxHashMap<String, Binding>>,
}

impl RecordScope {
    pub fn new(name: impl Into<String>) -> Self {
        RecordScope {
            name: name.into(),
            bindings: RefCell::new(FxHashMap::default()),
        }
    }

    /// Binds a leaf value under its own name; returns its cell.
    pub fn define_value(&self, value: Value) -> ValueCell {
        let cell = ValueCell::new(value);
        let name = cell.borrow().name().to_string();
        self.bindings
            .borrow_mut()
            .insert(name, Binding::Value(cell.clone()));
        cell
    }

    /// Binds a nested scope under its own name.
    pub fn define_scope(&self, scope: ScopeRef) {
        let name = scope.name().to_string();
        self.bindings.borrow_mut().insert(name, Binding::Scope(scope));
    }

    /// Binds a repeating group of instances under `name`.
    pub fn define_group(&self, name: impl Into<String>, instances: Vec<Node>) {
        self.bindings
            .borrow_mut()
            .insert(name.into(), Binding::Group(instances));
    }

    /// Snapshot of the leaf value bound under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        match self.bindings.borrow().get(name) {
            Some(Binding::Value(cell)) => Some(cell.get()),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }
}

impl Scope for RecordScope {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, step: &PathStep) -> Option<Node> {
        let bindings = self.bindings.borrow();
        match (bindings.get(step.name())?, step.index()) {
            (Binding::Scope(scope), None) => Some(Node::Scope(Rc::clone(scope))),
            (Binding::Value(cell), None) => Some(Node::Value(cell.clone())),
            (Binding::Group(instances), Some(index)) => instances.get(index).cloned(),
            _ => None,
        }
    }

    fn assign(&self, step: &PathStep, value: Value) -> EvalResult<ValueCell> {
        let existing = self.bindings.borrow().get(step.name()).cloned();
        match (existing, step.index()) {
            (Some(Binding::Value(cell)), None) => {
                cell.borrow_mut().assign(&value)?;
                Ok(cell)
            }
            (Some(Binding::Group(instances)), Some(index)) => match instances.get(index) {
                Some(Node::Value(cell)) => {
                    cell.borrow_mut().assign(&value)?;
                    Ok(cell.clone())
                }
                Some(Node::Scope(_)) => {
                    Err(type_mismatch(&step.to_string(), "scope", value.type_name()))
                }
                None => Err(unresolved_path(&step.to_string())),
            },
            (Some(Binding::Group(_)), None) => Err(type_mismatch(
                step.name(),
                "repeating group",
                value.type_name(),
            )),
            (Some(Binding::Scope(_)), _) => {
                Err(type_mismatch(step.name(), "scope", value.type_name()))
            }
            (Some(Binding::Value(_)) | None, Some(_)) => Err(unresolved_path(&step.to_string())),
            (None, None) => Ok(self.define_value(value.renamed(step.name()))),
        }
    }
}

impl fmt::Debug for RecordScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordScope")
            .field("name", &self.name)
            .field("bindings", &self.bindings.borrow().len())
            .finish()
    }
}
