//! Tree-walking evaluator for Score expressions.
//!
//! # Architecture
//!
//! `eval` dispatches on the closed set of node kinds. Leaves produce literal
//! values or resolve variable paths against the namespace; composite nodes
//! evaluate their children first and combine the results through the
//! operator functions in `crate::operators` and `crate::unary_operators`.
//!
//! # Errors
//!
//! A node whose evaluation fails reports one message to the error sink,
//! `Semantic error; <detail> at '<source text>'`, and yields `None`. Its
//! parent sees an absent operand and carries on; nothing unwinds.
//!
//! # Variable resolution
//!
//! A reference starts at the root scope selected by its tag (or the default
//! tag) and resolves its qualifiers one step at a time, entering each scope
//! it passes through. The registers this moves live in an [`EvalContext`]
//! owned by the caller of `evaluate_with`, never in the evaluator, so one
//! evaluator can run any number of expressions.

mod builder;
mod context;

pub use builder::EvaluatorBuilder;
pub use context::EvalContext;

use score_diagnostic::ErrorSink;
use score_ir::{BinaryOp, Expr, ExprKind, Literal, LiteralKind, Selector, UnaryOp, VarRef};

use crate::environment::{Node, PathStep, Scope, ScopeRef};
use crate::errors::{
    missing_operand, type_mismatch, unknown_scope, unresolved_path, unsupported, ErrorKind,
    EvalError, EvalResult,
};
use crate::operators::evaluate_binary;
use crate::trace_handler::SharedTraceHandler;
use crate::unary_operators::evaluate_unary;
use crate::value::{Value, ValueType};
use context::Target;

/// Evaluates expression trees against a borrowed namespace.
pub struct Evaluator<'a> {
    root: &'a dyn Scope,
    error_sink: &'a dyn ErrorSink,
    trace: bool,
    trace_handler: SharedTraceHandler,
    default_scope: String,
}

impl<'a> Evaluator<'a> {
    /// Evaluator over `root` with the default configuration.
    pub fn new(root: &'a dyn Scope) -> Self {
        EvaluatorBuilder::new(root).build()
    }

    pub fn builder(root: &'a dyn Scope) -> EvaluatorBuilder<'a> {
        EvaluatorBuilder::new(root)
    }

    pub fn is_trace(&self) -> bool {
        self.trace
    }

    pub fn default_scope(&self) -> &str {
        &self.default_scope
    }

    /// Evaluates `expr` with a fresh context.
    ///
    /// Returns `None` when the expression (or a subexpression it depends on)
    /// could not be evaluated; the reasons have gone to the error sink.
    #[tracing::instrument(level = "debug", skip_all, fields(expr = %expr.text))]
    pub fn evaluate(&self, expr: &Expr) -> Option<Value> {
        let mut ctx = EvalContext::new();
        self.eval(expr, &mut ctx)
    }

    /// Evaluates `expr`, resetting and then using the caller's context.
    pub fn evaluate_with(&self, expr: &Expr, ctx: &mut EvalContext) -> Option<Value> {
        ctx.reset();
        self.eval(expr, ctx)
    }

    fn eval(&self, expr: &Expr, ctx: &mut EvalContext) -> Option<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => self.check(expr, eval_literal(literal)),
            ExprKind::Variable(var) => self.eval_variable(expr, var, ctx),
            ExprKind::Assign { target, value } => self.eval_assign(expr, target, value, ctx),
            ExprKind::Exists(var) => Some(Value::boolean(self.eval_exists(var, ctx))),
            ExprKind::Unary { op, operand } => self.eval_unary(expr, *op, operand, ctx),
            ExprKind::Binary { op, left, right } => self.eval_binary(expr, *op, left, right, ctx),
            ExprKind::Range { value, min, max } => self.eval_range(expr, value, min, max, ctx),
            ExprKind::Contains { value, members } => {
                self.eval_contains(expr, value, members, ctx)
            }
            ExprKind::Paren(inner) => self.eval(inner, ctx),
        }
    }

    // Variables

    fn eval_variable(&self, expr: &Expr, var: &VarRef, ctx: &mut EvalContext) -> Option<Value> {
        match self.resolve_var(var, ctx) {
            Ok(Target::Value(cell)) => Some(cell.get()),
            Ok(Target::Vacant | Target::Scope | Target::Broken) => None,
            Err(err) => {
                self.report(expr, &err);
                None
            }
        }
    }

    /// True iff the reference resolves to a value. Never reports.
    fn eval_exists(&self, var: &VarRef, ctx: &mut EvalContext) -> bool {
        matches!(self.resolve_var(var, ctx), Ok(Target::Value(_)))
    }

    fn eval_assign(
        &self,
        expr: &Expr,
        target: &VarRef,
        value: &Expr,
        ctx: &mut EvalContext,
    ) -> Option<Value> {
        let Some(value) = self.eval(value, ctx) else {
            self.report(expr, &missing_operand("assignment"));
            return None;
        };
        let result = self
            .resolve_var(target, ctx)
            .and_then(|resolved| assign_target(resolved, target, &value, ctx));
        self.check(expr, result)
    }

    /// Walks `var` from its root scope, leaving the registers in `ctx` at the
    /// last scope entered and the last step attempted.
    fn resolve_var(&self, var: &VarRef, ctx: &mut EvalContext) -> EvalResult<Target> {
        let tag = var.scope.as_deref().unwrap_or(&self.default_scope);
        let root_step = PathStep::new(tag);
        let root = self.root.resolve(&root_step);
        ctx.set_path_step(root_step);
        match root {
            Some(Node::Scope(scope)) => self.enter_scope(ctx, scope),
            _ => return Err(unknown_scope(tag)),
        }

        let last = var.qualifiers.len().saturating_sub(1);
        for (position, qualifier) in var.qualifiers.iter().enumerate() {
            let mut step = PathStep::new(&qualifier.name);
            match &qualifier.selector {
                None => {}
                Some(Selector::Index(index)) => {
                    step.set_index(index.and_then(|i| usize::try_from(i).ok()));
                }
                Some(Selector::Predicate { name, expr }) => {
                    ctx.set_path_step(step.with_predicate(name, (**expr).clone()));
                    return Err(unsupported(format!("predicate filter on `{qualifier}`")));
                }
            }

            let Some(scope) = ctx.scope_handle() else {
                return Ok(Target::Broken);
            };
            let node = scope.resolve(&step);
            tracing::trace!(scope = scope.name(), step = %step, found = node.is_some(), "resolve");
            ctx.set_path_step(step);

            let is_last = position == last;
            match node {
                Some(Node::Scope(next)) => self.enter_scope(ctx, next),
                Some(Node::Value(cell)) if is_last => return Ok(Target::Value(cell)),
                None if is_last => return Ok(Target::Vacant),
                Some(Node::Value(_)) | None => return Ok(Target::Broken),
            }
        }
        Ok(Target::Scope)
    }

    fn enter_scope(&self, ctx: &mut EvalContext, scope: ScopeRef) {
        if self.trace {
            self.trace_handler
                .notice(&format!("Current scope {}", scope.name()));
        }
        ctx.enter(scope);
    }

    // Operators

    fn eval_unary(
        &self,
        expr: &Expr,
        op: UnaryOp,
        operand: &Expr,
        ctx: &mut EvalContext,
    ) -> Option<Value> {
        let operand = self.eval(operand, ctx);
        match op {
            UnaryOp::Neg => {
                let Some(operand) = operand else {
                    self.report(expr, &missing_operand("operator `-`"));
                    return None;
                };
                match evaluate_unary(&operand, op) {
                    Ok(negated) => Some(negated),
                    // Unsupported negation passes the operand through
                    Err(err) if err.kind() == ErrorKind::Unsupported => {
                        self.report(expr, &err);
                        Some(operand)
                    }
                    Err(err) => {
                        self.report(expr, &err);
                        None
                    }
                }
            }
            UnaryOp::Not => {
                let result = operand
                    .ok_or_else(|| missing_operand("operator `!`"))
                    .and_then(|operand| evaluate_unary(&operand, op));
                self.check(expr, result)
            }
        }
    }

    fn eval_binary(
        &self,
        expr: &Expr,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        ctx: &mut EvalContext,
    ) -> Option<Value> {
        let left = self.eval(left, ctx);
        let right = self.eval(right, ctx);
        let result = match (left, right) {
            (Some(left), Some(right)) => evaluate_binary(&left, &right, op),
            _ => Err(missing_operand(&format!("operator `{op}`"))),
        };
        self.check(expr, result)
    }

    /// `min <= value <= max`, inclusive on both ends.
    fn eval_range(
        &self,
        expr: &Expr,
        value: &Expr,
        min: &Expr,
        max: &Expr,
        ctx: &mut EvalContext,
    ) -> Option<Value> {
        let value = self.eval(value, ctx);
        let min = self.eval(min, ctx);
        let max = self.eval(max, ctx);
        let result = match (value, min, max) {
            (Some(value), Some(min), Some(max)) => {
                evaluate_binary(&value, &min, BinaryOp::GtEq).and_then(|lower| {
                    let upper = evaluate_binary(&value, &max, BinaryOp::LtEq)?;
                    evaluate_binary(&lower, &upper, BinaryOp::And)
                })
            }
            _ => Err(missing_operand("range test")),
        };
        self.check(expr, result)
    }

    /// First true equality against the members, in order; otherwise false.
    ///
    /// Members that are absent or not comparable with the value are reported
    /// and skipped.
    fn eval_contains(
        &self,
        expr: &Expr,
        value: &Expr,
        members: &[Expr],
        ctx: &mut EvalContext,
    ) -> Option<Value> {
        let Some(value) = self.eval(value, ctx) else {
            self.report(expr, &missing_operand("membership test"));
            return None;
        };
        for member in members {
            let Some(candidate) = self.eval(member, ctx) else {
                self.report(expr, &missing_operand(&format!("member `{}`", member.text)));
                continue;
            };
            match evaluate_binary(&value, &candidate, BinaryOp::Eq) {
                Ok(equal) if equal.is_true() => return Some(equal),
                Ok(_) => {}
                Err(err) => self.report(expr, &err),
            }
        }
        Some(Value::boolean(false))
    }

    // Reporting

    fn check(&self, expr: &Expr, result: EvalResult) -> Option<Value> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.report(expr, &err);
                None
            }
        }
    }

    fn report(&self, expr: &Expr, err: &EvalError) {
        let message = format!("Semantic error; {err} at '{}'", expr.text);
        tracing::debug!(kind = ?err.kind(), "{message}");
        self.error_sink.on_error(&message);
    }
}

/// Stores `value` at a resolved assignment target.
fn assign_target(
    resolved: Target,
    target: &VarRef,
    value: &Value,
    ctx: &EvalContext,
) -> EvalResult {
    match resolved {
        Target::Value(cell) => {
            cell.borrow_mut().assign(value)?;
            Ok(cell.get())
        }
        Target::Vacant => {
            let (Some(scope), Some(step)) = (ctx.current_scope(), ctx.path_step()) else {
                return Err(unresolved_path(&target.to_string()));
            };
            tracing::trace!(
                scope = ctx.scope_name().unwrap_or_default(),
                step = %step,
                "bind new value"
            );
            let cell = scope.assign(step, value.renamed(step.name()))?;
            Ok(cell.get())
        }
        Target::Scope => Err(type_mismatch(
            &target.to_string(),
            "scope",
            value.type_name(),
        )),
        Target::Broken => Err(unresolved_path(&target.to_string())),
    }
}

/// Value of a literal token. String and character delimiters are stripped.
fn eval_literal(literal: &Literal) -> EvalResult {
    let text = literal.text.as_str();
    let (value_type, text) = match literal.kind {
        LiteralKind::Integer => (ValueType::Int, text),
        LiteralKind::Decimal => (ValueType::Decimal, text),
        LiteralKind::String => (ValueType::String, strip_delimiters(text)),
        LiteralKind::Char => (ValueType::Char, strip_delimiters(text)),
        LiteralKind::Boolean => (ValueType::Boolean, text),
        LiteralKind::Date => (ValueType::Date, text),
        LiteralKind::Time => (ValueType::Time, text),
        LiteralKind::Timestamp => (ValueType::Timestamp, text),
        LiteralKind::Duration => (ValueType::Duration, text),
    };
    Value::parse(value_type, text)
}

fn strip_delimiters(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
