//! Expression Types
//!
//! Core expression nodes and variants.
//!
//! # Design Notes
//! - `ExprKind` is closed: adding a node kind is a compile error in every
//!   `match` over it, including the evaluator's dispatch.
//! - Children are boxed; Score rules are small enough that an arena buys
//!   nothing.
//! - `text` is the node's source text, quoted verbatim in diagnostics.

use std::fmt;

use super::operators::{BinaryOp, UnaryOp, UnknownOperator};

/// Expression node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub text: String,
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    /// Literal value: `42`, `1.25`, `"abc"`, `2017-04-02`, ...
    Literal(Literal),

    /// Variable reference: `this.price`, `$total`, `legs[1].qty`
    Variable(VarRef),

    /// Assignment: `$total = this.price * this.qty`
    Assign { target: VarRef, value: Box<Expr> },

    /// Existence test: `exists this.price`
    Exists(VarRef),

    /// Unary operation: `-x`, `!flag`
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation: `a + b`, `a lt b`, `a and b`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Inclusive range test: `val between min and max`
    Range {
        value: Box<Expr>,
        min: Box<Expr>,
        max: Box<Expr>,
    },

    /// Membership test: `val in {a, b, c}`
    Contains {
        value: Box<Expr>,
        members: Vec<Expr>,
    },

    /// Parenthesized expression: `(a + b)`
    Paren(Box<Expr>),
}

/// Literal token with its kind.
///
/// `text` is the raw token. String and character literals keep their
/// delimiters; the evaluator strips them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

/// Literal token kinds produced by the parser.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralKind {
    Integer,
    Decimal,
    String,
    Char,
    Boolean,
    Date,
    Time,
    Timestamp,
    Duration,
}

/// A variable reference: an optional scope tag followed by qualifiers.
///
/// `scope` is the tag as written (`this.`, `$`, ...); `None` means the
/// implicit contextual record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarRef {
    pub scope: Option<String>,
    pub qualifiers: Vec<Qualifier>,
}

/// One dotted segment of a variable reference.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Qualifier {
    pub name: String,
    pub selector: Option<Selector>,
}

/// Element selector attached to a qualifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selector {
    /// `name[2]`. The grammar allows empty brackets, which select nothing.
    Index(Option<u32>),
    /// `name{id=expr}`
    Predicate { name: String, expr: Box<Expr> },
}

impl Expr {
    pub fn new(kind: ExprKind, text: impl Into<String>) -> Self {
        Expr {
            kind,
            text: text.into(),
        }
    }

    pub fn literal(kind: LiteralKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Expr::new(
            ExprKind::Literal(Literal {
                kind,
                text: text.clone(),
            }),
            text,
        )
    }

    pub fn integer(text: &str) -> Self {
        Expr::literal(LiteralKind::Integer, text)
    }

    pub fn decimal(text: &str) -> Self {
        Expr::literal(LiteralKind::Decimal, text)
    }

    /// String literal; `content` is wrapped in double quotes.
    pub fn string(content: &str) -> Self {
        Expr::literal(LiteralKind::String, format!("\"{content}\""))
    }

    /// Character literal; `c` is wrapped in single quotes.
    pub fn character(c: char) -> Self {
        Expr::literal(LiteralKind::Char, format!("'{c}'"))
    }

    pub fn boolean(b: bool) -> Self {
        Expr::literal(LiteralKind::Boolean, if b { "true" } else { "false" })
    }

    pub fn date(text: &str) -> Self {
        Expr::literal(LiteralKind::Date, text)
    }

    pub fn time(text: &str) -> Self {
        Expr::literal(LiteralKind::Time, text)
    }

    pub fn timestamp(text: &str) -> Self {
        Expr::literal(LiteralKind::Timestamp, text)
    }

    pub fn duration(text: &str) -> Self {
        Expr::literal(LiteralKind::Duration, text)
    }

    pub fn variable(var: VarRef) -> Self {
        let text = var.to_string();
        Expr::new(ExprKind::Variable(var), text)
    }

    pub fn assign(target: VarRef, value: Expr) -> Self {
        let text = format!("{target}={}", value.text);
        Expr::new(
            ExprKind::Assign {
                target,
                value: Box::new(value),
            },
            text,
        )
    }

    pub fn exists(var: VarRef) -> Self {
        let text = format!("exists {var}");
        Expr::new(ExprKind::Exists(var), text)
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        let text = format!("{op}{}", operand.text);
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            text,
        )
    }

    pub fn neg(operand: Expr) -> Self {
        Expr::unary(UnaryOp::Neg, operand)
    }

    pub fn not(operand: Expr) -> Self {
        Expr::unary(UnaryOp::Not, operand)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let text = format!("{}{op}{}", left.text, right.text);
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            text,
        )
    }

    /// Binary node from an operator token as the parser saw it.
    ///
    /// Keyword spellings (`lt`, `mod`, `and`) are kept in the source text.
    pub fn binary_token(token: &str, left: Expr, right: Expr) -> Result<Self, UnknownOperator> {
        let op: BinaryOp = token.parse()?;
        let text = if token.chars().all(char::is_alphabetic) {
            format!("{} {token} {}", left.text, right.text)
        } else {
            format!("{}{token}{}", left.text, right.text)
        };
        Ok(Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            text,
        ))
    }

    pub fn range(value: Expr, min: Expr, max: Expr) -> Self {
        let text = format!("{} between {} and {}", value.text, min.text, max.text);
        Expr::new(
            ExprKind::Range {
                value: Box::new(value),
                min: Box::new(min),
                max: Box::new(max),
            },
            text,
        )
    }

    pub fn contains(value: Expr, members: Vec<Expr>) -> Self {
        let listed: Vec<&str> = members.iter().map(|m| m.text.as_str()).collect();
        let text = format!("{} in {{{}}}", value.text, listed.join(","));
        Expr::new(
            ExprKind::Contains {
                value: Box::new(value),
                members,
            },
            text,
        )
    }

    pub fn paren(inner: Expr) -> Self {
        let text = format!("({})", inner.text);
        Expr::new(ExprKind::Paren(Box::new(inner)), text)
    }
}

impl VarRef {
    /// Reference rooted at the implicit contextual record.
    pub fn implicit() -> Self {
        VarRef::default()
    }

    /// Reference rooted at an explicit scope tag, e.g. `$` or `this.`.
    pub fn scoped(tag: impl Into<String>) -> Self {
        VarRef {
            scope: Some(tag.into()),
            qualifiers: Vec::new(),
        }
    }

    /// Appends a plain qualifier.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.qualifiers.push(Qualifier {
            name: name.into(),
            selector: None,
        });
        self
    }

    /// Appends an indexed qualifier, `name[index]`.
    #[must_use]
    pub fn indexed(mut self, name: impl Into<String>, index: u32) -> Self {
        self.qualifiers.push(Qualifier {
            name: name.into(),
            selector: Some(Selector::Index(Some(index))),
        });
        self
    }

    /// Appends a predicate qualifier, `name{key=expr}`.
    #[must_use]
    pub fn filtered(mut self, name: impl Into<String>, key: impl Into<String>, expr: Expr) -> Self {
        self.qualifiers.push(Qualifier {
            name: name.into(),
            selector: Some(Selector::Predicate {
                name: key.into(),
                expr: Box::new(expr),
            }),
        });
        self
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            f.write_str(scope)?;
        }
        for (i, qualifier) in self.qualifiers.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{qualifier}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.selector {
            None => Ok(()),
            Some(Selector::Index(Some(index))) => write!(f, "[{index}]"),
            Some(Selector::Index(None)) => f.write_str("[]"),
            Some(Selector::Predicate { name, expr }) => write!(f, "{{{name}={}}}", expr.text),
        }
    }
}
