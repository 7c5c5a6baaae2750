//! Runtime values for the Score evaluator.
//!
//! A `Value` is a named, typed scalar. Its declared `ValueType` is fixed at
//! construction; its data may be absent (a declared but unset field) and may
//! be replaced through `assign`, which refuses data of an incompatible kind.
//!
//! Literal text is parsed and rendered in one canonical format per type, see
//! `literal.rs`.

mod literal;

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::errors::{missing_operand, parse_error, type_mismatch, EvalResult};

/// The closed set of scalar kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Decimal,
    Boolean,
    Char,
    String,
    Date,
    Time,
    Timestamp,
    Duration,
}

impl ValueType {
    pub const ALL: [ValueType; 9] = [
        ValueType::Int,
        ValueType::Decimal,
        ValueType::Boolean,
        ValueType::Char,
        ValueType::String,
        ValueType::Date,
        ValueType::Time,
        ValueType::Timestamp,
        ValueType::Duration,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::String => "string",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::Duration => "duration",
        }
    }

    /// Whether data of kind `source` may be assigned to a value of this type.
    ///
    /// Same kind always; integers widen into decimals.
    pub fn accepts(self, source: ValueType) -> bool {
        self == source || (self == Self::Decimal && source == Self::Int)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar payload of a value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueData {
    Int(i64),
    Decimal(BigDecimal),
    Boolean(bool),
    Char(char),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(DateTime<Utc>),
    Duration(TimeDelta),
}

impl ValueData {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::Decimal(_) => ValueType::Decimal,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Char(_) => ValueType::Char,
            Self::String(_) => ValueType::String,
            Self::Date(_) => ValueType::Date,
            Self::Time(_) => ValueType::Time,
            Self::Timestamp(_) => ValueType::Timestamp,
            Self::Duration(_) => ValueType::Duration,
        }
    }

    /// Converts to the representation of `target`, if `target` accepts it.
    fn coerce_to(&self, target: ValueType) -> Option<ValueData> {
        match (self, target) {
            (Self::Int(n), ValueType::Decimal) => Some(Self::Decimal(BigDecimal::from(*n))),
            (data, target) if data.value_type() == target => Some(data.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for ValueData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Decimal(d) => f.write_str(&literal::format_decimal(d)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::String(s) => f.write_str(s),
            Self::Date(d) => f.write_str(&literal::format_date(*d)),
            Self::Time(t) => f.write_str(&literal::format_time(*t)),
            Self::Timestamp(ts) => f.write_str(&literal::format_timestamp(*ts)),
            Self::Duration(d) => f.write_str(&literal::format_duration(*d)),
        }
    }
}

/// A named, typed scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Value {
    name: String,
    value_type: ValueType,
    data: Option<ValueData>,
}

impl Value {
    /// Named value holding `data`; the type follows the data.
    pub fn new(name: impl Into<String>, data: ValueData) -> Self {
        Value {
            name: name.into(),
            value_type: data.value_type(),
            data: Some(data),
        }
    }

    /// Named value of a declared type with no data yet.
    pub fn declared(name: impl Into<String>, value_type: ValueType) -> Self {
        Value {
            name: name.into(),
            value_type,
            data: None,
        }
    }

    // Unnamed constructors, used for literals and operator results.

    pub fn int(n: i64) -> Self {
        Value::new("", ValueData::Int(n))
    }

    pub fn decimal(d: BigDecimal) -> Self {
        Value::new("", ValueData::Decimal(d))
    }

    pub fn boolean(b: bool) -> Self {
        Value::new("", ValueData::Boolean(b))
    }

    pub fn character(c: char) -> Self {
        Value::new("", ValueData::Char(c))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::new("", ValueData::String(s.into()))
    }

    pub fn date(d: NaiveDate) -> Self {
        Value::new("", ValueData::Date(d))
    }

    pub fn time(t: NaiveTime) -> Self {
        Value::new("", ValueData::Time(t))
    }

    pub fn timestamp(ts: DateTime<Utc>) -> Self {
        Value::new("", ValueData::Timestamp(ts))
    }

    pub fn duration(d: TimeDelta) -> Self {
        Value::new("", ValueData::Duration(d))
    }

    /// Parses canonical literal text of the given type.
    ///
    /// String and character text arrives without its delimiters.
    pub fn parse(value_type: ValueType, text: &str) -> EvalResult {
        let data = match value_type {
            ValueType::Int => text.parse().ok().map(ValueData::Int),
            ValueType::Decimal => literal::parse_decimal(text).map(ValueData::Decimal),
            ValueType::Boolean => match text {
                "true" => Some(ValueData::Boolean(true)),
                "false" => Some(ValueData::Boolean(false)),
                _ => None,
            },
            ValueType::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(ValueData::Char(c)),
                    _ => None,
                }
            }
            ValueType::String => Some(ValueData::String(text.to_string())),
            ValueType::Date => literal::parse_date(text).map(ValueData::Date),
            ValueType::Time => literal::parse_time(text).map(ValueData::Time),
            ValueType::Timestamp => literal::parse_timestamp(text).map(ValueData::Timestamp),
            ValueType::Duration => literal::parse_duration(text).map(ValueData::Duration),
        };
        data.map(|data| Value::new("", data))
            .ok_or_else(|| parse_error(value_type, text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn data(&self) -> Option<&ValueData> {
        self.data.as_ref()
    }

    pub fn is_absent(&self) -> bool {
        self.data.is_none()
    }

    /// Type name for diagnostics; `absent` when there is no data.
    pub fn type_name(&self) -> &'static str {
        if self.data.is_some() {
            self.value_type.name()
        } else {
            "absent"
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            Some(ValueData::Boolean(b)) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.data {
            Some(ValueData::Int(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match &self.data {
            Some(ValueData::Decimal(d)) => Some(d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            Some(ValueData::String(s)) => Some(s),
            _ => None,
        }
    }

    /// True only for boolean `true`.
    pub fn is_true(&self) -> bool {
        self.as_bool() == Some(true)
    }

    /// Copy of this value under another name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Value {
            name: name.into(),
            value_type: self.value_type,
            data: self.data.clone(),
        }
    }

    /// Same value with its data replaced, bypassing the type check.
    ///
    /// Only for operators that preserve the kind (negation).
    pub(crate) fn with_data(&self, data: ValueData) -> Self {
        debug_assert_eq!(data.value_type(), self.value_type);
        Value {
            name: self.name.clone(),
            value_type: self.value_type,
            data: Some(data),
        }
    }

    /// Replaces this value's data with `source`'s.
    ///
    /// Fails without modifying `self` if `source` has no data or data this
    /// value's type does not accept.
    pub fn assign(&mut self, source: &Value) -> EvalResult<()> {
        let Some(data) = source.data() else {
            return Err(missing_operand(&format!("assignment to `{}`", self.name)));
        };
        let coerced = data.coerce_to(self.value_type).ok_or_else(|| {
            type_mismatch(&self.name, self.value_type.name(), source.type_name())
        })?;
        self.data = Some(coerced);
        Ok(())
    }
}

/// Renders the data in canonical text, or `<absent>`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "{data}"),
            None => f.write_str("<absent>"),
        }
    }
}
