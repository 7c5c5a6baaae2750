//! Binary operator implementations for the evaluator.
//!
//! Provides direct enum-based dispatch on the operand pair. The type set is
//! fixed (not user-extensible), so pattern matching is preferred over trait
//! objects for exhaustiveness checking.
//!
//! Every function returns `EvalResult`; an operator applied to operands it is
//! not defined for is an `OperatorType` error, never a panic.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use chrono::{DateTime, TimeDelta, Utc};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use score_ir::BinaryOp;

use crate::errors::{
    binary_type_mismatch, division_by_zero, invalid_binary_op_for, modulo_by_zero,
    non_terminating, overflow, EvalResult,
};
use crate::value::{Value, ValueData};

/// Checked arithmetic with overflow handling.
///
/// Used for Add, Sub, Mul where the only error case is overflow.
#[inline]
fn checked_arith<T>(result: Option<T>, wrap: fn(T) -> Value, op_name: &'static str) -> EvalResult {
    result.map(wrap).ok_or_else(|| overflow(op_name))
}

/// Checked division or remainder with zero guard.
#[inline]
fn checked_div<T, F>(
    is_zero: bool,
    op: F,
    wrap: fn(T) -> Value,
    op_kind: BinaryOp,
) -> EvalResult
where
    F: FnOnce() -> Option<T>,
{
    match (is_zero, op_kind) {
        (true, BinaryOp::Mod) => Err(modulo_by_zero()),
        (true, _) => Err(division_by_zero()),
        (false, BinaryOp::Mod) => op().map(wrap).ok_or_else(|| overflow("remainder")),
        (false, _) => op().map(wrap).ok_or_else(|| overflow("division")),
    }
}

/// Applies a comparison operator to an ordering.
///
/// Returns `None` for operators that are not comparisons.
#[inline]
fn compare(ordering: Ordering, op: BinaryOp) -> Option<bool> {
    let result = match op {
        BinaryOp::Eq => ordering.is_eq(),
        BinaryOp::NotEq => ordering.is_ne(),
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::GtEq => ordering.is_ge(),
        _ => return None,
    };
    Some(result)
}

/// Comparison-only types: anything but a comparison is an error.
fn eval_ordered<T: Ord + ?Sized>(a: &T, b: &T, op: BinaryOp, type_name: &str) -> EvalResult {
    compare(a.cmp(b), op)
        .map(Value::boolean)
        .ok_or_else(|| invalid_binary_op_for(type_name, op))
}

// Direct Dispatch Function

/// Evaluate a binary operation using direct pattern matching.
///
/// Integers promote to decimals when mixed with them. Absent operands are
/// type errors. Comparison and equality always produce booleans.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let (Some(a), Some(b)) = (left.data(), right.data()) else {
        return Err(binary_type_mismatch(op, left.type_name(), right.type_name()));
    };
    match (a, b) {
        (ValueData::Int(a), ValueData::Int(b)) => eval_int_binary(*a, *b, op),
        (ValueData::Decimal(a), ValueData::Decimal(b)) => eval_decimal_binary(a, b, op),
        (ValueData::Int(a), ValueData::Decimal(b)) => {
            eval_decimal_binary(&BigDecimal::from(*a), b, op)
        }
        (ValueData::Decimal(a), ValueData::Int(b)) => {
            eval_decimal_binary(a, &BigDecimal::from(*b), op)
        }
        (ValueData::Boolean(a), ValueData::Boolean(b)) => eval_bool_binary(*a, *b, op),
        (ValueData::Char(a), ValueData::Char(b)) => eval_ordered(a, b, op, "characters"),
        (ValueData::String(a), ValueData::String(b)) => {
            eval_ordered(a.as_str(), b.as_str(), op, "strings")
        }
        (ValueData::Date(a), ValueData::Date(b)) => eval_ordered(a, b, op, "dates"),
        (ValueData::Time(a), ValueData::Time(b)) => eval_ordered(a, b, op, "times"),
        (ValueData::Timestamp(a), ValueData::Timestamp(b)) => {
            eval_timestamp_binary(*a, *b, op)
        }
        (ValueData::Timestamp(a), ValueData::Duration(b)) => {
            eval_timestamp_duration_binary(*a, *b, op)
        }
        (ValueData::Duration(a), ValueData::Duration(b)) => eval_duration_binary(*a, *b, op),
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

// Type-Specific Evaluation Functions

/// Binary operations on integers.
///
/// Division truncates toward zero.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), Value::int, "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), Value::int, "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), Value::int, "multiplication"),
        BinaryOp::Div => checked_div(b == 0, || a.checked_div(b), Value::int, op),
        BinaryOp::Mod => checked_div(b == 0, || a.checked_rem(b), Value::int, op),
        _ => eval_ordered(&a, &b, op, "integers"),
    }
}

/// Binary operations on decimals.
///
/// Nothing is rounded. Addition and subtraction keep the larger scale
/// (`1.10 + 2.05 = 3.15`), multiplication the sum of the scales. Division
/// fails when the quotient has no finite decimal expansion.
fn eval_decimal_binary(a: &BigDecimal, b: &BigDecimal, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::decimal(a + b)),
        BinaryOp::Sub => Ok(Value::decimal(a - b)),
        BinaryOp::Mul => Ok(Value::decimal(a * b)),
        BinaryOp::Div if b.is_zero() => Err(division_by_zero()),
        BinaryOp::Mod if b.is_zero() => Err(modulo_by_zero()),
        BinaryOp::Div => exact_quotient(a, b).map(Value::decimal),
        BinaryOp::Mod => decimal_remainder(a, b).map(Value::decimal),
        _ => eval_ordered(a, b, op, "decimals"),
    }
}

/// `a / b` with no rounding, at the smallest scale that holds it exactly.
///
/// In lowest terms the quotient terminates iff the denominator has no prime
/// factors other than 2 and 5.
fn exact_quotient(a: &BigDecimal, b: &BigDecimal) -> EvalResult<BigDecimal> {
    let (dividend, dividend_scale) = a.as_bigint_and_exponent();
    let (divisor, divisor_scale) = b.as_bigint_and_exponent();

    let gcd = dividend.gcd(&divisor);
    let mut numerator = &dividend / &gcd;
    let mut denominator = &divisor / &gcd;
    if denominator.is_negative() {
        numerator = -numerator;
        denominator = -denominator;
    }

    let (twos, rest) = strip_factor(&denominator, 2);
    let (fives, rest) = strip_factor(&rest, 5);
    if !rest.is_one() {
        return Err(non_terminating());
    }

    let digits = twos.max(fives);
    let unscaled = numerator * (BigInt::from(10).pow(digits) / &denominator);
    let scale = i64::from(digits)
        .checked_add(dividend_scale)
        .and_then(|scale| scale.checked_sub(divisor_scale))
        .ok_or_else(|| overflow("division"))?;
    from_unscaled(unscaled, scale, "division")
}

/// Remainder of truncating division; the sign follows the dividend.
fn decimal_remainder(a: &BigDecimal, b: &BigDecimal) -> EvalResult<BigDecimal> {
    let (dividend, dividend_scale) = a.as_bigint_and_exponent();
    let (divisor, divisor_scale) = b.as_bigint_and_exponent();
    let scale = dividend_scale.max(divisor_scale);
    let dividend = shift_left(dividend, scale.abs_diff(dividend_scale), "remainder")?;
    let divisor = shift_left(divisor, scale.abs_diff(divisor_scale), "remainder")?;
    from_unscaled(dividend % divisor, scale, "remainder")
}

/// Count of `factor` in `n`, and what is left after dividing them out.
fn strip_factor(n: &BigInt, factor: u32) -> (u32, BigInt) {
    let factor = BigInt::from(factor);
    let mut rest = n.clone();
    let mut count = 0;
    while !rest.is_zero() && (&rest % &factor).is_zero() {
        rest /= &factor;
        count += 1;
    }
    (count, rest)
}

/// `n * 10^digits`.
fn shift_left(n: BigInt, digits: u64, op_name: &'static str) -> EvalResult<BigInt> {
    let digits = u32::try_from(digits).map_err(|_| overflow(op_name))?;
    Ok(n * BigInt::from(10).pow(digits))
}

/// Decimal from an unscaled integer. Negative scales are folded into the
/// integer so results always render in plain notation.
fn from_unscaled(unscaled: BigInt, scale: i64, op_name: &'static str) -> EvalResult<BigDecimal> {
    if scale >= 0 {
        return Ok(BigDecimal::new(unscaled, scale));
    }
    let unscaled = shift_left(unscaled, scale.unsigned_abs(), op_name)?;
    Ok(BigDecimal::new(unscaled, 0))
}

/// Binary operations on booleans.
///
/// `false < true`, matching `bool`'s `Ord`.
fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And => Ok(Value::boolean(a && b)),
        BinaryOp::Or => Ok(Value::boolean(a || b)),
        _ => eval_ordered(&a, &b, op, "booleans"),
    }
}

/// Binary operations on timestamps.
///
/// The difference of two timestamps is a duration.
fn eval_timestamp_binary(a: DateTime<Utc>, b: DateTime<Utc>, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Sub => Ok(Value::duration(a.signed_duration_since(b))),
        _ => eval_ordered(&a, &b, op, "timestamps"),
    }
}

/// Shifting a timestamp by a duration.
fn eval_timestamp_duration_binary(a: DateTime<Utc>, b: TimeDelta, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add_signed(b), Value::timestamp, "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub_signed(b), Value::timestamp, "subtraction"),
        _ => Err(binary_type_mismatch(op, "timestamp", "duration")),
    }
}

/// Binary operations on durations.
fn eval_duration_binary(a: TimeDelta, b: TimeDelta, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(&b), Value::duration, "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(&b), Value::duration, "subtraction"),
        _ => eval_ordered(&a, &b, op, "durations"),
    }
}
