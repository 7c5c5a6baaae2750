//! Unary operator implementations for the evaluator.
//!
//! Negation is defined for integers and decimals only and keeps the
//! operand's name; on anything else it is an unsupported operation, which
//! the evaluator reports while passing the operand through unchanged.
//! Logical not accepts booleans only.

use score_ir::UnaryOp;

use crate::errors::{invalid_unary_op, overflow, unsupported, EvalResult};
use crate::value::{Value, ValueData};

/// Evaluate a unary operation using direct pattern matching.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> EvalResult {
    match (value.data(), op) {
        // Numeric negation
        (Some(ValueData::Int(n)), UnaryOp::Neg) => n
            .checked_neg()
            .map(|n| value.with_data(ValueData::Int(n)))
            .ok_or_else(|| overflow("negation")),
        (Some(ValueData::Decimal(d)), UnaryOp::Neg) => {
            Ok(value.with_data(ValueData::Decimal(-d.clone())))
        }
        (_, UnaryOp::Neg) => Err(unsupported(format!(
            "cannot apply unary minus to `{}`",
            value.type_name()
        ))),

        // Logical not
        (Some(ValueData::Boolean(b)), UnaryOp::Not) => Ok(Value::boolean(!b)),
        (_, UnaryOp::Not) => Err(invalid_unary_op(op, value.type_name())),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::value::ValueType;

    mod negation {
        use super::*;

        #[test]
        fn int_positive() {
            assert_eq!(
                evaluate_unary(&Value::int(5), UnaryOp::Neg).unwrap(),
                Value::int(-5)
            );
        }

        #[test]
        fn int_negative() {
            assert_eq!(
                evaluate_unary(&Value::int(-5), UnaryOp::Neg).unwrap(),
                Value::int(5)
            );
        }

        #[test]
        fn int_min_overflows() {
            let err = evaluate_unary(&Value::int(i64::MIN), UnaryOp::Neg).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Arithmetic);
        }

        #[test]
        fn decimal_keeps_scale() {
            let result =
                evaluate_unary(&Value::parse(ValueType::Decimal, "2.50").unwrap(), UnaryOp::Neg)
                    .unwrap();
            assert_eq!(result.to_string(), "-2.50");
        }

        #[test]
        fn keeps_name() {
            let qty = Value::new("qty", ValueData::Int(3));
            let result = evaluate_unary(&qty, UnaryOp::Neg).unwrap();
            assert_eq!(result.name(), "qty");
            assert_eq!(result.as_int(), Some(-3));
        }

        #[test]
        fn string_is_unsupported() {
            let err = evaluate_unary(&Value::string("abc"), UnaryOp::Neg).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unsupported);
            assert_eq!(
                err.to_string(),
                "unsupported operation; cannot apply unary minus to `string`"
            );
        }

        #[test]
        fn duration_is_unsupported() {
            let value = Value::parse(ValueType::Duration, "PT1H").unwrap();
            let err = evaluate_unary(&value, UnaryOp::Neg).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unsupported);
        }
    }

    mod logical_not {
        use super::*;

        #[test]
        fn flips_booleans() {
            assert_eq!(
                evaluate_unary(&Value::boolean(true), UnaryOp::Not).unwrap(),
                Value::boolean(false)
            );
            assert_eq!(
                evaluate_unary(&Value::boolean(false), UnaryOp::Not).unwrap(),
                Value::boolean(true)
            );
        }

        #[test]
        fn result_is_unnamed() {
            let flag = Value::new("flag", ValueData::Boolean(true));
            assert_eq!(evaluate_unary(&flag, UnaryOp::Not).unwrap().name(), "");
        }

        #[test]
        fn rejects_non_booleans() {
            for value in [Value::int(0), Value::string("true"), Value::character('t')] {
                let err = evaluate_unary(&value, UnaryOp::Not).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::OperatorType);
            }
        }

        #[test]
        fn rejects_absent() {
            let value = Value::declared("flag", ValueType::Boolean);
            let err = evaluate_unary(&value, UnaryOp::Not).unwrap_err();
            assert_eq!(err.to_string(), "operator `!` cannot be applied to `absent`");
        }
    }
}
