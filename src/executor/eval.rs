//! Predicate evaluation.
//!
//! Values are compared through their string form: numerically when both
//! sides are finite numbers, lexically otherwise. Ordering builds on the
//! same rule.

use std::cmp::Ordering;

use serde_json::Value;

use super::context::EvalContext;
use super::error::{ExecuteError, ExecuteResult};
use super::extract::NULL_HASH;
use crate::sql::{BinaryOperator, Expr, UnaryOperator};

/// Evaluate an expression against the entity in `ctx`.
pub fn evaluate(expr: &Expr, ctx: &EvalContext<'_>) -> ExecuteResult<Value> {
    match expr {
        Expr::Column(column) => ctx.value(column),

        Expr::Literal(lit) => Ok(lit.to_json()),

        Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And => {
                Ok(Value::Bool(matches(left, ctx)? && matches(right, ctx)?))
            }
            BinaryOperator::Or => {
                Ok(Value::Bool(matches(left, ctx)? || matches(right, ctx)?))
            }
            _ => {
                let l = evaluate(left, ctx)?;
                let r = evaluate(right, ctx)?;
                Ok(Value::Bool(eval_comparison(&l, *op, &r)))
            }
        },

        Expr::UnaryOp { op, expr } => {
            let v = evaluate(expr, ctx)?;
            eval_unary_op(*op, &v)
        }

        Expr::IsNull { expr, negated } => {
            let is_null = evaluate(expr, ctx)?.is_null();
            Ok(Value::Bool(is_null != *negated))
        }

        Expr::InList { expr, list, negated } => {
            let v = evaluate(expr, ctx)?;
            let mut in_list = false;
            for item in list {
                if values_equal(&v, &evaluate(item, ctx)?) {
                    in_list = true;
                    break;
                }
            }
            Ok(Value::Bool(in_list != *negated))
        }

        Expr::Between { expr, low, high, negated } => {
            let v = value_to_string(&evaluate(expr, ctx)?);
            let l = value_to_string(&evaluate(low, ctx)?);
            let h = value_to_string(&evaluate(high, ctx)?);
            let in_range = compare_scalars(&v, &l) != Ordering::Less
                && compare_scalars(&v, &h) != Ordering::Greater;
            Ok(Value::Bool(in_range != *negated))
        }

        Expr::Like { expr, pattern, negated } => {
            let v = value_to_string(&evaluate(expr, ctx)?);
            Ok(Value::Bool(like_match(&v, pattern) != *negated))
        }

        Expr::Function { name, args } => {
            let evaluated: Vec<Value> = args
                .iter()
                .map(|a| evaluate(a, ctx))
                .collect::<ExecuteResult<_>>()?;
            eval_function(name, &evaluated)
        }

        Expr::Nested(inner) => evaluate(inner, ctx),
    }
}

/// Evaluate a filter, returning true if the entity matches.
pub fn matches(expr: &Expr, ctx: &EvalContext<'_>) -> ExecuteResult<bool> {
    evaluate(expr, ctx).map(|v| value_to_bool(&v))
}

/// Compare two string forms: numeric if both are finite numbers, lexical
/// otherwise. This is a total order.
pub fn compare_scalars(a: &str, b: &str) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

/// The numeric value of a string form, if it has one. "nan" and "inf" parse
/// as f64 but count as text.
pub(crate) fn as_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn eval_comparison(left: &Value, op: BinaryOperator, right: &Value) -> bool {
    let ord = compare_scalars(&value_to_string(left), &value_to_string(right));
    match op {
        BinaryOperator::Eq => ord == Ordering::Equal,
        BinaryOperator::NotEq => ord != Ordering::Equal,
        BinaryOperator::Lt => ord == Ordering::Less,
        BinaryOperator::LtEq => ord != Ordering::Greater,
        BinaryOperator::Gt => ord == Ordering::Greater,
        BinaryOperator::GtEq => ord != Ordering::Less,
        BinaryOperator::And => value_to_bool(left) && value_to_bool(right),
        BinaryOperator::Or => value_to_bool(left) || value_to_bool(right),
    }
}

fn eval_unary_op(op: UnaryOperator, value: &Value) -> ExecuteResult<Value> {
    match op {
        UnaryOperator::Not => Ok(Value::Bool(!value_to_bool(value))),
        UnaryOperator::Minus => {
            let s = value_to_string(value);
            let n: f64 = s.trim().parse().map_err(|_| {
                ExecuteError::InvalidExpression(format!("cannot negate '{}'", s))
            })?;
            if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                Ok(Value::Number((-(n as i64)).into()))
            } else {
                Ok(serde_json::Number::from_f64(-n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null))
            }
        }
        UnaryOperator::Plus => Ok(value.clone()),
    }
}

fn eval_function(name: &str, args: &[Value]) -> ExecuteResult<Value> {
    let arg = match args {
        [single] => value_to_string(single),
        _ => {
            return Err(ExecuteError::InvalidExpression(format!(
                "{} takes exactly one argument",
                name
            )))
        }
    };

    match name.to_lowercase().as_str() {
        "lower" => Ok(Value::String(arg.to_lowercase())),
        "upper" => Ok(Value::String(arg.to_uppercase())),
        "length" | "len" => Ok(Value::Number(arg.chars().count().into())),
        _ => Err(ExecuteError::InvalidExpression(format!(
            "unknown function: {}",
            name
        ))),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    compare_scalars(&value_to_string(a), &value_to_string(b)) == Ordering::Equal
}

/// Convert a value to boolean.
fn value_to_bool(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// The string form used by comparisons. Null renders like a targetless hash.
fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => NULL_HASH.to_string(),
        _ => v.to_string(),
    }
}

/// LIKE pattern matching: `%` any sequence, `_` one character, case-insensitive.
fn like_match(s: &str, pattern: &str) -> bool {
    let s_chars: Vec<char> = s.chars().collect();
    let p_chars: Vec<char> = pattern.chars().collect();
    match_like(&s_chars, &p_chars)
}

fn match_like(s: &[char], p: &[char]) -> bool {
    match p.split_first() {
        None => s.is_empty(),
        Some(('%', rest)) => (0..=s.len()).any(|i| match_like(&s[i..], rest)),
        Some(('_', rest)) => !s.is_empty() && match_like(&s[1..], rest),
        Some((c, rest)) => match s.split_first() {
            Some((sc, s_rest)) => sc.to_lowercase().eq(c.to_lowercase()) && match_like(s_rest, rest),
            None => false,
        },
    }
}
