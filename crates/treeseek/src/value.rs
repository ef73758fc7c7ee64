//! Scalar semantics for JSON values.
//!
//! Predicates compare data leniently: numbers compare across integer and
//! float representations, and a string that spells a number compares as
//! that number. [`Number`] carries numeric values through those
//! comparisons and through [`Query::sum`](crate::Query::sum).

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use serde_json::Value;

/// Numeric value preserving integer precision where possible.
///
/// Comparisons between different variants are exact for integers and go
/// through `f64` as soon as a float is involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer (only used above `i64::MAX`).
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Additive identity.
    pub const ZERO: Number = Number::I64(0);

    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Integer view, truncating floats. `None` for non-finite floats.
    pub fn to_i128(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(n as i128),
            Number::U64(n) => Some(n as i128),
            Number::F64(n) if n.is_finite() => Some(n.trunc() as i128),
            Number::F64(_) => None,
        }
    }

    /// Returns `true` for the integer variants.
    pub fn is_integer(self) -> bool {
        !matches!(self, Number::F64(_))
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::F64(_), _) | (_, Number::F64(_)) => {
                self.to_f64().partial_cmp(&other.to_f64())
            }
            _ => Some(self.to_i128()?.cmp(&other.to_i128()?)),
        }
    }

    fn from_i128(n: i128) -> Number {
        if let Ok(n) = i64::try_from(n) {
            Number::I64(n)
        } else if let Ok(n) = u64::try_from(n) {
            Number::U64(n)
        } else {
            Number::F64(n as f64)
        }
    }
}

impl Add for Number {
    type Output = Number;

    /// Integer sums stay integral until they overflow 64 bits.
    fn add(self, other: Number) -> Number {
        if self.is_integer() && other.is_integer() {
            if let (Some(a), Some(b)) = (self.to_i128(), other.to_i128()) {
                return Number::from_i128(a + b);
            }
        }
        Number::F64(self.to_f64() + other.to_f64())
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::I64(i)
        } else if let Some(u) = n.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<Number> for Value {
    /// Non-finite floats have no JSON form and become `null`.
    fn from(n: Number) -> Self {
        match n {
            Number::I64(i) => Value::from(i),
            Number::U64(u) => Value::from(u),
            Number::F64(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::from_i128(n as i128)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Parses a numeric string: optional surrounding whitespace, optional sign,
/// digits with an optional fraction and exponent.
pub fn parse_numeric(text: &str) -> Option<Number> {
    let text = text.trim();
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    if body.is_empty()
        || !body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || !body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::I64(i));
    }
    if let Ok(u) = text.trim_start_matches('+').parse::<u64>() {
        return Some(Number::U64(u));
    }
    text.parse::<f64>().ok().map(Number::F64)
}

/// Numeric view of a value: numbers, and strings that spell a number.
pub fn numeric(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(Number::from(n)),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

/// Booleans, numbers and strings. `null` is not a scalar.
pub fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

/// Emptiness: `null`, `false`, zero, `""`, `"0"`, and empty containers.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => Number::from(n).to_f64() == 0.0,
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Runtime type tag used by the `is` operator.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Text form of a scalar, as regex operators see it.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        _ => None,
    }
}

/// Lenient equality.
///
/// Numeric values (including numeric strings) compare by magnitude; all
/// other pairs fall back to structural JSON equality.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x.compare(y) == Some(Ordering::Equal);
    }
    a == b
}

/// Lenient ordering for the comparison operators.
///
/// Returns `None` when the pair has no meaningful order (either side is
/// null or a container, or a string meets a non-numeric value).
pub fn loose_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (numeric_or_bool(a), numeric_or_bool(b)) {
        return x.compare(y);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn numeric_or_bool(value: &Value) -> Option<Number> {
    match value {
        Value::Bool(b) => Some(Number::I64(*b as i64)),
        other => numeric(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_compare_mixed() {
        assert_eq!(Number::I64(10).compare(Number::U64(10)), Some(Ordering::Equal));
        assert_eq!(Number::I64(-1).compare(Number::U64(u64::MAX)), Some(Ordering::Less));
        assert_eq!(Number::I64(10).compare(Number::F64(10.5)), Some(Ordering::Less));
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    }

    #[test]
    fn number_add() {
        assert_eq!(Number::I64(2) + Number::I64(3), Number::I64(5));
        assert_eq!(Number::I64(2) + Number::F64(0.5), Number::F64(2.5));
        assert_eq!(Number::I64(i64::MAX) + Number::I64(1), Number::U64(i64::MAX as u64 + 1));
        assert!(matches!(Number::U64(u64::MAX) + Number::I64(1), Number::F64(_)));
    }

    #[test]
    fn number_into_value() {
        assert_eq!(Value::from(Number::I64(3)), json!(3));
        assert_eq!(Value::from(Number::F64(1.5)), json!(1.5));
        assert_eq!(Value::from(Number::F64(f64::INFINITY)), Value::Null);
    }

    #[test]
    fn numeric_strings() {
        assert_eq!(parse_numeric("42"), Some(Number::I64(42)));
        assert_eq!(parse_numeric(" -3 "), Some(Number::I64(-3)));
        assert_eq!(parse_numeric("1.5e2"), Some(Number::F64(150.0)));
        assert_eq!(parse_numeric(".5"), Some(Number::F64(0.5)));
        assert_eq!(parse_numeric("18446744073709551615"), Some(Number::U64(u64::MAX)));
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("-"), None);
        assert_eq!(parse_numeric("1-2"), None);
    }

    #[test]
    fn scalars() {
        assert!(is_scalar(&json!(1)));
        assert!(is_scalar(&json!("a")));
        assert!(is_scalar(&json!(false)));
        assert!(!is_scalar(&Value::Null));
        assert!(!is_scalar(&json!([1])));
        assert!(!is_scalar(&json!({})));
    }

    #[test]
    fn emptiness() {
        for empty in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(is_empty(&empty), "{empty} should be empty");
        }
        for full in [json!(true), json!(1), json!(-0.5), json!("a"), json!("00"), json!([0]), json!({"a": null})] {
            assert!(!is_empty(&full), "{full} should not be empty");
        }
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!(true)), "boolean");
        assert_eq!(type_name(&json!(1)), "integer");
        assert_eq!(type_name(&json!(1.0)), "double");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!([])), "array");
        assert_eq!(type_name(&json!({})), "object");
    }

    #[test]
    fn scalar_text_forms() {
        assert_eq!(scalar_text(&json!("a")), Some("a".to_string()));
        assert_eq!(scalar_text(&json!(12)), Some("12".to_string()));
        assert_eq!(scalar_text(&json!(true)), Some("1".to_string()));
        assert_eq!(scalar_text(&json!(false)), Some(String::new()));
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!([1])), None);
    }

    #[test]
    fn loose_equality() {
        assert!(loose_eq(&json!(1), &json!(1.0)));
        assert!(loose_eq(&json!("10"), &json!(10)));
        assert!(loose_eq(&json!("1e1"), &json!("10")));
        assert!(loose_eq(&json!("x"), &json!("x")));
        assert!(loose_eq(&json!([1, 2]), &json!([1, 2])));
        assert!(loose_eq(&json!(null), &json!(null)));
        assert!(!loose_eq(&json!("x"), &json!("y")));
        assert!(!loose_eq(&json!(null), &json!(0)));
        assert!(!loose_eq(&json!(true), &json!(1)));
    }

    #[test]
    fn loose_ordering() {
        assert_eq!(loose_cmp(&json!(2), &json!(10)), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!("2"), &json!(10)), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(loose_cmp(&json!(true), &json!(0)), Some(Ordering::Greater));
        assert_eq!(loose_cmp(&json!("a"), &json!(1)), None);
        assert_eq!(loose_cmp(&json!(null), &json!(1)), None);
        assert_eq!(loose_cmp(&json!([1]), &json!(1)), None);
    }
}
