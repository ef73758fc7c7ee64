//! The `where` predicate: target resolution and operator dispatch.

use regex::Regex;
use serde_json::Value;
use tracing::trace;
use treeseek_path::NULL;

use crate::condition::{path_text, Scope};
use crate::error::{QueryError, Result};
use crate::op::Op;
use crate::param::{NestedFn, Param};
use crate::query::Query;
use crate::value::{
    is_empty, is_scalar, loose_cmp, loose_eq, numeric, scalar_text, type_name,
};

/// Evaluates `where(target, operator, compared)` against `item`.
///
/// A nested-query target short-circuits everything else: the sub-query
/// runs over the item and the predicate holds when anything survives it.
pub(crate) fn where_matches(scope: &Scope<'_>, item: &Value, params: &[Param]) -> Result<bool> {
    let Some((target, rest)) = params.split_first() else {
        return Err(QueryError::condition(
            "where expects a target, an operator and a compared value",
        ));
    };

    if let Param::Nested(callback) = target {
        return nested_matches(scope, item, callback);
    }

    let operand = scope.resolve_target(item, target)?;

    let op = match rest.first() {
        Some(Param::Value(Value::String(name))) => {
            Op::parse(name).ok_or_else(|| QueryError::UnknownOperator(name.clone()))?
        }
        Some(Param::Value(other)) => return Err(QueryError::UnknownOperator(other.to_string())),
        Some(other) => return Err(QueryError::UnknownOperator(format!("<{}>", other.kind()))),
        None => {
            return Err(QueryError::condition(
                "where expects an operator after the target",
            ))
        }
    };

    let compared = match rest.get(1) {
        None => &NULL,
        Some(Param::Value(value)) => value,
        Some(other) => {
            return Err(QueryError::condition(format!(
                "'{op}' cannot compare against a {}",
                other.kind()
            )))
        }
    };

    dispatch(scope, op, &operand, compared)
}

fn nested_matches(scope: &Scope<'_>, item: &Value, callback: &NestedFn) -> Result<bool> {
    let wrapped = Value::Array(vec![item.clone()]);
    let nested = Query::with_separator(scope.ctx.clone(), &wrapped, scope.separator)?;
    let survivors = callback(nested)?.select("*").count()?;
    trace!(survivors, "nested query evaluated");
    Ok(survivors > 0)
}

/// Applies `op` to `(operand, compared)`.
fn dispatch(scope: &Scope<'_>, op: Op, operand: &Value, compared: &Value) -> Result<bool> {
    let hit = match op {
        Op::Equal => loose_eq(operand, compared),
        Op::NotEqual => !loose_eq(operand, compared),
        Op::Lower | Op::Greater | Op::LowerEqual | Op::GreaterEqual => {
            is_scalar(operand)
                && loose_cmp(operand, compared).is_some_and(|ordering| op.eval_ordering(ordering))
        }
        // Parity names are inverted: `odd` holds for multiples of two.
        Op::Odd => remainder_by_two(operand).is_some_and(|r| r == 0),
        Op::Even => remainder_by_two(operand).is_some_and(|r| r > 0),
        Op::Is => {
            let expected = compared.as_str().unwrap_or_else(|| type_name(compared));
            type_name(operand) == expected
        }
        Op::Empty => is_empty(operand),
        Op::Match => regex_test(operand, compared)?.unwrap_or(false),
        Op::NotMatch => regex_test(operand, compared)?.is_some_and(|hit| !hit),
        Op::InstanceOf => instance_of(scope, operand, compared),
        Op::Has => find_key(scope, operand, compared)?.unwrap_or(false),
        Op::HasNot => find_key(scope, operand, compared)?.is_some_and(|found| !found),
    };
    Ok(hit)
}

/// Remainder of the truncated integer value, keeping the sign of the operand.
fn remainder_by_two(operand: &Value) -> Option<i128> {
    numeric(operand)?.to_i128().map(|n| n % 2)
}

/// `None` when the operand is not a scalar.
fn regex_test(operand: &Value, pattern: &Value) -> Result<Option<bool>> {
    let Some(text) = scalar_text(operand) else {
        return Ok(None);
    };
    let Some(pattern) = pattern.as_str() else {
        return Err(QueryError::condition(format!(
            "match expects a pattern string, got {}",
            type_name(pattern)
        )));
    };
    Ok(Some(compile_pattern(pattern)?.is_match(&text)))
}

/// Regex metacharacters that never open a delimited pattern.
const META: &[char] = &['^', '$', '.', '*', '+', '?', '|', ')', '[', ']', '}'];

/// Flags accepted after a closing delimiter. `u` is accepted and ignored.
const FLAGS: &str = "imsxuU";

/// Compiles a pattern, accepting PCRE-style delimiters and trailing flags
/// (`/^ab+c$/i`, `#a.c#s`, `<x+>`). `(...)` and `{...}` count as delimiters
/// only when the opening bracket is closed by the last character; they take
/// no flags. Anything else is compiled as a plain regex.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex> {
    let (body, flags) = split_delimited(pattern).unwrap_or((pattern, ""));
    let inline: String = flags.chars().filter(|&flag| flag != 'u').collect();

    if inline.is_empty() {
        Ok(Regex::new(body)?)
    } else {
        Ok(Regex::new(&format!("(?{inline}){body}"))?)
    }
}

/// Splits a delimited pattern into body and flags. `None` for plain regexes.
fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let open = pattern.chars().next()?;
    if open.is_alphanumeric() || open == '\\' || open.is_whitespace() || META.contains(&open) {
        return None;
    }

    let start = open.len_utf8();
    match open {
        '(' | '{' => {
            let close = if open == '(' { ')' } else { '}' };
            let end = balanced_close(pattern, open, close)?;
            (end + close.len_utf8() == pattern.len()).then(|| (&pattern[start..end], ""))
        }
        _ => {
            let close = if open == '<' { '>' } else { open };
            let end = pattern[start..].rfind(close)? + start;
            let flags = &pattern[end + close.len_utf8()..];
            flags
                .chars()
                .all(|flag| FLAGS.contains(flag))
                .then(|| (&pattern[start..end], flags))
        }
    }
}

/// Byte offset of the bracket closing the one that opens `pattern`.
fn balanced_close(pattern: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in pattern.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn instance_of(scope: &Scope<'_>, operand: &Value, class: &Value) -> bool {
    let (Value::Object(map), Some(expected)) = (operand, class.as_str()) else {
        return false;
    };
    map.get(&scope.ctx.config().type_key)
        .and_then(Value::as_str)
        .is_some_and(|actual| actual == expected)
}

/// Looks for a sub-path inside the operand. `None` when the operand is
/// rejected by the container guard.
fn find_key(scope: &Scope<'_>, operand: &Value, key: &Value) -> Result<Option<bool>> {
    // No node is an array and an object at once, so this guard rejects every
    // operand and `has`/`hasNot` both evaluate to false.
    if !(operand.is_array() && operand.is_object()) {
        return Ok(None);
    }

    let key = Param::Value(key.clone());
    let path = path_text(&key, "has key")?;
    let found = scope
        .ctx
        .walker()
        .resolve(operand, &path, scope.separator)
        .first();
    Ok(Some(!found.is_null()))
}
