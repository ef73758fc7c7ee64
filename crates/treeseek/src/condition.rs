//! Condition variants and their application to a single item.
//!
//! Every condition carries a fixed [`Logical`] tag. The query engine splits
//! its conditions into an AND group and an OR group by that tag and keeps an
//! item when `AND-group || OR-group` holds.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::Context;
use crate::error::{QueryError, Result};
use crate::param::Param;
use crate::predicate;
use crate::value::loose_eq;

/// Which group a condition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logical {
    /// All AND conditions must pass; evaluation stops at the first failure.
    And,
    /// At least one OR condition must pass; all of them are evaluated.
    Or,
}

impl fmt::Display for Logical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Logical::And => "and",
            Logical::Or => "or",
        })
    }
}

/// The closed set of condition implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// `filter(callback, ...extra)`.
    Filter,
    /// `where(target, operator, compared)`.
    Where,
    /// Negated `where`.
    WhereNot,
    /// `whereIn(target, haystack, subKey)`.
    WhereIn,
    /// `where` in the OR group.
    OrWhere,
    /// `whereNot` in the OR group.
    OrWhereNot,
}

impl ConditionKind {
    /// Every built-in kind.
    pub const ALL: [ConditionKind; 6] = [
        ConditionKind::Filter,
        ConditionKind::Where,
        ConditionKind::WhereNot,
        ConditionKind::WhereIn,
        ConditionKind::OrWhere,
        ConditionKind::OrWhereNot,
    ];

    /// Names this kind is registered under. The first is canonical.
    pub fn identifiers(self) -> &'static [&'static str] {
        match self {
            ConditionKind::Filter => &["filter"],
            ConditionKind::Where => &["where"],
            ConditionKind::WhereNot => &["whereNot", "where_not"],
            ConditionKind::WhereIn => &["whereIn", "where_in"],
            ConditionKind::OrWhere => &["orWhere", "or_where"],
            ConditionKind::OrWhereNot => &["orWhereNot", "or_where_not"],
        }
    }

    /// The group this kind is evaluated in.
    pub fn logical(self) -> Logical {
        match self {
            ConditionKind::OrWhere | ConditionKind::OrWhereNot => Logical::Or,
            _ => Logical::And,
        }
    }

    /// Evaluates this condition for one item.
    pub(crate) fn apply(self, scope: &Scope<'_>, item: &Value, params: &[Param]) -> Result<bool> {
        match self {
            ConditionKind::Filter => filter_matches(item, params),
            ConditionKind::Where | ConditionKind::OrWhere => {
                predicate::where_matches(scope, item, params)
            }
            ConditionKind::WhereNot | ConditionKind::OrWhereNot => {
                predicate::where_matches(scope, item, params).map(|hit| !hit)
            }
            ConditionKind::WhereIn => where_in_matches(scope, item, params),
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifiers()[0])
    }
}

/// A registered condition with its stored arguments.
#[derive(Debug, Clone)]
pub struct ConditionEntry {
    kind: ConditionKind,
    params: Vec<Param>,
}

impl ConditionEntry {
    /// Creates an entry; the logical tag follows from the kind.
    pub fn new(kind: ConditionKind, params: Vec<Param>) -> Self {
        ConditionEntry { kind, params }
    }

    /// The condition implementation.
    pub fn kind(&self) -> ConditionKind {
        self.kind
    }

    /// The arguments given at registration, in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The group this entry is evaluated in.
    pub fn logical(&self) -> Logical {
        self.kind.logical()
    }

    pub(crate) fn apply(&self, scope: &Scope<'_>, item: &Value) -> Result<bool> {
        self.kind.apply(scope, item, &self.params)
    }
}

/// Read-only view of the owning query that predicates need.
///
/// Holds the context and separator only, never the condition list.
pub(crate) struct Scope<'a> {
    pub(crate) ctx: &'a Arc<Context>,
    pub(crate) separator: &'a str,
}

impl<'a> Scope<'a> {
    /// Resolves `target` against `item`: the current-item token yields the
    /// item itself, anything else is walked as a path.
    pub(crate) fn resolve_target<'v>(&self, item: &'v Value, target: &Param) -> Result<Cow<'v, Value>> {
        let path = path_text(target, "target")?;
        if self.ctx.is_current_item(&path) {
            return Ok(Cow::Borrowed(item));
        }
        let resolved = self.ctx.walker().resolve(item, &path, self.separator);
        Ok(match resolved {
            treeseek_path::Resolved::Node(node) => Cow::Borrowed(node),
            matches => Cow::Owned(matches.primitive_value()),
        })
    }
}

/// Reads a path argument. Numbers are accepted as single index segments.
pub(crate) fn path_text<'p>(param: &'p Param, role: &str) -> Result<Cow<'p, str>> {
    match param {
        Param::Value(Value::String(path)) => Ok(Cow::Borrowed(path)),
        Param::Value(Value::Number(n)) => Ok(Cow::Owned(n.to_string())),
        other => Err(QueryError::condition(format!(
            "{role} must be a path, got {}",
            describe(other)
        ))),
    }
}

fn describe(param: &Param) -> String {
    match param {
        Param::Value(value) => format!("{} value", crate::value::type_name(value)),
        other => other.kind().to_string(),
    }
}

fn filter_matches(item: &Value, params: &[Param]) -> Result<bool> {
    let Some((Param::Filter(callback), extra)) = params.split_first() else {
        return Err(QueryError::Configuration(
            "filter requires a valid callback to use".to_string(),
        ));
    };

    let extra = extra
        .iter()
        .map(|param| {
            param.as_value().cloned().ok_or_else(|| {
                QueryError::Configuration(format!(
                    "filter arguments after the callback must be plain values, got a {}",
                    param.kind()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(callback(item, &extra))
}

fn where_in_matches(scope: &Scope<'_>, item: &Value, params: &[Param]) -> Result<bool> {
    let target = params
        .first()
        .ok_or_else(|| QueryError::condition("whereIn expects a target and a haystack"))?;
    let path = path_text(target, "whereIn target")?;
    let walker = scope.ctx.walker();

    let value: &Value = if scope.ctx.is_current_item(&path) {
        item
    } else {
        walker.resolve(item, &path, scope.separator).first()
    };

    let Some(Param::Value(Value::Array(haystack))) = params.get(1) else {
        return Err(QueryError::condition(
            "whereIn requires an array as haystack to search",
        ));
    };

    let needle = match params.get(2) {
        None | Some(Param::Value(Value::Null)) => value,
        Some(sub_key) => {
            let key = path_text(sub_key, "whereIn sub key")?;
            if !(value.is_array() || value.is_object()) {
                return Err(QueryError::invalid_input(format!(
                    "whereIn cannot read '{key}' from a {} value",
                    crate::value::type_name(value)
                )));
            }
            walker.resolve(value, &key, scope.separator).first()
        }
    };

    Ok(haystack.iter().any(|candidate| loose_eq(candidate, needle)))
}
