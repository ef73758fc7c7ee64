//! Condition parameters.
//!
//! Conditions take a variable number of arguments. Most are plain JSON
//! values (paths, operator names, compared values, haystacks); `filter`
//! takes a callback and `where` accepts a nested query in place of its
//! target.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::query::Query;

/// Callback used by `filter`: receives the item and any extra arguments.
pub type FilterFn = Arc<dyn Fn(&Value, &[Value]) -> bool + Send + Sync>;

/// Callback used as a nested `where` target: configures a sub-query.
pub type NestedFn = Arc<dyn for<'q> Fn(Query<'q>) -> Result<Query<'q>> + Send + Sync>;

/// One argument of a condition call.
#[derive(Clone)]
pub enum Param {
    /// Plain data.
    Value(Value),
    /// Predicate callback for `filter`.
    Filter(FilterFn),
    /// Sub-query configuration for a nested `where`.
    Nested(NestedFn),
}

impl Param {
    /// Wraps a filter callback.
    pub fn filter<F>(callback: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        Param::Filter(Arc::new(callback))
    }

    /// Wraps a nested-query callback.
    ///
    /// ```
    /// use serde_json::json;
    /// use treeseek::{Context, Param, Query};
    ///
    /// let data = json!([{"tags": ["a", "b"]}, {"tags": ["c"]}]);
    /// let hits = Query::new(Context::shared(), &data)?
    ///     .select("*")
    ///     .condition("where", vec![Param::nested(|q| Ok(q.and_where("tags.1", "=", "b")))])?
    ///     .count()?;
    /// assert_eq!(hits, 1);
    /// # Ok::<(), treeseek::QueryError>(())
    /// ```
    pub fn nested<F>(callback: F) -> Self
    where
        F: for<'q> Fn(Query<'q>) -> Result<Query<'q>> + Send + Sync + 'static,
    {
        Param::Nested(Arc::new(callback))
    }

    /// Returns the plain value, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Param::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the string, if this is a plain string value.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Short description of the parameter kind for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Param::Value(_) => "value",
            Param::Filter(_) => "filter callback",
            Param::Nested(_) => "nested query",
        }
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Param::Filter(_) => f.write_str("Filter(<callback>)"),
            Param::Nested(_) => f.write_str("Nested(<callback>)"),
        }
    }
}

impl From<Value> for Param {
    fn from(v: Value) -> Self {
        Param::Value(v)
    }
}

impl From<&Value> for Param {
    fn from(v: &Value) -> Self {
        Param::Value(v.clone())
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Value(Value::from(s))
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Value(Value::from(s))
    }
}

impl From<&String> for Param {
    fn from(s: &String) -> Self {
        Param::Value(Value::from(s.as_str()))
    }
}

impl From<bool> for Param {
    fn from(b: bool) -> Self {
        Param::Value(Value::from(b))
    }
}

impl From<i32> for Param {
    fn from(n: i32) -> Self {
        Param::Value(Value::from(n))
    }
}

impl From<i64> for Param {
    fn from(n: i64) -> Self {
        Param::Value(Value::from(n))
    }
}

impl From<u32> for Param {
    fn from(n: u32) -> Self {
        Param::Value(Value::from(n))
    }
}

impl From<u64> for Param {
    fn from(n: u64) -> Self {
        Param::Value(Value::from(n))
    }
}

impl From<usize> for Param {
    fn from(n: usize) -> Self {
        Param::Value(Value::from(n))
    }
}

impl From<f64> for Param {
    fn from(n: f64) -> Self {
        Param::Value(Value::from(n))
    }
}

impl From<Vec<Value>> for Param {
    fn from(items: Vec<Value>) -> Self {
        Param::Value(Value::Array(items))
    }
}

impl From<FilterFn> for Param {
    fn from(callback: FilterFn) -> Self {
        Param::Filter(callback)
    }
}

impl From<NestedFn> for Param {
    fn from(callback: NestedFn) -> Self {
        Param::Nested(callback)
    }
}
