//! Query builder and executor.
//!
//! A [`Query`] borrows a JSON tree, records a select path, conditions and
//! sort keys, and evaluates them afresh on every terminal call
//! ([`get`](Query::get), [`first`](Query::first), [`count`](Query::count), ...).

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::condition::{ConditionEntry, ConditionKind, Logical, Scope};
use crate::context::Context;
use crate::error::{QueryError, Result};
use crate::ordering::{multisort, Dir, OrderBy};
use crate::param::Param;
use crate::picked::Picked;
use crate::value::{parse_numeric, type_name, Number};

/// A query over borrowed JSON data.
///
/// Evaluation keeps an item when
///
/// ```text
/// keep = (every AND condition passes) || (at least one OR condition passes)
/// ```
///
/// The AND group is vacuously true when empty, so OR conditions only decide
/// anything once at least one AND condition fails.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use treeseek::{Context, Dir, Query};
///
/// let data = json!([
///     {"n": 1, "g": "x"},
///     {"n": 2, "g": "y"},
///     {"n": 3, "g": "x"},
/// ]);
///
/// let xs = Query::new(Context::shared(), &data)?
///     .select("*")
///     .and_where("g", "=", "x")
///     .sort_by([("n", Dir::Desc)])
///     .get()?;
///
/// assert_eq!(xs, vec![json!({"n": 3, "g": "x"}), json!({"n": 1, "g": "x"})]);
/// # Ok::<(), treeseek::QueryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Query<'d> {
    ctx: Arc<Context>,
    data: &'d Value,
    separator: String,
    select: Option<String>,
    conditions: Vec<ConditionEntry>,
    orderings: Vec<OrderBy>,
}

impl<'d> Query<'d> {
    /// Creates a query using the context's default separator.
    ///
    /// Fails with [`QueryError::InvalidInput`] unless `data` is an array or
    /// an object.
    pub fn new(ctx: Arc<Context>, data: &'d Value) -> Result<Self> {
        let separator = ctx.config().separator.clone();
        Query::with_separator(ctx, data, separator)
    }

    /// Creates a query with an explicit path separator.
    pub fn with_separator(
        ctx: Arc<Context>,
        data: &'d Value,
        separator: impl Into<String>,
    ) -> Result<Self> {
        if !(data.is_array() || data.is_object()) {
            return Err(QueryError::invalid_input(format!(
                "queries accept only arrays or objects, got {}",
                type_name(data)
            )));
        }

        Ok(Query {
            ctx,
            data,
            separator: separator.into(),
            select: None,
            conditions: Vec::new(),
            orderings: Vec::new(),
        })
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Sets the path whose matches are filtered. Nothing is evaluated yet.
    pub fn select(mut self, path: impl Into<String>) -> Self {
        self.select = Some(path.into());
        self
    }

    /// Registers a condition by identifier.
    ///
    /// Fails with [`QueryError::UnknownOperation`] if the identifier is not
    /// in the context's registry. Arguments are checked when the condition
    /// is applied, not here.
    pub fn condition(mut self, identifier: &str, params: Vec<Param>) -> Result<Self> {
        let kind = self.ctx.registry().lookup(identifier)?;
        self.conditions.push(ConditionEntry::new(kind, params));
        Ok(self)
    }

    fn push(mut self, kind: ConditionKind, params: Vec<Param>) -> Self {
        self.conditions.push(ConditionEntry::new(kind, params));
        self
    }

    /// Adds a `filter` condition: keeps items for which `callback` is true.
    pub fn filter<F>(self, callback: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        self.push(ConditionKind::Filter, vec![Param::filter(callback)])
    }

    /// Adds a `filter` condition whose callback also receives `extra`.
    pub fn filter_with<F>(self, callback: F, extra: Vec<Value>) -> Self
    where
        F: Fn(&Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        let mut params = vec![Param::filter(callback)];
        params.extend(extra.into_iter().map(Param::Value));
        self.push(ConditionKind::Filter, params)
    }

    /// Adds an AND `where` condition.
    pub fn and_where(self, target: impl Into<Param>, op: &str, compared: impl Into<Param>) -> Self {
        self.push(
            ConditionKind::Where,
            vec![target.into(), Param::from(op), compared.into()],
        )
    }

    /// Adds an AND `whereNot` condition.
    pub fn and_where_not(
        self,
        target: impl Into<Param>,
        op: &str,
        compared: impl Into<Param>,
    ) -> Self {
        self.push(
            ConditionKind::WhereNot,
            vec![target.into(), Param::from(op), compared.into()],
        )
    }

    /// Adds a `whereIn` condition.
    ///
    /// With a `sub_key`, the value at that path inside the resolved target
    /// is looked up in `haystack`; without one, the target itself is.
    pub fn and_where_in(
        self,
        target: impl Into<Param>,
        haystack: impl Into<Param>,
        sub_key: Option<&str>,
    ) -> Self {
        let mut params = vec![target.into(), haystack.into()];
        params.extend(sub_key.map(Param::from));
        self.push(ConditionKind::WhereIn, params)
    }

    /// Adds an OR `where` condition.
    pub fn or_where(self, target: impl Into<Param>, op: &str, compared: impl Into<Param>) -> Self {
        self.push(
            ConditionKind::OrWhere,
            vec![target.into(), Param::from(op), compared.into()],
        )
    }

    /// Adds an OR `whereNot` condition.
    pub fn or_where_not(
        self,
        target: impl Into<Param>,
        op: &str,
        compared: impl Into<Param>,
    ) -> Self {
        self.push(
            ConditionKind::OrWhereNot,
            vec![target.into(), Param::from(op), compared.into()],
        )
    }

    /// Adds an AND `where` condition whose target is a nested query.
    ///
    /// The callback configures a sub-query over the item; the condition
    /// passes when at least one match survives it.
    pub fn where_nested<F>(self, callback: F) -> Self
    where
        F: for<'q> Fn(Query<'q>) -> Result<Query<'q>> + Send + Sync + 'static,
    {
        self.push(ConditionKind::Where, vec![Param::nested(callback)])
    }

    /// Adds an OR `where` condition whose target is a nested query.
    pub fn or_where_nested<F>(self, callback: F) -> Self
    where
        F: for<'q> Fn(Query<'q>) -> Result<Query<'q>> + Send + Sync + 'static,
    {
        self.push(ConditionKind::OrWhere, vec![Param::nested(callback)])
    }

    /// Merges sort keys into the current ones.
    ///
    /// Keys already present keep their priority and take the new direction;
    /// new keys are appended as the lowest-priority tiebreakers.
    pub fn sort_by<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = (K, Dir)>,
        K: Into<String>,
    {
        for (field, dir) in keys {
            let field = field.into();
            match self.orderings.iter_mut().find(|o| o.field == field) {
                Some(existing) => existing.dir = dir,
                None => self.orderings.push(OrderBy::new(field, dir)),
            }
        }
        self
    }

    /// Adds an ascending sort key.
    pub fn order_asc(self, field: &str) -> Self {
        self.sort_by([(field, Dir::Asc)])
    }

    /// Adds a descending sort key.
    pub fn order_desc(self, field: &str) -> Self {
        self.sort_by([(field, Dir::Desc)])
    }

    /// Clears the select path, conditions and sort keys.
    pub fn reset(mut self) -> Self {
        self.select = None;
        self.conditions.clear();
        self.orderings.clear();
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// The data this query reads, untouched.
    pub fn all(&self) -> &'d Value {
        self.data
    }

    /// The path separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The select path, if one is set.
    pub fn selected(&self) -> Option<&str> {
        self.select.as_deref()
    }

    /// Registered conditions, in order.
    pub fn conditions(&self) -> &[ConditionEntry] {
        &self.conditions
    }

    /// Sort keys, highest priority first.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    /// The context this query was built from.
    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    fn scope(&self) -> Scope<'_> {
        Scope {
            ctx: &self.ctx,
            separator: &self.separator,
        }
    }

    /// Runs the condition engine on one item.
    ///
    /// AND conditions run in order and stop at the first failure. OR
    /// conditions only run when the AND group failed, and then all of them
    /// run.
    pub fn matches(&self, item: &Value) -> Result<bool> {
        let scope = self.scope();

        let mut and_pass = true;
        for entry in self.group(Logical::And) {
            if !entry.apply(&scope, item)? {
                and_pass = false;
                break;
            }
        }
        if and_pass {
            return Ok(true);
        }

        let mut or_pass = false;
        for entry in self.group(Logical::Or) {
            or_pass |= entry.apply(&scope, item)?;
        }
        Ok(or_pass)
    }

    fn group(&self, logical: Logical) -> impl Iterator<Item = &ConditionEntry> {
        self.conditions
            .iter()
            .filter(move |entry| entry.logical() == logical)
    }

    /// Builds a fresh result set: resolve, filter, sort.
    fn evaluate(&self) -> Result<Vec<Value>> {
        let Some(path) = self.select.as_deref() else {
            // Without a select path the data is returned as is: no
            // filtering, no sorting. Empty data yields nothing.
            return Ok(match self.data {
                Value::Array(items) => items.clone(),
                Value::Object(map) if map.is_empty() => Vec::new(),
                other => vec![other.clone()],
            });
        };

        let resolved = self.ctx.walker().resolve(self.data, path, &self.separator);
        let mut results = Vec::new();

        if resolved.is_iterable() {
            let candidates = resolved.items();
            for item in &candidates {
                let keep = self.matches(item)?;
                trace!(keep, "item evaluated");
                if keep {
                    results.push((*item).clone());
                }
            }
            debug!(
                path,
                candidates = candidates.len(),
                kept = results.len(),
                "query evaluated"
            );
        } else {
            // A directly addressed scalar is never filtered.
            results.push(resolved.primitive_value());
        }

        self.sort(&mut results);
        Ok(results)
    }

    fn sort(&self, results: &mut Vec<Value>) {
        if self.orderings.is_empty() {
            return;
        }

        let walker = self.ctx.walker();
        let columns: Vec<(Vec<Value>, Dir)> = self
            .orderings
            .iter()
            .map(|order| {
                let column = results
                    .iter()
                    .map(|item| {
                        walker
                            .resolve(item, &order.field, &self.separator)
                            .primitive_value()
                    })
                    .collect();
                (column, order.dir)
            })
            .collect();

        multisort(results, &columns);
    }

    // ========================================================================
    // Terminal operations
    // ========================================================================

    /// Returns the full result set.
    pub fn get(&self) -> Result<Vec<Value>> {
        self.evaluate()
    }

    /// Returns the first `n` results.
    ///
    /// `n == 1` yields [`Picked::One`]; any other `n` yields
    /// [`Picked::Many`]. An empty result set always yields an empty
    /// `Picked::Many`.
    pub fn first(&self, n: usize) -> Result<Picked> {
        let mut results = self.evaluate()?;
        if results.is_empty() {
            return Ok(Picked::Many(results));
        }
        if n == 1 {
            return Ok(Picked::One(results.swap_remove(0)));
        }
        results.truncate(n);
        Ok(Picked::Many(results))
    }

    /// Returns the last `n` results, in result order.
    ///
    /// Unwrapping follows the same rules as [`first`](Self::first).
    pub fn last(&self, n: usize) -> Result<Picked> {
        let mut results = self.evaluate()?;
        if results.is_empty() {
            return Ok(Picked::Many(results));
        }
        let tail = results.split_off(results.len().saturating_sub(n));
        if n == 1 {
            return Ok(Picked::One(tail.into_iter().next().unwrap_or(Value::Null)));
        }
        Ok(Picked::Many(tail))
    }

    /// Calls `visitor(item, index, snapshot)` for every result, in order.
    ///
    /// `item` is mutable and edits show up in the returned result set.
    /// `snapshot` is the result set as it was before the first call.
    pub fn each<F>(&self, mut visitor: F) -> Result<Vec<Value>>
    where
        F: FnMut(&mut Value, usize, &[Value]),
    {
        let mut results = self.evaluate()?;
        let snapshot = results.clone();
        for (index, item) in results.iter_mut().enumerate() {
            visitor(item, index, &snapshot);
        }
        Ok(results)
    }

    /// Adds up every scalar result.
    ///
    /// Numbers count as themselves, booleans as 0 or 1 and numeric strings
    /// as the number they spell. Everything else is skipped.
    pub fn sum(&self) -> Result<Number> {
        Ok(self
            .evaluate()?
            .iter()
            .filter_map(|item| match item {
                Value::Number(n) => Some(Number::from(n)),
                Value::Bool(b) => Some(Number::I64(i64::from(*b))),
                Value::String(s) => parse_numeric(s),
                _ => None,
            })
            .fold(Number::ZERO, |acc, n| acc + n))
    }

    /// Splits the result set into consecutive chunks of at most `size`.
    pub fn paged(&self, size: usize) -> Result<Vec<Vec<Value>>> {
        if size == 0 {
            return Err(QueryError::invalid_input("page size must be at least 1"));
        }
        Ok(self.evaluate()?.chunks(size).map(<[Value]>::to_vec).collect())
    }

    /// [`paged`](Self::paged) with the context's configured page size.
    pub fn paged_default(&self) -> Result<Vec<Vec<Value>>> {
        self.paged(self.ctx.config().page_size)
    }

    /// Number of results.
    pub fn count(&self) -> Result<usize> {
        Ok(self.evaluate()?.len())
    }
}
