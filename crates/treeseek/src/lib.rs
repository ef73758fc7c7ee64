//! Treeseek - fluent queries over nested JSON data.
//!
//! Treeseek borrows a `serde_json::Value` tree and lets you select a path in
//! it, filter the matches with chained conditions, sort them by one or more
//! fields and read the survivors back. It supports:
//!
//! - Dot paths with `*` and `**` wildcards (separator configurable)
//! - Comparison, parity, regex, type and emptiness operators
//! - AND / OR condition groups, negation, membership and nested sub-queries
//! - Custom callbacks as conditions
//! - Stable multi-field sorting
//! - Terminal helpers: `first`, `last`, `each`, `sum`, `paged`, `count`
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use treeseek::{Context, Query};
//!
//! let data = json!({
//!     "users": [
//!         {"name": "ann", "age": 31, "role": "admin"},
//!         {"name": "bob", "age": 17, "role": "user"},
//!         {"name": "cid", "age": 45, "role": "user"},
//!     ]
//! });
//!
//! let adults = Query::new(Context::shared(), &data)?
//!     .select("users.*")
//!     .and_where("age", ">=", 18)
//!     .order_desc("age")
//!     .get()?;
//!
//! assert_eq!(adults.len(), 2);
//! assert_eq!(adults[0]["name"], "cid");
//! # Ok::<(), treeseek::QueryError>(())
//! ```
//!
//! # Query Semantics
//!
//! Every registered condition belongs to the AND or the OR group:
//!
//! ```text
//! keep = (all AND conditions pass) || (at least one OR condition passes)
//! ```
//!
//! - **AND group**: evaluated in order, stops at the first failure
//!   (empty = passes)
//! - **OR group**: only evaluated when the AND group failed, every
//!   condition runs (empty = fails)
//!
//! A query made only of OR conditions therefore keeps every item.
//!
//! When the select path addresses a single scalar, that value is returned
//! as is and conditions are not applied. Without any select path the data
//! comes back unchanged.
//!
//! # Conditions
//!
//! | Identifier | Group | Arguments |
//! |------------|-------|-----------|
//! | `where` | AND | target, operator, compared |
//! | `whereNot` | AND | target, operator, compared |
//! | `whereIn` | AND | target, haystack, optional sub key |
//! | `orWhere` | OR | target, operator, compared |
//! | `orWhereNot` | OR | target, operator, compared |
//! | `filter` | AND | callback, extra values |
//!
//! A `where` target is a path relative to the item, the context's
//! [current-item token](Context::current_item) for the item itself, or a
//! nested query built with [`Query::where_nested`].
//!
//! # Operators
//!
//! | Operator | Names |
//! |----------|-------|
//! | equal | `=`, `eq`, `equal` |
//! | not equal | `!=`, `<>`, `notEq`, `notEqual` |
//! | lower | `<`, `lwr`, `minor` |
//! | greater | `>`, `gt`, `major` |
//! | lower or equal | `<=`, `lwrEq`, `minorEqual` |
//! | greater or equal | `>=`, `gtEq`, `majorEqual` |
//! | parity | `odd`, `even` |
//! | regex | `match`, `notMatch` |
//! | type | `is`, `getType`, `instanceOf` |
//! | emptiness | `empty`, `isEmpty` |
//! | keys | `has`, `hasNot` |

mod condition;
mod config;
mod context;
mod error;
mod op;
mod ordering;
mod param;
mod picked;
mod predicate;
mod query;
mod registry;
mod value;

pub use condition::{ConditionEntry, ConditionKind, Logical};
pub use config::Config;
pub use context::{Context, ContextBuilder};
pub use error::{QueryError, Result};
pub use op::Op;
pub use ordering::{compare_values, multisort, Dir, OrderBy};
pub use param::{FilterFn, NestedFn, Param};
pub use picked::Picked;
pub use query::Query;
pub use registry::ConditionRegistry;
pub use value::Number;

pub use treeseek_path::{DotWalker, PathWalker, Resolved};
