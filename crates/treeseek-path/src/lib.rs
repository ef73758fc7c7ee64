//! Path walking over `serde_json` trees.
//!
//! A path pattern is a list of segments joined by a separator (`.` by
//! default). Walking a pattern against a node produces a [`Resolved`] value:
//! either a single addressed node or, as soon as the pattern fans out through
//! a wildcard, the set of every node it reached.
//!
//! # Pattern Syntax
//!
//! | Segment | Meaning |
//! |---------|---------|
//! | `name`  | Object key `name` |
//! | `3`     | Array index 3 (or the object key `"3"`) |
//! | `*`     | Every direct child (array elements, object values) |
//! | `**`    | Every descendant, depth first |
//!
//! ```rust
//! use serde_json::json;
//! use treeseek_path::{DotWalker, PathWalker};
//!
//! let data = json!({"users": [{"name": "ada"}, {"name": "linus"}]});
//!
//! let names = DotWalker.resolve(&data, "users.*.name", ".");
//! assert_eq!(names.primitive_value(), json!(["ada", "linus"]));
//!
//! let first = DotWalker.resolve(&data, "users.0.name", ".");
//! assert_eq!(first.primitive_value(), json!("ada"));
//! ```

mod pattern;
mod walker;

pub use pattern::Segment;
pub use walker::{DotWalker, PathWalker, Resolved, NULL};
