//! The walker contract and its default implementation.

use serde_json::Value;

use crate::pattern::Segment;

/// The node a missing path resolves to.
pub static NULL: Value = Value::Null;

/// Resolves path patterns against a data node.
///
/// Query evaluation never parses paths itself; it hands every pattern to a
/// walker. Implement this trait to plug in a different path syntax.
///
/// # Example
///
/// ```
/// use serde_json::{json, Value};
/// use treeseek_path::{PathWalker, Resolved};
///
/// /// Treats every pattern as a single top-level key.
/// struct FlatWalker;
///
/// impl PathWalker for FlatWalker {
///     fn resolve<'a>(&self, node: &'a Value, pattern: &str, _sep: &str) -> Resolved<'a> {
///         Resolved::Node(node.get(pattern).unwrap_or(&treeseek_path::NULL))
///     }
/// }
///
/// let data = json!({"a.b": 1});
/// assert_eq!(FlatWalker.resolve(&data, "a.b", ".").primitive_value(), json!(1));
/// ```
pub trait PathWalker: Send + Sync {
    /// Walks `pattern` (segments joined by `separator`) from `node`.
    fn resolve<'a>(&self, node: &'a Value, pattern: &str, separator: &str) -> Resolved<'a>;
}

/// Outcome of walking a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// The pattern fanned out through a wildcard; zero or more matches.
    Matches(Vec<&'a Value>),
    /// The pattern addressed one node. Missing nodes are `null`.
    Node(&'a Value),
}

impl<'a> Resolved<'a> {
    /// Returns `true` if this resolution can be iterated item by item.
    ///
    /// Match sets are always iterable; a single node is iterable when it is
    /// an array or an object.
    pub fn is_iterable(&self) -> bool {
        match self {
            Resolved::Matches(_) => true,
            Resolved::Node(node) => node.is_array() || node.is_object(),
        }
    }

    /// Number of items [`items`](Self::items) yields, or 1 for a scalar node.
    pub fn count(&self) -> usize {
        match self {
            Resolved::Matches(matches) => matches.len(),
            Resolved::Node(Value::Array(items)) => items.len(),
            Resolved::Node(Value::Object(map)) => map.len(),
            Resolved::Node(_) => 1,
        }
    }

    /// The items of an iterable resolution, in order.
    ///
    /// A container node yields its children (object values in map order);
    /// a scalar node yields itself.
    pub fn items(&self) -> Vec<&'a Value> {
        match self {
            Resolved::Matches(matches) => matches.clone(),
            Resolved::Node(node) => match *node {
                Value::Array(items) => items.iter().collect(),
                Value::Object(map) => map.values().collect(),
                scalar => vec![scalar],
            },
        }
    }

    /// The plain value behind this resolution.
    ///
    /// A single node is returned as is; a match set becomes an array of
    /// every match.
    pub fn primitive_value(&self) -> Value {
        match self {
            Resolved::Matches(matches) => {
                Value::Array(matches.iter().map(|v| (*v).clone()).collect())
            }
            Resolved::Node(node) => (*node).clone(),
        }
    }

    /// The addressed node, or the first match (`null` when there is none).
    pub fn first(&self) -> &'a Value {
        match self {
            Resolved::Matches(matches) => matches.first().copied().unwrap_or(&NULL),
            Resolved::Node(node) => *node,
        }
    }
}

/// Default walker: keys, indices, `*` and `**`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotWalker;

impl PathWalker for DotWalker {
    fn resolve<'a>(&self, node: &'a Value, pattern: &str, separator: &str) -> Resolved<'a> {
        let mut frontier: Vec<&'a Value> = vec![node];
        let mut fanned_out = false;

        for segment in Segment::parse_all(pattern, separator) {
            frontier = match segment {
                Segment::Wildcard => frontier.into_iter().flat_map(children).collect(),
                Segment::DeepWildcard => {
                    let mut out = Vec::new();
                    for current in frontier {
                        collect_descendants(current, &mut out);
                    }
                    out
                }
                Segment::Key(ref key) => {
                    let index = segment.as_index();
                    frontier
                        .into_iter()
                        .filter_map(|current| child(current, key, index))
                        .collect()
                }
            };
            fanned_out |= segment.is_wildcard();

            if !fanned_out && frontier.is_empty() {
                return Resolved::Node(&NULL);
            }
        }

        if fanned_out {
            Resolved::Matches(frontier)
        } else {
            Resolved::Node(frontier.first().copied().unwrap_or(&NULL))
        }
    }
}

fn child<'a>(node: &'a Value, key: &str, index: Option<usize>) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => index.and_then(|i| items.get(i)),
        _ => None,
    }
}

fn children(node: &Value) -> Vec<&Value> {
    match node {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    }
}

fn collect_descendants<'a>(node: &'a Value, out: &mut Vec<&'a Value>) {
    for next in children(node) {
        out.push(next);
        collect_descendants(next, out);
    }
}
