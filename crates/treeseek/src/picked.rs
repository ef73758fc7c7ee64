//! Results of [`Query::first`](crate::Query::first) and
//! [`Query::last`](crate::Query::last).

use serde_json::Value;

/// One unwrapped result, or a run of results.
#[derive(Debug, Clone, PartialEq)]
pub enum Picked {
    /// Exactly one item was asked for and one was available.
    One(Value),
    /// Any other count, including an empty result set.
    Many(Vec<Value>),
}

impl Picked {
    /// The single item, if this is [`Picked::One`].
    pub fn one(&self) -> Option<&Value> {
        match self {
            Picked::One(value) => Some(value),
            Picked::Many(_) => None,
        }
    }

    /// Flattens into a vector; `One(v)` becomes `[v]`.
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Picked::One(value) => vec![value],
            Picked::Many(values) => values,
        }
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        match self {
            Picked::One(_) => 1,
            Picked::Many(values) => values.len(),
        }
    }

    /// Returns `true` for an empty [`Picked::Many`].
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Picked> for Vec<Value> {
    fn from(picked: Picked) -> Self {
        picked.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn one_unwraps() {
        let picked = Picked::One(json!(1));
        assert_eq!(picked.one(), Some(&json!(1)));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked.into_vec(), vec![json!(1)]);
    }

    #[test]
    fn empty_many() {
        let picked = Picked::Many(vec![]);
        assert!(picked.is_empty());
        assert!(picked.one().is_none());
        assert_eq!(Vec::<Value>::from(picked), Vec::<Value>::new());
    }
}
