//! Condition registry.
//!
//! Maps the identifier used in a condition call (`"where"`, `"whereIn"`,
//! ...) to the [`ConditionKind`] implementing it. The registry is filled
//! once when its [`Context`](crate::Context) is built and is read-only
//! afterwards.

use std::collections::HashMap;

use crate::condition::ConditionKind;
use crate::error::{QueryError, Result};

/// Lookup table from identifier to condition implementation.
#[derive(Debug, Clone)]
pub struct ConditionRegistry {
    entries: HashMap<String, ConditionKind>,
}

impl ConditionRegistry {
    /// A registry holding every built-in condition under all its identifiers.
    pub fn builtin() -> Self {
        let mut registry = ConditionRegistry {
            entries: HashMap::new(),
        };
        for kind in ConditionKind::ALL {
            for identifier in kind.identifiers() {
                registry.register(*identifier, kind);
            }
        }
        registry
    }

    /// Adds (or replaces) an identifier.
    pub(crate) fn register(&mut self, identifier: impl Into<String>, kind: ConditionKind) {
        self.entries.insert(identifier.into(), kind);
    }

    /// Finds the condition registered under `identifier`. Matching is exact.
    pub fn lookup(&self, identifier: &str) -> Result<ConditionKind> {
        self.entries
            .get(identifier)
            .copied()
            .ok_or_else(|| QueryError::UnknownOperation(identifier.to_string()))
    }

    /// Returns `true` if `identifier` is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Every registered identifier, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        ConditionRegistry::builtin()
    }
}
