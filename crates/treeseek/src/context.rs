//! Shared query context.
//!
//! A [`Context`] bundles what every query built from it shares: the
//! condition registry, the current-item token, the path walker and the
//! [`Config`]. Hosts build one and hand it to queries as `Arc<Context>`;
//! [`Context::shared`] offers a process-wide default built on first use.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::Rng;
use tracing::trace;
use treeseek_path::{DotWalker, PathWalker};

use crate::condition::ConditionKind;
use crate::config::Config;
use crate::registry::ConditionRegistry;

/// Shortest current-item token ever generated, whatever the config says.
const MIN_TOKEN_LEN: usize = 8;

static SHARED: Lazy<Arc<Context>> = Lazy::new(|| Arc::new(Context::new()));

/// Registry, current-item token, walker and settings for a family of queries.
pub struct Context {
    registry: ConditionRegistry,
    current_item: String,
    walker: Box<dyn PathWalker>,
    config: Config,
}

impl Context {
    /// A fresh context with default settings and its own token.
    pub fn new() -> Self {
        ContextBuilder::default().build()
    }

    /// Starts building a customized context.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// The process-wide default context.
    ///
    /// Built exactly once, on first call, even when several threads race
    /// for it.
    pub fn shared() -> Arc<Context> {
        Arc::clone(&SHARED)
    }

    /// Token that makes a predicate target the candidate item itself.
    ///
    /// ```
    /// use serde_json::json;
    /// use treeseek::{Context, Query};
    ///
    /// let ctx = Context::shared();
    /// let data = json!([1, 2, 3, 4]);
    /// let big = Query::new(ctx.clone(), &data)?
    ///     .select("*")
    ///     .and_where(ctx.current_item(), ">", 2)
    ///     .get()?;
    /// assert_eq!(big, vec![json!(3), json!(4)]);
    /// # Ok::<(), treeseek::QueryError>(())
    /// ```
    pub fn current_item(&self) -> &str {
        &self.current_item
    }

    /// Returns `true` if `target` is this context's current-item token.
    pub fn is_current_item(&self, target: &str) -> bool {
        self.current_item == target
    }

    /// The condition registry.
    pub fn registry(&self) -> &ConditionRegistry {
        &self.registry
    }

    /// The path walker.
    pub fn walker(&self) -> &dyn PathWalker {
        self.walker.as_ref()
    }

    /// The settings.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("registry", &self.registry)
            .field("current_item", &self.current_item)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Context`].
#[derive(Default)]
pub struct ContextBuilder {
    config: Config,
    walker: Option<Box<dyn PathWalker>>,
    aliases: Vec<(String, ConditionKind)>,
}

impl ContextBuilder {
    /// Replaces the settings.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default [`DotWalker`].
    pub fn walker(mut self, walker: impl PathWalker + 'static) -> Self {
        self.walker = Some(Box::new(walker));
        self
    }

    /// Registers an extra identifier for a built-in condition.
    pub fn alias(mut self, identifier: impl Into<String>, kind: ConditionKind) -> Self {
        self.aliases.push((identifier.into(), kind));
        self
    }

    /// Builds the context, generating its current-item token.
    pub fn build(self) -> Context {
        let mut registry = ConditionRegistry::builtin();
        for (identifier, kind) in self.aliases {
            registry.register(identifier, kind);
        }

        let current_item = generate_token(self.config.sentinel_len.max(MIN_TOKEN_LEN));
        trace!(conditions = registry.len(), "query context built");

        Context {
            registry,
            current_item,
            walker: self.walker.unwrap_or_else(|| Box::new(DotWalker)),
            config: self.config,
        }
    }
}

/// Lowercase hex string from the thread-local CSPRNG.
fn generate_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let idx: u8 = rng.gen_range(0..16);
            char::from(if idx < 10 { b'0' + idx } else { b'a' + idx - 10 })
        })
        .collect()
}
