//! Context-wide settings.

use serde::{Deserialize, Serialize};

/// Settings shared by every query built from one [`Context`](crate::Context).
///
/// Every field has a default, so partial documents deserialize cleanly:
///
/// ```
/// use treeseek::Config;
///
/// let config: Config = serde_json::from_str(r#"{"separator": "/"}"#).unwrap();
/// assert_eq!(config.separator, "/");
/// assert_eq!(config.page_size, 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path separator used by queries that do not set their own.
    pub separator: String,
    /// Chunk size for [`Query::paged_default`](crate::Query::paged_default).
    pub page_size: usize,
    /// Length of the generated current-item token.
    pub sentinel_len: usize,
    /// Object key holding a structured value's type name, read by `instanceOf`.
    pub type_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            separator: ".".to_string(),
            page_size: 15,
            sentinel_len: 20,
            type_key: "$type".to_string(),
        }
    }
}
