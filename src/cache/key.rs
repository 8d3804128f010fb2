//! Cache Key Builder
//!
//! Deterministically maps a structured filter/pagination object to a single
//! string key, namespaced by resource view (e.g. `business-cards:list`).
//!
//! Parameters are held in a `BTreeMap`, so two structurally equal parameter
//! sets render to byte-identical keys regardless of insertion order. Values
//! are rendered in their JSON form: the string `"1"` and the number `1`
//! remain distinct keys. That mirrors the upstream behavior; callers that
//! want one cache line per logical query must pass consistently typed
//! parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

// == Cache Key ==
/// A namespaced, canonically ordered cache key.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKey {
    namespace: String,
    params: BTreeMap<String, Value>,
}

impl CacheKey {
    // == Constructor ==
    /// Creates a key with the given namespace and no parameters.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            params: BTreeMap::new(),
        }
    }

    // == Param ==
    /// Adds a filter/pagination parameter. Insertion order is irrelevant;
    /// parameters always render sorted by name.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Adds a parameter only when present. Absent parameters are omitted from
    /// the key entirely rather than rendered as null.
    pub fn opt_param(self, name: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.param(name, v),
            None => self,
        }
    }

    // == Render ==
    /// Renders the full key string, e.g.
    /// `business-cards:list:{companyId=1,limit=20,page=1}`.
    pub fn render(&self) -> String {
        let joined = self
            .params
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}:{{{}}}", self.namespace, joined)
    }

    // == Prefix ==
    /// Returns the namespace prefix used for pattern invalidation. Every key
    /// rendered from this namespace starts with this prefix.
    pub fn prefix(&self) -> String {
        format!("{}:", self.namespace)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
