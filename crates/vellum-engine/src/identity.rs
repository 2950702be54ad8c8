//! Identity index
//!
//! id -> node map plus the per-prefix counters behind generated ids.
//! Counters only ever move forward, so a generated id is never reused
//! within a process lifetime, even after the node carrying it is
//! deleted.

use std::collections::HashMap;

use vellum_dom::NodeId;

#[derive(Debug, Default)]
pub(crate) struct IdentityIndex {
    map: HashMap<String, NodeId>,
    counters: HashMap<String, u64>,
}

/// Strip `url(#...)` and leading-`#` reference forms down to the id.
fn normalize_ref(value: &str) -> &str {
    let v = value.trim();
    if let Some(inner) = v.strip_prefix("url(#").and_then(|r| r.strip_suffix(')')) {
        return inner;
    }
    v.strip_prefix('#').unwrap_or(v)
}

impl IdentityIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Look up an id; reference forms (`#x`, `url(#x)`) are accepted.
    /// Unknown ids are `None`, never an error.
    pub(crate) fn get(&self, id: &str) -> Option<NodeId> {
        self.map.get(normalize_ref(id)).copied()
    }

    /// Look up a literal id with no reference unwrapping.
    pub(crate) fn get_literal(&self, id: &str) -> Option<NodeId> {
        self.map.get(id).copied()
    }

    /// Register an id. Last registration wins on duplicates.
    pub(crate) fn register(&mut self, id: String, node: NodeId) {
        self.map.insert(id, node);
    }

    pub(crate) fn remove_id(&mut self, id: &str) {
        self.map.remove(id);
    }

    /// Deterministic fresh id: `prefix` + monotone counter, skipping
    /// anything currently registered.
    pub(crate) fn generate(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        loop {
            let candidate = format!("{prefix}{counter}");
            *counter += 1;
            if !self.map.contains_key(&candidate) {
                return candidate;
            }
        }
    }

}
