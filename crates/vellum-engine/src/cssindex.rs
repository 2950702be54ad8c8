//! CSS cascade index
//!
//! Built once per document from its stylesheets: every rule resolves
//! to a candidate node set, and the matched declarations merge into
//! one `Style` per element id, in stylesheet declaration order.
//! Universal, pure-class, and pure-id rules resolve without touching
//! the selector matcher; only complex rules pay for a structural
//! query. Specificity is recorded on the selectors but does not
//! reorder the merge.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use vellum_css::{Rule, Style, Stylesheet};
use vellum_dom::{DomTree, NodeId};

use crate::identity::IdentityIndex;

#[derive(Default)]
pub(crate) struct CssIndex {
    entries: HashMap<String, Rc<Style>>,
}

impl CssIndex {
    pub(crate) fn build(
        tree: &DomTree,
        root: NodeId,
        ids: &IdentityIndex,
        sheets: &[Stylesheet],
    ) -> CssIndex {
        let mut index = CssIndex::default();
        let descendants = tree.descendants(root);
        for sheet in sheets {
            for rule in &sheet.rules {
                if rule.declarations.is_empty() {
                    continue;
                }
                let Some(targets) = resolve_targets(tree, root, ids, &descendants, rule) else {
                    tracing::debug!("rule skipped, selector not supported");
                    continue;
                };
                for node in targets {
                    let Some(id) = tree.node(node).as_element().and_then(|e| e.attr("id")) else {
                        continue;
                    };
                    index.merge(id, &rule.declarations);
                }
            }
        }
        index
    }

    fn merge(&mut self, id: &str, declarations: &Style) {
        match self.entries.get_mut(id) {
            Some(existing) => {
                let merged = existing.add(declarations);
                *existing = Rc::new(merged);
            }
            None => {
                self.entries
                    .insert(id.to_string(), Rc::new(declarations.clone()));
            }
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Rc<Style>> {
        self.entries.get(id)
    }

    pub(crate) fn pop(&mut self, id: &str) -> Option<Rc<Style>> {
        self.entries.remove(id)
    }

    pub(crate) fn insert(&mut self, id: String, style: Rc<Style>) {
        self.entries.insert(id, style);
    }

    /// Copy an entry verbatim under a new id (duplication support).
    pub(crate) fn dupe_entry(&mut self, old_id: &str, new_id: &str) {
        if let Some(entry) = self.entries.get(old_id).cloned() {
            self.entries.insert(new_id.to_string(), entry);
        }
    }
}

/// Candidate nodes for one rule, or `None` when a selector in it is
/// unsupported (the whole rule is skipped, the sheet goes on).
fn resolve_targets(
    tree: &DomTree,
    root: NodeId,
    ids: &IdentityIndex,
    descendants: &[NodeId],
    rule: &Rule,
) -> Option<Vec<NodeId>> {
    // fast path: every selector is `*`
    if rule.selectors.iter().all(|s| s.is_universal()) {
        return Some(descendants.to_vec());
    }

    // fast path: every selector is a bare class; scan class tokens
    let classes: Option<Vec<&str>> = rule.selectors.iter().map(|s| s.single_class()).collect();
    if let Some(classes) = classes {
        let mut out = Vec::new();
        for &node in descendants {
            let matched = tree
                .node(node)
                .as_element()
                .and_then(|e| e.attr("class"))
                .is_some_and(|v| {
                    v.split_whitespace().any(|token| classes.contains(&token))
                });
            if matched {
                out.push(node);
            }
        }
        return Some(out);
    }

    // fast path: every selector is a bare id; direct index lookups
    let id_names: Option<Vec<&str>> = rule.selectors.iter().map(|s| s.single_id()).collect();
    if let Some(id_names) = id_names {
        return Some(id_names.iter().filter_map(|id| ids.get(id)).collect());
    }

    // complex: delegate to the selector matcher, deduplicating
    // across the rule's selector list
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for selector in &rule.selectors {
        let candidates = selector.to_candidate_set(tree, root).ok()?;
        for node in candidates {
            if seen.insert(node) {
                out.push(node);
            }
        }
    }
    Some(out)
}
