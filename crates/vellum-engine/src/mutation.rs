//! Mutation hooks
//!
//! Structural mutations wrap the tree primitive and keep the caches
//! and indices consistent: insert/append invalidate the moved node's
//! derived styles and transforms and (re)register ids, delete
//! unregisters the whole subtree leaf-to-root, duplicate clones
//! structurally and re-keys ids and CSS entries.

use std::rc::Rc;

use vellum_css::Style;
use vellum_dom::NodeId;

use crate::document::NodeCache;
use crate::SvgDocument;

impl SvgDocument {
    /// Insert `node` into `parent`'s child list at `index`.
    pub fn insert(&mut self, parent: NodeId, index: usize, node: NodeId) {
        // a move leaves the old ancestor chain's boxes stale too
        let old_ancestors = self.tree.ancestors(node);
        self.tree.insert(parent, index, node);
        for a in old_ancestors {
            self.caches[a.index()].bbox.clear();
        }
        self.after_attach(node);
    }

    /// Append `node` as `parent`'s last child.
    pub fn append(&mut self, parent: NodeId, node: NodeId) {
        let end = self.tree.children(parent).len();
        self.insert(parent, end, node);
    }

    /// Cache and index bookkeeping common to insert and append. The
    /// node's cascaded, specified, and composed caches are always
    /// dropped; identity and CSS entries move only when the node is
    /// joining the document (fresh, previously deleted, or adopted).
    fn after_attach(&mut self, node: NodeId) {
        self.clear_cascaded_style(node);
        self.clear_specified_style(node);
        self.clear_composed_transform(node);
        self.clear_bbox_around(node);

        let joining =
            !self.caches[node.index()].attached || self.attr(node, "id").is_none();
        if !joining {
            return;
        }
        for d in self.tree.descendants(node) {
            let old_id = self.attr(d, "id").map(String::from);
            let popped: Option<Rc<Style>> = old_id
                .as_deref()
                .and_then(|id| self.css.as_mut().and_then(|c| c.pop(id)));
            self.register_node(d);
            self.caches[d.index()].attached = true;
            if let Some(entry) = popped {
                if let Some(new_id) = self.attr(d, "id").map(String::from) {
                    self.ensure_css_index();
                    if let Some(css) = self.css.as_mut() {
                        css.insert(new_id, entry);
                    }
                }
            }
        }
    }

    /// Remove `node` and its subtree from the document. Identity
    /// entries and document back-references are cleared leaf-to-root;
    /// CSS index entries stay behind (generated ids never recur, so
    /// they can only resurface if a caller reassigns the id by hand).
    pub fn delete(&mut self, node: NodeId) {
        let subtree = self.tree.descendants(node);
        for &d in subtree.iter().rev() {
            if let Some(id) = self.attr(d, "id").map(String::from) {
                if self.ids.get_literal(&id) == Some(d) {
                    self.ids.remove_id(&id);
                }
            }
            self.caches[d.index()] = NodeCache::default();
        }
        let ancestors = self.tree.ancestors(node);
        self.tree.detach(node);
        for a in ancestors {
            self.caches[a.index()].bbox.clear();
        }
    }

    /// Structurally clone `node`'s subtree and insert the clone as
    /// its next sibling. Every cloned element gets a fresh id, and
    /// the CSS index entry of each original is duplicated under the
    /// clone's id. Clip-path and mask clones are relocated into
    /// `defs`. Returns `None` for non-elements and the root.
    pub fn duplicate(&mut self, node: NodeId) -> Option<NodeId> {
        let parent = self.tree.parent(node)?;
        if !self.tree.node(node).is_element() {
            return None;
        }
        // build the index now so entries can be duplicated against it
        self.ensure_css_index();

        let copy = self.tree.clone_subtree(node);
        self.sync_caches();
        let index = self.tree.index_in_parent(node).map_or(0, |i| i + 1);
        self.tree.insert(parent, index, copy);

        for d in self.tree.descendants(copy) {
            let old_id = self.attr(d, "id").map(String::from);
            let prefix = self.tag(d).unwrap_or("node").to_string();
            let fresh = self.ids.generate(&prefix);
            self.write_attr(d, "id", &fresh);
            self.ids.register(fresh.clone(), d);
            self.caches[d.index()].attached = true;
            if let Some(old) = old_id {
                if let Some(css) = self.css.as_mut() {
                    css.dupe_entry(&old, &fresh);
                }
            }
        }
        self.clear_bbox_around(copy);

        if self.category(copy).is_some_and(|c| c.is_clip_or_mask()) {
            // clip and mask definitions render wrong outside defs
            let defs = self.defs();
            self.append(defs, copy);
        }
        Some(copy)
    }

    /// Move a subtree out of `source` into this document, inserting
    /// it under `parent` at `index`. The source loses the subtree's
    /// identity entries; each element's CSS entry is popped from the
    /// source and re-keyed under the id the element ends up with here
    /// (fresh on collision). Returns the subtree's id in this
    /// document's arena.
    pub fn adopt(
        &mut self,
        source: &mut SvgDocument,
        node: NodeId,
        parent: NodeId,
        index: usize,
    ) -> NodeId {
        let old_subtree = source.tree.descendants(node);
        let mut moved_css: Vec<(usize, Rc<Style>)> = Vec::new();
        for (i, &d) in old_subtree.iter().enumerate() {
            if let Some(id) = source.attr(d, "id").map(String::from) {
                if let Some(entry) = source.css.as_mut().and_then(|c| c.pop(&id)) {
                    moved_css.push((i, entry));
                }
            }
        }

        let copy = self.tree.copy_subtree_from(&source.tree, node);
        self.sync_caches();
        source.delete(node);

        self.tree.insert(parent, index, copy);
        let new_subtree = self.tree.descendants(copy);
        for &d in &new_subtree {
            self.register_node(d);
            self.caches[d.index()].attached = true;
        }
        if !moved_css.is_empty() {
            self.ensure_css_index();
            for (i, entry) in moved_css {
                if let Some(new_id) = self.attr(new_subtree[i], "id").map(String::from) {
                    if let Some(css) = self.css.as_mut() {
                        css.insert(new_id, entry);
                    }
                }
            }
        }
        self.clear_bbox_around(copy);
        copy
    }
}
