//! SVG document
//!
//! Owns the tree arena, the per-node cache records, the identity and
//! CSS indices, and the parsed stylesheets. Every attribute write goes
//! through `set_attr`, which routes `style` and `transform` to their
//! caching setters and invalidates whatever the written attribute
//! feeds, so a read never sees a stale slot.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use vellum_css::{Style, Stylesheet};
use vellum_dom::{DomTree, ElementCategory, NodeId};
use vellum_geom::{BBox, Matrix};

use crate::bbox::BboxFlags;
use crate::cssindex::CssIndex;
use crate::docsize::DocSize;
use crate::identity::IdentityIndex;
use crate::styles::is_presentation;
use crate::text::TextExtents;

/// Lazily-populated derived attributes of one node. Created empty,
/// filled on first read, cleared by setters and mutation hooks, and
/// dropped with the node on deletion.
#[derive(Default)]
pub(crate) struct NodeCache {
    /// Whether the node is part of the document tree (the document
    /// back-reference; cleared on delete).
    pub(crate) attached: bool,
    pub(crate) own_style: Option<Rc<Style>>,
    pub(crate) cascaded: Option<Rc<Style>>,
    pub(crate) specified: Option<Rc<Style>>,
    pub(crate) own_transform: Option<Matrix>,
    pub(crate) composed: Option<Matrix>,
    pub(crate) bbox: HashMap<BboxFlags, BBox>,
}

/// An SVG document with memoized derived attributes.
pub struct SvgDocument {
    pub(crate) tree: DomTree,
    pub(crate) root: NodeId,
    pub(crate) caches: Vec<NodeCache>,
    pub(crate) ids: IdentityIndex,
    pub(crate) stylesheets: Vec<Stylesheet>,
    pub(crate) css: Option<CssIndex>,
    pub(crate) docsize: Option<Rc<DocSize>>,
    pub(crate) text_provider: Option<Rc<dyn TextExtents>>,
    /// Guard against reference cycles during bbox recursion.
    pub(crate) bbox_guard: HashSet<NodeId>,
}

impl SvgDocument {
    /// Empty document with a bare `<svg>` root.
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let root = tree.create_element("svg");
        let mut doc = Self {
            tree,
            root,
            caches: Vec::new(),
            ids: IdentityIndex::new(),
            stylesheets: Vec::new(),
            css: None,
            docsize: None,
            text_provider: None,
            bbox_guard: HashSet::new(),
        };
        doc.sync_caches();
        doc.caches[root.index()].attached = true;
        doc.register_node(root);
        doc
    }

    /// Grow the cache table to cover newly created arena slots.
    pub(crate) fn sync_caches(&mut self) {
        while self.caches.len() < self.tree.len() {
            self.caches.push(NodeCache::default());
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Create a detached element. It joins the indices when inserted.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.tree.create_element(tag);
        self.sync_caches();
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        let id = self.tree.create_text(text);
        self.sync_caches();
        id
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        let id = self.tree.create_comment(text);
        self.sync_caches();
        id
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.tree.node(node).as_element().map(|e| e.tag())
    }

    pub fn category(&self, node: NodeId) -> Option<ElementCategory> {
        self.tree.node(node).as_element().map(|e| e.category())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.node(node).as_element().and_then(|e| e.attr(name))
    }

    /// Write an attribute through the cache hooks. `style` and
    /// `transform` route to their setters; `id` keeps the identity
    /// index in step; root geometry attributes drop the document
    /// size; presentation attributes drop the styles they feed.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        match name {
            "style" => self.set_style(node, Style::parse(value)),
            "transform" => self.set_transform(node, Matrix::parse(value)),
            "id" => self.set_id(node, value),
            _ => {
                self.write_attr(node, name, value);
                self.after_raw_attr(node, name);
            }
        }
    }

    /// Remove an attribute through the same hooks as `set_attr`.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        match name {
            "style" => self.set_style(node, Style::new()),
            "transform" => self.set_transform(node, Matrix::IDENTITY),
            "id" => {
                if let Some(old) = self.attr(node, "id").map(String::from) {
                    if self.ids.get(&old) == Some(node) {
                        self.ids.remove_id(&old);
                    }
                    self.write_remove_attr(node, "id");
                }
            }
            _ => {
                self.write_remove_attr(node, name);
                self.after_raw_attr(node, name);
            }
        }
    }

    /// Rename a node, keeping the identity index consistent. A
    /// declared id that collides wins the index entry (last
    /// registered wins, as at load time).
    fn set_id(&mut self, node: NodeId, id: &str) {
        if let Some(old) = self.attr(node, "id").map(String::from) {
            if self.ids.get(&old) == Some(node) {
                self.ids.remove_id(&old);
            }
        }
        self.write_attr(node, "id", id);
        if self.caches[node.index()].attached {
            self.ids.register(id.to_string(), node);
        }
    }

    fn after_raw_attr(&mut self, node: NodeId, name: &str) {
        if node == self.root && matches!(name, "width" | "height" | "viewBox") {
            self.docsize = None;
        }
        if is_presentation(name) {
            self.clear_cascaded_style(node);
            self.clear_specified_style(node);
        }
        // geometry may have moved under cached boxes
        self.clear_bbox_around(node);
    }

    /// Raw attribute write, no hooks.
    pub(crate) fn write_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.tree.node_mut(node).as_element_mut() {
            el.set_attr(name, value);
        }
    }

    pub(crate) fn write_remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.tree.node_mut(node).as_element_mut() {
            el.remove_attr(name);
        }
    }

    /// Look up a node by id. Accepts `x`, `#x`, and `url(#x)` forms.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id)
    }

    /// Resolve a reference-valued attribute (`clip-path`, `mask`,
    /// `href`) to the node it points at.
    pub fn link_target(&self, node: NodeId, attr: &str) -> Option<NodeId> {
        let value = self.attr(node, attr)?;
        self.ids.get(value)
    }

    pub(crate) fn href_target(&self, node: NodeId) -> Option<NodeId> {
        self.link_target(node, "href")
            .or_else(|| self.link_target(node, "xlink:href"))
    }

    /// The document's `defs` container, created as the root's first
    /// child when missing.
    pub fn defs(&mut self) -> NodeId {
        let found = self
            .tree
            .children(self.root)
            .iter()
            .copied()
            .find(|&c| self.category(c) == Some(ElementCategory::Defs));
        if let Some(d) = found {
            return d;
        }
        let d = self.create_element("defs");
        self.insert(self.root, 0, d);
        d
    }

    /// Register a node in the identity index, generating a fresh id
    /// when it has none or its id already names a different node.
    pub(crate) fn register_node(&mut self, node: NodeId) {
        let declared = self.attr(node, "id").map(String::from);
        let id = match declared {
            Some(id) if self.ids.get_literal(&id).is_none_or(|n| n == node) => id,
            declared => {
                let prefix = self.tag(node).unwrap_or("node").to_string();
                let fresh = self.ids.generate(&prefix);
                if let Some(old) = declared {
                    tracing::debug!(%old, new = %fresh, "id collision, regenerated");
                }
                self.write_attr(node, "id", &fresh);
                fresh
            }
        };
        self.ids.register(id, node);
    }

    /// Build the CSS cascade index if this document has not needed it
    /// yet.
    pub(crate) fn ensure_css_index(&mut self) {
        if self.css.is_none() {
            let index = CssIndex::build(&self.tree, self.root, &self.ids, &self.stylesheets);
            self.css = Some(index);
        }
    }

    /// The merged CSS entry for a node's id, if any rule matched it
    /// at index build time.
    pub fn css_style(&mut self, node: NodeId) -> Option<Rc<Style>> {
        self.ensure_css_index();
        let id = self.attr(node, "id")?;
        self.css.as_ref().and_then(|c| c.get(id)).cloned()
    }

    /// Append a stylesheet and rebuild the cascade lazily. Cached
    /// cascaded and specified styles are dropped document-wide since
    /// any node may now match new rules.
    pub fn add_stylesheet(&mut self, css_text: &str) {
        self.stylesheets.push(vellum_css::parse_stylesheet(css_text));
        self.css = None;
        for d in self.tree.descendants(self.root) {
            self.caches[d.index()].cascaded = None;
            self.caches[d.index()].specified = None;
        }
    }

    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.stylesheets
    }

    /// Install the text extents provider used for text bounding
    /// boxes.
    pub fn set_text_provider(&mut self, provider: Rc<dyn TextExtents>) {
        self.text_provider = Some(provider);
    }

    /// Clear cached bounding boxes for a node's subtree and its
    /// ancestor chain: descendants see the node through their
    /// composed transforms, ancestors union it into their own boxes.
    pub(crate) fn clear_bbox_around(&mut self, node: NodeId) {
        for d in self.tree.descendants(node) {
            self.caches[d.index()].bbox.clear();
        }
        for a in self.tree.ancestors(node) {
            self.caches[a.index()].bbox.clear();
        }
    }
}

impl Default for SvgDocument {
    fn default() -> Self {
        Self::new()
    }
}
