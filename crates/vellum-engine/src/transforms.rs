//! Transform caches
//!
//! Own transform parses the `transform` attribute; composed transform
//! is `parent.composed * own`. Composed invalidation is an eager
//! subtree walk: readers treat an empty slot as "the parent chain is
//! clean", so stale descendants are never left behind lazily.

use vellum_dom::NodeId;
use vellum_geom::Matrix;

use crate::SvgDocument;

impl SvgDocument {
    /// The node's own transform. Malformed, empty, and missing
    /// attributes all read as identity.
    pub fn own_transform(&mut self, node: NodeId) -> Matrix {
        if let Some(m) = self.caches[node.index()].own_transform {
            return m;
        }
        let m = Matrix::parse(self.attr(node, "transform").unwrap_or(""));
        self.caches[node.index()].own_transform = Some(m);
        m
    }

    /// Set the node's transform: re-serializes the attribute and
    /// eagerly clears composed transforms (and cached boxes) for the
    /// whole subtree.
    pub fn set_transform(&mut self, node: NodeId, m: Matrix) {
        self.write_attr(node, "transform", &m.to_attr());
        self.caches[node.index()].own_transform = Some(m);
        self.clear_composed_transform(node);
        self.clear_bbox_around(node);
    }

    /// Transform from the node's local frame to the document frame:
    /// the parent chain's composed transform applied before the
    /// node's own.
    pub fn composed_transform(&mut self, node: NodeId) -> Matrix {
        if let Some(m) = self.caches[node.index()].composed {
            return m;
        }
        let own = self.own_transform(node);
        let m = match self.tree.parent(node) {
            Some(p) => self.composed_transform(p) * own,
            None => own,
        };
        self.caches[node.index()].composed = Some(m);
        m
    }

    /// Drop cached composed transforms for the node and every element
    /// below it.
    pub fn clear_composed_transform(&mut self, node: NodeId) {
        for d in self.tree.descendants(node) {
            self.caches[d.index()].composed = None;
        }
    }
}
