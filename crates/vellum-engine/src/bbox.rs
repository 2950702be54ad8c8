//! Bounding box engine
//!
//! Per-element geometry, cached per flag tuple. Shapes go through
//! closed-form path constructions, containers union their children,
//! references resolve through the identity index. Clip-path targets
//! intersect the result; masks are never applied geometrically.

use vellum_dom::{ElementCategory, NodeId};
use vellum_geom::{units, BBox, Matrix, PathData};

use crate::SvgDocument;

/// Cache key for a bounding box request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BboxFlags {
    /// Map the local box through the composed transform.
    pub apply_transform: bool,
    /// Pad by half the stroke width when a stroke is painted.
    pub include_stroke: bool,
    /// Use the control-point extent of curves instead of exact
    /// extrema (a cheap, safe superset).
    pub rough_path: bool,
    /// Take ink extents from the text provider instead of logical.
    pub text_parsed: bool,
}

impl Default for BboxFlags {
    fn default() -> Self {
        Self {
            apply_transform: true,
            include_stroke: true,
            rough_path: false,
            text_parsed: false,
        }
    }
}

impl BboxFlags {
    /// Same request in the element's local frame.
    pub fn untransformed(self) -> Self {
        Self {
            apply_transform: false,
            ..self
        }
    }
}

impl SvgDocument {
    /// The node's bounding box under the given flags, cached per
    /// distinct flag tuple. Elements with no geometry (and text with
    /// no extents provider installed) report the null box.
    pub fn bbox(&mut self, node: NodeId, flags: BboxFlags) -> BBox {
        if let Some(b) = self.caches[node.index()].bbox.get(&flags) {
            return *b;
        }
        if !self.bbox_guard.insert(node) {
            tracing::warn!(?node, "reference cycle during bbox computation");
            return BBox::NULL;
        }
        let computed = self.compute_bbox(node, flags);
        self.bbox_guard.remove(&node);
        self.caches[node.index()].bbox.insert(flags, computed);
        computed
    }

    /// Drop every cached box of this node. Node-local; the mutation
    /// hooks and setters clear affected neighbors themselves.
    pub fn set_bbox_dirty(&mut self, node: NodeId) {
        self.caches[node.index()].bbox.clear();
    }

    fn compute_bbox(&mut self, node: NodeId, flags: BboxFlags) -> BBox {
        let Some(category) = self.category(node) else {
            return BBox::NULL;
        };
        let mut result = match category {
            c if c.is_shape() => self.shape_bbox(node, flags),
            c if c.is_container() => self.container_bbox(node, flags),
            ElementCategory::Text => self.text_bbox(node, flags),
            ElementCategory::Image => self.image_bbox(node),
            ElementCategory::Use => self.use_bbox(node, flags),
            _ => BBox::NULL,
        };

        if !result.is_null() {
            if let Some(clip) = self.link_target(node, "clip-path") {
                let clip_box = self.bbox(
                    clip,
                    BboxFlags {
                        apply_transform: false,
                        include_stroke: false,
                        ..flags
                    },
                );
                result = result.intersection(&clip_box);
            }
        }

        if flags.apply_transform && !result.is_null() {
            let m = self.composed_transform(node);
            result = result.transform(&m);
        }
        result
    }

    fn length_attr(&self, node: NodeId, name: &str) -> f64 {
        self.attr(node, name)
            .and_then(units::implicit_px)
            .unwrap_or(0.0)
    }

    /// Closed-form path geometry for shape elements; generic paths
    /// parse their `d` attribute.
    fn shape_path(&self, node: NodeId) -> Option<PathData> {
        let category = self.category(node)?;
        match category {
            ElementCategory::Rect => {
                let rx = self
                    .attr(node, "rx")
                    .or_else(|| self.attr(node, "ry"))
                    .and_then(units::implicit_px)
                    .unwrap_or(0.0);
                let ry = self
                    .attr(node, "ry")
                    .or_else(|| self.attr(node, "rx"))
                    .and_then(units::implicit_px)
                    .unwrap_or(0.0);
                Some(PathData::rect(
                    self.length_attr(node, "x"),
                    self.length_attr(node, "y"),
                    self.length_attr(node, "width"),
                    self.length_attr(node, "height"),
                    rx,
                    ry,
                ))
            }
            ElementCategory::Circle => Some(PathData::circle(
                self.length_attr(node, "cx"),
                self.length_attr(node, "cy"),
                self.length_attr(node, "r"),
            )),
            ElementCategory::Ellipse => Some(PathData::ellipse(
                self.length_attr(node, "cx"),
                self.length_attr(node, "cy"),
                self.length_attr(node, "rx"),
                self.length_attr(node, "ry"),
            )),
            ElementCategory::Line => Some(PathData::line(
                self.length_attr(node, "x1"),
                self.length_attr(node, "y1"),
                self.length_attr(node, "x2"),
                self.length_attr(node, "y2"),
            )),
            ElementCategory::Polygon | ElementCategory::Polyline => {
                let points = PathData::parse_points(self.attr(node, "points")?)?;
                Some(PathData::polyline(
                    &points,
                    category == ElementCategory::Polygon,
                ))
            }
            ElementCategory::Path => PathData::parse(self.attr(node, "d")?),
            _ => None,
        }
    }

    fn shape_bbox(&mut self, node: NodeId, flags: BboxFlags) -> BBox {
        let Some(path) = self.shape_path(node) else {
            return BBox::NULL;
        };
        if path.is_empty() {
            return BBox::NULL;
        }
        let mut result = path.bounds(flags.rough_path);
        if flags.include_stroke && !result.is_null() {
            let style = self.specified_style(node);
            let painted = style.get("stroke").is_some_and(|s| s != "none");
            if painted {
                let width = style
                    .get("stroke-width")
                    .and_then(units::implicit_px)
                    .unwrap_or(0.0);
                if width > 0.0 {
                    result = result.pad(width / 2.0);
                }
            }
        }
        result
    }

    /// Union of children in this container's frame: each child's
    /// untransformed box mapped through the child's own (not
    /// composed) transform, so ancestor transforms apply once.
    fn container_bbox(&mut self, node: NodeId, flags: BboxFlags) -> BBox {
        let children: Vec<NodeId> = self
            .tree
            .content_children(node)
            .filter(|&c| self.tree.node(c).is_element())
            .collect();
        let mut result = BBox::NULL;
        for child in children {
            let child_box = self.bbox(child, flags.untransformed());
            if !child_box.is_null() {
                let own = self.own_transform(child);
                result = result.union(&child_box.transform(&own));
            }
        }
        result
    }

    fn image_bbox(&self, node: NodeId) -> BBox {
        BBox::from_xywh(
            self.length_attr(node, "x"),
            self.length_attr(node, "y"),
            self.length_attr(node, "width"),
            self.length_attr(node, "height"),
        )
    }

    /// A `use` takes the referenced element's untransformed box,
    /// placed by its own x/y offset and the reference's transform.
    fn use_bbox(&mut self, node: NodeId, flags: BboxFlags) -> BBox {
        let Some(target) = self.href_target(node) else {
            return BBox::NULL;
        };
        let target_box = self.bbox(target, flags.untransformed());
        if target_box.is_null() {
            return BBox::NULL;
        }
        let offset = Matrix::translate(
            self.length_attr(node, "x"),
            self.length_attr(node, "y"),
        );
        let placement = offset * self.own_transform(target);
        target_box.transform(&placement)
    }

    fn text_bbox(&mut self, node: NodeId, flags: BboxFlags) -> BBox {
        let Some(provider) = self.text_provider.clone() else {
            tracing::trace!(?node, "no text extents provider, null text box");
            return BBox::NULL;
        };
        let style = self.specified_style(node);
        let extents = provider.extents(&self.tree, node, &style);
        if flags.text_parsed {
            extents.ink
        } else {
            extents.logical
        }
    }
}
