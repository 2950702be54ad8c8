//! Style caches
//!
//! Three tiers per node, each memoized separately:
//! - own: the parsed inline `style` attribute
//! - cascaded: presentation attributes + CSS index entry + own style
//! - specified: inherited through style-bearing ancestors
//!
//! Clearing cascaded is node-local; clearing specified walks the
//! whole subtree, because an ancestor's specified style is an input
//! to every descendant's.

use std::rc::Rc;

use vellum_css::Style;
use vellum_dom::NodeId;

use crate::SvgDocument;

/// SVG presentation attributes that participate in the cascade.
pub(crate) static PRESENTATION_ATTRS: &[&str] = &[
    "alignment-baseline",
    "baseline-shift",
    "clip",
    "clip-path",
    "clip-rule",
    "color",
    "color-interpolation",
    "color-interpolation-filters",
    "color-profile",
    "color-rendering",
    "cursor",
    "direction",
    "display",
    "dominant-baseline",
    "enable-background",
    "fill",
    "fill-opacity",
    "fill-rule",
    "filter",
    "flood-color",
    "flood-opacity",
    "font-family",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "glyph-orientation-horizontal",
    "glyph-orientation-vertical",
    "image-rendering",
    "kerning",
    "letter-spacing",
    "lighting-color",
    "marker-end",
    "marker-mid",
    "marker-start",
    "mask",
    "opacity",
    "overflow",
    "pointer-events",
    "shape-rendering",
    "stop-color",
    "stop-opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
    "text-decoration",
    "text-rendering",
    "transform",
    "transform-origin",
    "unicode-bidi",
    "vector-effect",
    "visibility",
    "word-spacing",
    "writing-mode",
];

/// Presentation attributes that never enter the cascaded style:
/// clipping, masking, and transforms are geometry, not paint.
pub(crate) static CASCADE_EXCLUDES: &[&str] =
    &["clip", "clip-path", "mask", "transform", "transform-origin"];

pub(crate) fn is_presentation(name: &str) -> bool {
    PRESENTATION_ATTRS.contains(&name)
}

impl SvgDocument {
    /// The node's parsed inline style. Parsed once, then served from
    /// cache until a style setter runs.
    pub fn own_style(&mut self, node: NodeId) -> Rc<Style> {
        if let Some(s) = &self.caches[node.index()].own_style {
            return Rc::clone(s);
        }
        let text = self.attr(node, "style").unwrap_or("").to_string();
        let style = Rc::new(Style::parse(&text));
        self.caches[node.index()].own_style = Some(Rc::clone(&style));
        style
    }

    /// Replace the node's inline style: re-serializes the attribute
    /// (removing it when empty) and drops the styles built on top of
    /// it, plus any cached boxes that depended on them.
    pub fn set_style(&mut self, node: NodeId, style: Style) {
        let text = style.to_attr();
        if text.is_empty() {
            self.write_remove_attr(node, "style");
        } else {
            self.write_attr(node, "style", &text);
        }
        self.caches[node.index()].own_style = Some(Rc::new(style));
        self.clear_cascaded_style(node);
        self.clear_specified_style(node);
        self.clear_bbox_around(node);
    }

    /// Set one inline style property. `None` removes the key instead
    /// of storing an empty value.
    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: Option<&str>) {
        let mut style = (*self.own_style(node)).clone();
        match value {
            Some(v) => style.set(name, v),
            None => {
                style.remove(name);
            }
        }
        self.set_style(node, style);
    }

    /// The node's style including CSS: presentation attributes,
    /// overridden by the CSS index entry for this node's id,
    /// overridden by the inline style. Selector matching happened
    /// once at index build time; this is parse-and-merge only.
    pub fn cascaded_style(&mut self, node: NodeId) -> Rc<Style> {
        if let Some(s) = &self.caches[node.index()].cascaded {
            return Rc::clone(s);
        }
        let css_entry = self.css_style(node);
        let own = self.own_style(node);

        let mut result = Style::new();
        if let Some(el) = self.tree.node(node).as_element() {
            for (name, value) in el.attrs() {
                if is_presentation(name)
                    && !CASCADE_EXCLUDES.contains(&name)
                    && own.get(name).is_none()
                {
                    result.set(name, value);
                }
            }
        }
        if let Some(css) = css_entry {
            result.merge(&css);
        }
        result.merge(&own);

        let rc = Rc::new(result);
        self.caches[node.index()].cascaded = Some(Rc::clone(&rc));
        rc
    }

    /// The node's style with inheritance: a style-bearing parent's
    /// specified style composed with this node's cascaded style.
    pub fn specified_style(&mut self, node: NodeId) -> Rc<Style> {
        if let Some(s) = &self.caches[node.index()].specified {
            return Rc::clone(s);
        }
        let parent = self.tree.parent(node).filter(|&p| self.is_style_bearing(p));
        let result = match parent {
            Some(p) => {
                let inherited = self.specified_style(p);
                let cascaded = self.cascaded_style(node);
                inherited.add(&cascaded)
            }
            None => (*self.cascaded_style(node)).clone(),
        };
        let rc = Rc::new(result);
        self.caches[node.index()].specified = Some(Rc::clone(&rc));
        rc
    }

    /// Drop the cached cascaded style of this node only.
    pub fn clear_cascaded_style(&mut self, node: NodeId) {
        self.caches[node.index()].cascaded = None;
    }

    /// Drop the cached specified style of this node and every element
    /// in its subtree.
    pub fn clear_specified_style(&mut self, node: NodeId) {
        for d in self.tree.descendants(node) {
            self.caches[d.index()].specified = None;
        }
    }

    fn is_style_bearing(&self, node: NodeId) -> bool {
        node == self.root
            || self
                .category(node)
                .is_some_and(|c| c.is_style_bearing())
    }
}
