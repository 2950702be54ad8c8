//! Text extents boundary
//!
//! Font shaping lives outside this crate; text bounding boxes come
//! from whatever `TextExtents` implementation the host installs. The
//! engine hands over the node and its resolved specified style and
//! gets back logical and ink extents in the element's local frame.

use vellum_css::Style;
use vellum_dom::{DomTree, NodeId};
use vellum_geom::BBox;

/// Extents of one laid-out text element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtentsResult {
    /// Layout extent (advance box).
    pub logical: BBox,
    /// Painted extent (glyph ink).
    pub ink: BBox,
}

/// Provider of text layout extents.
pub trait TextExtents {
    fn extents(&self, tree: &DomTree, node: NodeId, style: &Style) -> TextExtentsResult;
}

/// Returns the same extents for every text element. Useful in tests
/// and as a placeholder where no shaping backend is wired up.
#[derive(Debug, Clone, Copy)]
pub struct FixedExtents {
    pub result: TextExtentsResult,
}

impl FixedExtents {
    pub fn new(logical: BBox, ink: BBox) -> Self {
        Self {
            result: TextExtentsResult { logical, ink },
        }
    }
}

impl TextExtents for FixedExtents {
    fn extents(&self, _tree: &DomTree, _node: NodeId, _style: &Style) -> TextExtentsResult {
        self.result
    }
}
