//! Vellum engine
//!
//! Memoized derived attributes over a mutable SVG document: cascaded
//! and inherited styles, composed transforms, element bounding boxes,
//! and document geometry, kept consistent under mutation by the hooks
//! in `SvgDocument`. Caches fill lazily on first read and are cleared
//! by the setters and mutation hooks; a cleared slot is always
//! recomputed from current tree state on the next read.

mod bbox;
mod cssindex;
mod docsize;
mod document;
mod identity;
mod mutation;
mod styles;
mod svg;
mod text;
mod transforms;

pub use bbox::BboxFlags;
pub use docsize::{DocSize, Page};
pub use document::SvgDocument;
pub use svg::LoadError;
pub use text::{FixedExtents, TextExtents, TextExtentsResult};

pub use vellum_css::{Color, Selector, Specificity, Style, Stylesheet};
pub use vellum_dom::{DomTree, ElementCategory, NodeId};
pub use vellum_geom::{BBox, Matrix, PathData, Rect};
