//! Vellum geometry
//!
//! Affine matrices, nullable bounding boxes, SVG path data, and CSS
//! absolute units. Pure math, no document knowledge.

mod matrix;
mod path;
mod rect;
pub mod units;

pub use matrix::Matrix;
pub use path::{PathData, Point, Segment};
pub use rect::{BBox, Rect};
