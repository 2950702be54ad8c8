//! Rectangles and nullable bounding boxes
//!
//! `BBox` wraps an optional rect with the algebra bounding-box code
//! needs everywhere: null is the identity of `union` and absorbing for
//! `intersection`, mirroring "no geometry" and "clipped away".

use crate::Matrix;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Build from two corner points, normalizing orientation.
    pub fn from_extents(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let (x, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self::new(x, y, x2 - x, y2 - y)
    }

    #[inline]
    pub fn x2(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn y2(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Corners in (x1,y1), (x2,y1), (x1,y2), (x2,y2) order.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x, self.y),
            (self.x2(), self.y),
            (self.x, self.y2()),
            (self.x2(), self.y2()),
        ]
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_extents(
            self.x.min(other.x),
            self.y.min(other.y),
            self.x2().max(other.x2()),
            self.y2().max(other.y2()),
        )
    }

    /// Overlapping region; `None` when the rects do not touch.
    /// Zero-width and zero-height overlaps count (degenerate shapes
    /// such as horizontal lines produce zero-height boxes).
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.x2().min(other.x2());
        let y2 = self.y2().min(other.y2());
        if x2 < x1 || y2 < y1 {
            return None;
        }
        Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
    }
}

/// Nullable bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox(pub Option<Rect>);

impl BBox {
    pub const NULL: BBox = BBox(None);

    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        BBox(Some(Rect::new(x, y, w, h)))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    #[inline]
    pub fn rect(&self) -> Option<Rect> {
        self.0
    }

    /// `union(null, b) == b`.
    pub fn union(&self, other: &BBox) -> BBox {
        match (self.0, other.0) {
            (Some(a), Some(b)) => BBox(Some(a.union(&b))),
            (Some(a), None) => BBox(Some(a)),
            (None, b) => BBox(b),
        }
    }

    /// `intersection(null, b) == null`.
    pub fn intersection(&self, other: &BBox) -> BBox {
        match (self.0, other.0) {
            (Some(a), Some(b)) => BBox(a.intersection(&b)),
            _ => BBox::NULL,
        }
    }

    /// Map through an affine transform: transform the corners, take
    /// the extent.
    pub fn transform(&self, m: &Matrix) -> BBox {
        let Some(r) = self.0 else {
            return BBox::NULL;
        };
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (cx, cy) in r.corners() {
            let (px, py) = m.apply(cx, cy);
            min_x = min_x.min(px);
            min_y = min_y.min(py);
            max_x = max_x.max(px);
            max_y = max_y.max(py);
        }
        BBox(Some(Rect::from_extents(min_x, min_y, max_x, max_y)))
    }

    /// Grow every side by `amount` (stroke padding).
    pub fn pad(&self, amount: f64) -> BBox {
        match self.0 {
            Some(r) => BBox(Some(Rect::new(
                r.x - amount,
                r.y - amount,
                r.w + 2.0 * amount,
                r.h + 2.0 * amount,
            ))),
            None => BBox::NULL,
        }
    }
}

impl From<Rect> for BBox {
    fn from(r: Rect) -> Self {
        BBox(Some(r))
    }
}
