//! 2x3 affine matrix
//!
//! Layout matches the SVG `matrix(a b c d e f)` form:
//!
//! ```text
//! | a c e |
//! | b d f |
//! ```
//!
//! Composition is parent-first: `parent * child` applies the child
//! transform in the child's local frame, then the parent's.

use std::fmt;
use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `deg` degrees about the origin.
    pub fn rotate(deg: f64) -> Self {
        let (sin, cos) = deg.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by `deg` degrees about `(cx, cy)`.
    pub fn rotate_about(deg: f64, cx: f64, cy: f64) -> Self {
        Self::translate(cx, cy) * Self::rotate(deg) * Self::translate(-cx, -cy)
    }

    pub fn skew_x(deg: f64) -> Self {
        Self::new(1.0, 0.0, deg.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    pub fn skew_y(deg: f64) -> Self {
        Self::new(1.0, deg.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Map a point through this matrix.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        const EPS: f64 = 1e-12;
        (self.a - 1.0).abs() < EPS
            && self.b.abs() < EPS
            && self.c.abs() < EPS
            && (self.d - 1.0).abs() < EPS
            && self.e.abs() < EPS
            && self.f.abs() < EPS
    }

    /// Parse an SVG transform attribute. Malformed, empty, and `none`
    /// input all parse to the identity; a transform list composes
    /// left to right.
    pub fn parse(input: &str) -> Matrix {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Matrix::IDENTITY;
        }
        match parse_list(trimmed) {
            Some(m) => m,
            None => Matrix::IDENTITY,
        }
    }

    /// Serialize as a `matrix(...)` transform attribute value.
    pub fn to_attr(&self) -> String {
        format!(
            "matrix({},{},{},{},{},{})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, o: Matrix) -> Matrix {
        Matrix {
            a: self.a * o.a + self.c * o.b,
            b: self.b * o.a + self.d * o.b,
            c: self.a * o.c + self.c * o.d,
            d: self.b * o.c + self.d * o.d,
            e: self.a * o.e + self.c * o.f + self.e,
            f: self.b * o.e + self.d * o.f + self.f,
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attr())
    }
}

fn parse_list(input: &str) -> Option<Matrix> {
    let mut result = Matrix::IDENTITY;
    for chunk in input.split(')') {
        let chunk = chunk.trim().trim_start_matches(',').trim();
        if chunk.is_empty() {
            continue;
        }
        let (name, args) = chunk.split_once('(')?;
        let args: Vec<f64> = args
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        let op = match (name.trim(), args.as_slice()) {
            ("translate", [tx]) => Matrix::translate(*tx, 0.0),
            ("translate", [tx, ty]) => Matrix::translate(*tx, *ty),
            ("scale", [s]) => Matrix::scale(*s, *s),
            ("scale", [sx, sy]) => Matrix::scale(*sx, *sy),
            ("rotate", [deg]) => Matrix::rotate(*deg),
            ("rotate", [deg, cx, cy]) => Matrix::rotate_about(*deg, *cx, *cy),
            ("skewX", [deg]) => Matrix::skew_x(*deg),
            ("skewY", [deg]) => Matrix::skew_y(*deg),
            ("matrix", [a, b, c, d, e, f]) => Matrix::new(*a, *b, *c, *d, *e, *f),
            _ => return None,
        };
        result = result * op;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Matrix, b: Matrix) -> bool {
        [
            (a.a, b.a),
            (a.b, b.b),
            (a.c, b.c),
            (a.d, b.d),
            (a.e, b.e),
            (a.f, b.f),
        ]
        .iter()
        .all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_parse_basic() {
        assert_eq!(Matrix::parse("translate(3,4)"), Matrix::translate(3.0, 4.0));
        assert_eq!(Matrix::parse("scale(2)"), Matrix::scale(2.0, 2.0));
        assert_eq!(
            Matrix::parse("matrix(1 2 3 4 5 6)"),
            Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0)
        );
    }

    #[test]
    fn test_parse_list_composes_left_to_right() {
        let m = Matrix::parse("translate(10,0) scale(2)");
        assert_eq!(m.apply(1.0, 0.0), (12.0, 0.0));
    }

    #[test]
    fn test_malformed_is_identity() {
        assert!(Matrix::parse("").is_identity());
        assert!(Matrix::parse("none").is_identity());
        assert!(Matrix::parse("garbage").is_identity());
        assert!(Matrix::parse("scale(a,b)").is_identity());
        assert!(Matrix::parse("rotate(1,2)").is_identity());
    }

    #[test]
    fn test_rotate_about() {
        let m = Matrix::parse("rotate(90, 5, 5)");
        let (x, y) = m.apply(5.0, 0.0);
        assert!((x - 10.0).abs() < 1e-9 && (y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_attr_roundtrip() {
        let m = Matrix::new(1.5, 0.25, -0.75, 2.0, 10.125, -3.5);
        assert!(close(Matrix::parse(&m.to_attr()), m));

        let r = Matrix::rotate(37.5);
        assert!(close(Matrix::parse(&r.to_attr()), r));
    }

    #[test]
    fn test_composition_order() {
        let parent = Matrix::translate(100.0, 0.0);
        let child = Matrix::scale(2.0, 2.0);
        let composed = parent * child;
        // child applies first in its local frame
        assert_eq!(composed.apply(1.0, 1.0), (102.0, 2.0));
    }
}
