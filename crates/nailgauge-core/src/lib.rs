//! nailgauge-core — image-processing primitives for measuring a fingernail
//! from a single photo using a payment card as the physical reference.
//!
//! The card pipeline stages are:
//!
//! 1. **Gray** – RGB → luminance reduction.
//! 2. **Edges** – Sobel gradient-magnitude edge mask.
//! 3. **Contour** – stack-based 8-connected edge component extraction.
//! 4. **Polygon** – Ramer–Douglas–Peucker simplification to a 4-corner quad,
//!    with an extreme-point fallback for contours RDP cannot reduce.
//!
//! Candidate scoring, temporal smoothing, calibration, and the nail boundary
//! scan live in the `nailgauge` crate; this crate is pure per-image geometry
//! with no cross-call state.

pub mod contour;
pub mod edges;
pub mod gray;
pub mod polygon;

/// A 2-D point in image coordinates (pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// An axis-aligned rectangle in pixel coordinates.
///
/// Used for caller-supplied guide regions and for the locked-mode region
/// of interest. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Grow the rectangle by `pad` pixels on every side.
    pub fn padded(&self, pad: f64) -> Self {
        Self {
            x: self.x - pad,
            y: self.y - pad,
            width: self.width + 2.0 * pad,
            height: self.height + 2.0 * pad,
        }
    }

    /// Clamp the rectangle to an image of the given dimensions.
    ///
    /// Returns `None` if the intersection is empty.
    pub fn clamped(&self, img_width: u32, img_height: u32) -> Option<Self> {
        let x0 = self.x.max(0.0);
        let y0 = self.y.max(0.0);
        let x1 = (self.x + self.width).min(img_width as f64);
        let y1 = (self.y + self.height).min(img_height as f64);
        if x1 - x0 < 1.0 || y1 - y0 < 1.0 {
            return None;
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// A quadrilateral with corners in a fixed order:
/// top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quad {
    pub corners: [Point; 4],
}

impl Quad {
    /// Order four arbitrary corner points as TL, TR, BR, BL.
    ///
    /// TL minimizes `x + y`, BR maximizes it; TR maximizes `x - y`,
    /// BL minimizes it.
    pub fn from_unordered(pts: [Point; 4]) -> Self {
        let sum = |p: &Point| p.x + p.y;
        let diff = |p: &Point| p.x - p.y;
        let tl = *pts
            .iter()
            .min_by(|a, b| sum(a).total_cmp(&sum(b)))
            .expect("four points");
        let br = *pts
            .iter()
            .max_by(|a, b| sum(a).total_cmp(&sum(b)))
            .expect("four points");
        let tr = *pts
            .iter()
            .max_by(|a, b| diff(a).total_cmp(&diff(b)))
            .expect("four points");
        let bl = *pts
            .iter()
            .min_by(|a, b| diff(a).total_cmp(&diff(b)))
            .expect("four points");
        Self {
            corners: [tl, tr, br, bl],
        }
    }

    pub fn top_left(&self) -> Point {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.corners[3]
    }

    /// Mean of the top and bottom edge lengths.
    pub fn edge_width(&self) -> f64 {
        let top = self.top_left().distance(self.top_right());
        let bottom = self.bottom_left().distance(self.bottom_right());
        0.5 * (top + bottom)
    }

    /// Mean of the left and right edge lengths.
    pub fn edge_height(&self) -> f64 {
        let left = self.top_left().distance(self.bottom_left());
        let right = self.top_right().distance(self.bottom_right());
        0.5 * (left + right)
    }

    /// Polygon area via the shoelace formula.
    pub fn area(&self) -> f64 {
        let c = &self.corners;
        let mut acc = 0.0;
        for i in 0..4 {
            let j = (i + 1) % 4;
            acc += c[i].x * c[j].y - c[j].x * c[i].y;
        }
        0.5 * acc.abs()
    }

    pub fn centroid(&self) -> Point {
        let c = &self.corners;
        Point::new(
            (c[0].x + c[1].x + c[2].x + c[3].x) / 4.0,
            (c[0].y + c[1].y + c[2].y + c[3].y) / 4.0,
        )
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> Rect {
        let xs = self.corners.iter().map(|p| p.x);
        let ys = self.corners.iter().map(|p| p.y);
        let x0 = xs.clone().fold(f64::INFINITY, f64::min);
        let x1 = xs.fold(f64::NEG_INFINITY, f64::max);
        let y0 = ys.clone().fold(f64::INFINITY, f64::min);
        let y1 = ys.fold(f64::NEG_INFINITY, f64::max);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Translate every corner by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut out = *self;
        for c in &mut out.corners {
            c.x += dx;
            c.y += dy;
        }
        out
    }

    /// Largest distance between corresponding corners of two quads.
    pub fn max_corner_distance(&self, other: &Self) -> f64 {
        self.corners
            .iter()
            .zip(other.corners.iter())
            .map(|(a, b)| a.distance(*b))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Quad {
        Quad::from_unordered([
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(10.0, 20.0),
        ])
    }

    #[test]
    fn corner_ordering_is_tl_tr_br_bl() {
        // Feed shuffled corners, expect canonical order back.
        let q = Quad::from_unordered([
            Point::new(20.0, 20.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 20.0),
            Point::new(20.0, 10.0),
        ]);
        assert_eq!(q.top_left(), Point::new(10.0, 10.0));
        assert_eq!(q.top_right(), Point::new(20.0, 10.0));
        assert_eq!(q.bottom_right(), Point::new(20.0, 20.0));
        assert_eq!(q.bottom_left(), Point::new(10.0, 20.0));
    }

    #[test]
    fn quad_geometry() {
        let q = unit_square();
        assert_relative_eq!(q.edge_width(), 10.0);
        assert_relative_eq!(q.edge_height(), 10.0);
        assert_relative_eq!(q.area(), 100.0);
        assert_eq!(q.centroid(), Point::new(15.0, 15.0));
    }

    #[test]
    fn bounding_box_and_translation() {
        let q = unit_square().translated(5.0, -2.0);
        let bb = q.bounding_box();
        assert_relative_eq!(bb.x, 15.0);
        assert_relative_eq!(bb.y, 8.0);
        assert_relative_eq!(bb.width, 10.0);
        assert_relative_eq!(bb.height, 10.0);
    }

    #[test]
    fn rect_clamping() {
        let r = Rect::new(-10.0, -10.0, 50.0, 50.0);
        let c = r.clamped(30, 30).expect("non-empty intersection");
        assert_relative_eq!(c.x, 0.0);
        assert_relative_eq!(c.width, 30.0);

        let outside = Rect::new(100.0, 100.0, 10.0, 10.0);
        assert!(outside.clamped(30, 30).is_none());
    }

    #[test]
    fn max_corner_distance_between_shifted_quads() {
        let a = unit_square();
        let b = a.translated(3.0, 4.0);
        assert_relative_eq!(a.max_corner_distance(&b), 5.0);
    }

    #[test]
    fn point_serde_round_trip() {
        let p = Point::new(3.5, -1.25);
        let json = serde_json::to_string(&p).unwrap();
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
