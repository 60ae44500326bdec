//! Simplify a contour to a 4-corner quadrilateral.
//!
//! Ramer–Douglas–Peucker simplification is applied with a perimeter-relative
//! tolerance that grows across a fixed schedule until exactly four vertices
//! remain. When no tolerance yields four vertices (noisy or badly ordered
//! contours), the fallback takes the contour's four extreme points instead.
//! Contours that produce no usable quad yield `None`, never a forced guess.

use crate::contour::Contour;
use crate::{Point, Quad};

/// Quad approximation controls.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QuadConfig {
    /// RDP tolerance schedule as fractions of the contour perimeter,
    /// tried in order; the first fraction producing exactly 4 vertices wins.
    pub epsilon_fractions: Vec<f64>,
    /// Quads with a smaller area are rejected as degenerate.
    pub min_area_px: f64,
    /// Corners closer than this are considered coincident (degenerate quad).
    pub min_corner_separation_px: f64,
    /// Minimum quad area as a fraction of the contour's bounding-box area.
    /// Rejects thin slivers that technically have 4 well-separated corners.
    pub min_bbox_cover: f64,
}

impl Default for QuadConfig {
    fn default() -> Self {
        Self {
            epsilon_fractions: vec![0.02, 0.03, 0.05, 0.08, 0.12],
            min_area_px: 2000.0,
            min_corner_separation_px: 3.0,
            min_bbox_cover: 0.4,
        }
    }
}

/// Approximate a contour by a 4-corner quad, or `None` if no usable
/// quadrilateral exists.
pub fn approximate_quad(contour: &Contour, config: &QuadConfig) -> Option<Quad> {
    let pts = &contour.points;
    if pts.len() < 4 {
        return None;
    }
    let bbox_area = bounding_box_area(pts);

    // Contour points arrive in traversal order, not boundary order. For a
    // convex reference object, sorting by angle around the centroid
    // recovers a clean closed-boundary ordering for RDP.
    let ordered = angle_ordered(pts);

    let perimeter = closed_perimeter(&ordered);
    for frac in &config.epsilon_fractions {
        let eps = frac * perimeter;
        let simplified = rdp_closed(&ordered, eps);
        if simplified.len() == 4 {
            let quad = Quad::from_unordered([
                simplified[0],
                simplified[1],
                simplified[2],
                simplified[3],
            ]);
            if is_usable(&quad, bbox_area, config) {
                return Some(quad);
            }
        }
    }

    let quad = extreme_point_quad(pts);
    is_usable(&quad, bbox_area, config).then_some(quad)
}

/// Extreme-point fallback: corners minimizing/maximizing `x + y` and `x − y`.
pub fn extreme_point_quad(pts: &[Point]) -> Quad {
    let sum = |p: &Point| p.x + p.y;
    let diff = |p: &Point| p.x - p.y;
    let tl = pts
        .iter()
        .min_by(|a, b| sum(a).total_cmp(&sum(b)))
        .copied()
        .expect("non-empty contour");
    let br = pts
        .iter()
        .max_by(|a, b| sum(a).total_cmp(&sum(b)))
        .copied()
        .expect("non-empty contour");
    let tr = pts
        .iter()
        .max_by(|a, b| diff(a).total_cmp(&diff(b)))
        .copied()
        .expect("non-empty contour");
    let bl = pts
        .iter()
        .min_by(|a, b| diff(a).total_cmp(&diff(b)))
        .copied()
        .expect("non-empty contour");
    Quad::from_unordered([tl, tr, br, bl])
}

fn is_usable(quad: &Quad, contour_bbox_area: f64, config: &QuadConfig) -> bool {
    if quad.area() < config.min_area_px {
        return false;
    }
    if quad.area() < config.min_bbox_cover * contour_bbox_area {
        return false;
    }
    let min_sep_sq = config.min_corner_separation_px * config.min_corner_separation_px;
    for i in 0..4 {
        for j in i + 1..4 {
            if quad.corners[i].distance_squared(quad.corners[j]) < min_sep_sq {
                return false;
            }
        }
    }
    true
}

fn bounding_box_area(pts: &[Point]) -> f64 {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in pts {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (max.x - min.x) * (max.y - min.y)
}

fn angle_ordered(pts: &[Point]) -> Vec<Point> {
    let n = pts.len() as f64;
    let cx = pts.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = pts.iter().map(|p| p.y).sum::<f64>() / n;
    let mut ordered = pts.to_vec();
    ordered.sort_by(|a, b| {
        (a.y - cy)
            .atan2(a.x - cx)
            .total_cmp(&(b.y - cy).atan2(b.x - cx))
    });
    // Start the ring at the point farthest from the centroid so the RDP
    // split anchors land on corners rather than mid-edge.
    let c = Point::new(cx, cy);
    if let Some(start) = ordered
        .iter()
        .enumerate()
        .max_by(|a, b| {
            c.distance_squared(*a.1)
                .total_cmp(&c.distance_squared(*b.1))
        })
        .map(|(i, _)| i)
    {
        ordered.rotate_left(start);
    }
    ordered
}

fn closed_perimeter(pts: &[Point]) -> f64 {
    let mut acc = 0.0;
    for i in 0..pts.len() {
        let j = (i + 1) % pts.len();
        acc += pts[i].distance(pts[j]);
    }
    acc
}

/// RDP for a closed contour: split at the point farthest from `pts[0]`,
/// simplify both open halves, and rejoin without duplicating the anchors.
fn rdp_closed(pts: &[Point], eps: f64) -> Vec<Point> {
    let far = pts
        .iter()
        .enumerate()
        .max_by(|a, b| {
            pts[0]
                .distance_squared(*a.1)
                .total_cmp(&pts[0].distance_squared(*b.1))
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    if far == 0 {
        return vec![pts[0]];
    }

    let first_half = rdp_open(&pts[..=far], eps);
    let mut second: Vec<Point> = pts[far..].to_vec();
    second.push(pts[0]);
    let second_half = rdp_open(&second, eps);

    let mut out = first_half;
    // Drop the shared anchor at the join and the duplicated start point.
    out.extend_from_slice(&second_half[1..second_half.len() - 1]);
    out
}

/// Classic recursive RDP on an open polyline; endpoints are always kept.
fn rdp_open(pts: &[Point], eps: f64) -> Vec<Point> {
    if pts.len() < 3 {
        return pts.to_vec();
    }
    let (mut max_dist, mut max_idx) = (0.0f64, 0usize);
    let (a, b) = (pts[0], pts[pts.len() - 1]);
    for (i, p) in pts.iter().enumerate().take(pts.len() - 1).skip(1) {
        let d = perpendicular_distance(*p, a, b);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }
    if max_dist <= eps {
        return vec![a, b];
    }
    let mut left = rdp_open(&pts[..=max_idx], eps);
    let right = rdp_open(&pts[max_idx..], eps);
    left.pop();
    left.extend(right);
    left
}

fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let len = a.distance(b);
    if len < f64::EPSILON {
        return p.distance(a);
    }
    ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / len
}
