//! Connected edge-pixel component extraction.
//!
//! A contour is one 8-connected component of the binary edge mask,
//! collected by an explicit-stack traversal. A visited mask keeps each
//! edge pixel in exactly one contour; a hard point budget bounds the
//! worst-case work for pathological masks.

use image::GrayImage;

use crate::Point;

/// Contour extraction controls.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ContourConfig {
    /// Contours shorter than this are discarded as noise (text, specks).
    pub min_points: usize,
    /// A single trace halts once it collects this many points.
    pub max_points: usize,
    /// Only the longest `max_contours` survivors are returned.
    pub max_contours: usize,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            min_points: 60,
            max_points: 5000,
            max_contours: 8,
        }
    }
}

/// One 8-connected edge component.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Extract 8-connected contours from a binary edge mask.
///
/// Returned contours are sorted by length, longest first, and truncated
/// to `config.max_contours`. The reference object is expected to produce
/// one of the largest boundaries in the search region.
pub fn trace_contours(edges: &GrayImage, config: &ContourConfig) -> Vec<Contour> {
    let (w, h) = edges.dimensions();
    let mut visited = vec![false; (w as usize) * (h as usize)];
    let idx = |x: u32, y: u32| (y as usize) * (w as usize) + x as usize;

    let mut contours = Vec::new();
    let mut stack: Vec<(u32, u32)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if edges.get_pixel(x, y)[0] == 0 || visited[idx(x, y)] {
                continue;
            }
            let mut points = Vec::new();
            stack.clear();
            stack.push((x, y));
            visited[idx(x, y)] = true;

            while let Some((cx, cy)) = stack.pop() {
                // Past the budget the component is still consumed (so it
                // cannot seed further contours) but no more points are
                // stored or handed downstream.
                if points.len() < config.max_points {
                    points.push(Point::new(cx as f64, cy as f64));
                }
                for (dx, dy) in NEIGHBORS {
                    let nx = cx as i64 + dx;
                    let ny = cy as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let (nx, ny) = (nx as u32, ny as u32);
                    if edges.get_pixel(nx, ny)[0] != 0 && !visited[idx(nx, ny)] {
                        visited[idx(nx, ny)] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            if points.len() >= config.min_points {
                contours.push(Contour { points });
            }
        }
    }

    contours.sort_by(|a, b| b.len().cmp(&a.len()));
    contours.truncate(config.max_contours);
    contours
}
