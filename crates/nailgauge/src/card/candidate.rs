//! Card candidate construction, filtering, and scoring.

use image::GrayImage;
use nailgauge_core::{Point, Quad, Rect};

use crate::config::{CardSpec, SelectorConfig};

/// A 4-corner polygon that passed the geometric gates, with derived
/// measurements and quality scores. Transient per detection call.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CardCandidate {
    pub quad: Quad,
    /// Mean of the two long (top/bottom) edge lengths, in pixels.
    pub width_px: f64,
    /// Mean of the two short (left/right) edge lengths, in pixels.
    pub height_px: f64,
    pub aspect: f64,
    /// Relative error against the target aspect ratio.
    pub aspect_error: f64,
    /// Mean interior brightness, normalized to [0, 1].
    pub brightness: f64,
    /// Interior uniformity in [0, 1] (1 = perfectly flat).
    pub uniformity: f64,
    /// Guide-region fit in [0, 1], present when a guide was supplied.
    pub guide_fit: Option<f64>,
    /// Weighted selection score; filled in by [`select_candidate`].
    pub score: f64,
}

/// Build a candidate from a quad, or reject it against the card-spec gates.
///
/// Rejections: aspect error above `spec.aspect_tolerance`, or guide fill
/// ratio outside the configured band when a guide region is supplied.
pub fn build_candidate(
    quad: Quad,
    gray: &GrayImage,
    spec: &CardSpec,
    selector: &SelectorConfig,
    guide: Option<&Rect>,
) -> Option<CardCandidate> {
    let (a, b) = (quad.edge_width(), quad.edge_height());
    // Orientation-normalize: the card's long edge is the width regardless
    // of how it sits in the frame.
    let (width_px, height_px) = if a >= b { (a, b) } else { (b, a) };
    if height_px <= f64::EPSILON {
        return None;
    }

    let aspect = width_px / height_px;
    let aspect_error = (aspect - spec.aspect()).abs() / spec.aspect();
    if aspect_error > spec.aspect_tolerance {
        tracing::debug!(aspect, aspect_error, "candidate rejected: aspect");
        return None;
    }

    let guide_fit = match guide {
        Some(g) => {
            if g.area() <= f64::EPSILON {
                return None;
            }
            let fill = quad.bounding_box().area() / g.area();
            if fill < selector.guide_fill_min || fill > selector.guide_fill_max {
                tracing::debug!(fill, "candidate rejected: guide fill");
                return None;
            }
            Some((1.0 - (fill - 1.0).abs()).clamp(0.0, 1.0))
        }
        None => None,
    };

    let (brightness, uniformity) = sample_interior(&quad, gray, selector.sample_grid);

    Some(CardCandidate {
        quad,
        width_px,
        height_px,
        aspect,
        aspect_error,
        brightness,
        uniformity,
        guide_fit,
        score: 0.0,
    })
}

/// Score surviving candidates and return the best one.
///
/// Score = weighted sum of relative size (normalized against the largest
/// candidate), aspect accuracy, interior brightness, interior uniformity,
/// and guide fit. The card is assumed bright and visually uniform
/// relative to typical backgrounds.
pub fn select_candidate(
    mut candidates: Vec<CardCandidate>,
    spec: &CardSpec,
    selector: &SelectorConfig,
) -> Option<CardCandidate> {
    let max_area = candidates
        .iter()
        .map(|c| c.width_px * c.height_px)
        .fold(0.0f64, f64::max);
    if max_area <= 0.0 {
        return None;
    }

    for c in &mut candidates {
        let relative_size = (c.width_px * c.height_px) / max_area;
        let aspect_accuracy = (1.0 - c.aspect_error / spec.aspect_tolerance).clamp(0.0, 1.0);
        let (guide_term, size_weight) = match c.guide_fit {
            Some(fit) => (selector.weight_guide * fit, selector.weight_size),
            // No guide supplied: fold the guide weight into the size term.
            None => (0.0, selector.weight_size + selector.weight_guide),
        };
        c.score = size_weight * relative_size
            + selector.weight_aspect * aspect_accuracy
            + selector.weight_brightness * c.brightness
            + selector.weight_uniformity * c.uniformity
            + guide_term;
    }

    candidates
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

/// Sample the quad interior on a fixed grid and return
/// `(mean_brightness, uniformity)`, both in [0, 1].
fn sample_interior(quad: &Quad, gray: &GrayImage, grid: u32) -> (f64, f64) {
    let (w, h) = gray.dimensions();
    let grid = grid.max(2);
    let mut samples = Vec::with_capacity((grid * grid) as usize);
    for j in 0..grid {
        for i in 0..grid {
            let u = (i as f64 + 0.5) / grid as f64;
            let v = (j as f64 + 0.5) / grid as f64;
            let p = bilinear_corner_point(quad, u, v);
            let x = (p.x.round() as i64).clamp(0, w as i64 - 1) as u32;
            let y = (p.y.round() as i64).clamp(0, h as i64 - 1) as u32;
            samples.push(gray.get_pixel(x, y)[0] as f64);
        }
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
    let brightness = mean / 255.0;
    let uniformity = (1.0 - var.sqrt() / 128.0).clamp(0.0, 1.0);
    (brightness, uniformity)
}

/// Bilinear interpolation of the four corners at normalized `(u, v)`.
fn bilinear_corner_point(quad: &Quad, u: f64, v: f64) -> Point {
    let [tl, tr, br, bl] = quad.corners;
    let x = tl.x * (1.0 - u) * (1.0 - v) + tr.x * u * (1.0 - v) + br.x * u * v + bl.x * (1.0 - u) * v;
    let y = tl.y * (1.0 - u) * (1.0 - v) + tr.y * u * (1.0 - v) + br.y * u * v + bl.y * (1.0 - u) * v;
    Point::new(x, y)
}
