//! Nail boundary detection by local shadow/brightness edge scan.
//!
//! The nail plate is typically brighter than the surrounding skin because
//! its curvature catches the light; the lateral folds cast a slightly
//! darker seam. The scan estimates the local skin brightness from a ring
//! around the base joint and the target brightness from a patch around
//! the tip anchor, then walks outward row by row until brightness drops
//! below a threshold derived from both.

use image::GrayImage;
use nailgauge_core::Point;

use crate::config::NailScanConfig;
use crate::error::DetectError;

/// Result of one boundary scan: the widest measured row.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NailWidth {
    /// Width of the widest row, right edge − left edge + 1.
    pub width_px: u32,
    /// Image row the winning width was measured on.
    pub row_y: u32,
    pub left_x: u32,
    pub right_x: u32,
    /// Fraction of scanned rows within 15% of the winning width.
    pub confidence: f64,
}

/// Scan for the nail's lateral boundaries around a fingertip anchor.
///
/// `tip` is the fingertip landmark, `base` the corresponding base joint
/// in the same pixel buffer. A widest row below the configured minimum
/// reports `BoundaryDetectionFailed`; no estimated value is ever
/// substituted.
pub fn scan_width(
    gray: &GrayImage,
    tip: Point,
    base: Point,
    config: &NailScanConfig,
) -> Result<NailWidth, DetectError> {
    let (w, h) = gray.dimensions();
    let cx = (tip.x.round() as i64).clamp(0, w as i64 - 1);
    let cy = (tip.y.round() as i64).clamp(0, h as i64 - 1);

    let skin = skin_brightness(gray, base, config.skin_ring_radius_px);
    let target = target_brightness(gray, cx, cy, config.target_patch_radius_px);
    let threshold = (config.target_fraction * target).max(config.skin_multiplier * skin);
    tracing::debug!(skin, target, threshold, "nail scan thresholds");

    let mut best: Option<(u32, u32, u32, u32)> = None; // (width, y, left, right)
    let mut row_widths = Vec::new();
    let span = config.rows_halfspan as i64;
    for dy in -span..=span {
        let y = cy + dy;
        if y < 0 || y >= h as i64 {
            continue;
        }
        let y = y as u32;
        let Some((left, right)) = scan_row(gray, y, cx as u32, threshold, config.max_scan_px)
        else {
            row_widths.push(0);
            continue;
        };
        let width = right - left + 1;
        row_widths.push(width);
        if best.map_or(true, |(bw, ..)| width > bw) {
            best = Some((width, y, left, right));
        }
    }

    let (width_px, row_y, left_x, right_x) = best.unwrap_or((0, cy as u32, cx as u32, cx as u32));
    if width_px < config.min_width_px {
        return Err(DetectError::BoundaryDetectionFailed {
            width_px,
            min_width_px: config.min_width_px,
        });
    }

    let agreeing = row_widths
        .iter()
        .filter(|&&rw| (rw as f64 - width_px as f64).abs() <= 0.15 * width_px as f64)
        .count();
    let confidence = agreeing as f64 / row_widths.len().max(1) as f64;

    Ok(NailWidth {
        width_px,
        row_y,
        left_x,
        right_x,
        confidence,
    })
}

/// Walk left and right from the anchor column until brightness drops
/// below `threshold` or the scan budget runs out. Returns `None` when the
/// anchor pixel itself is below the threshold.
fn scan_row(
    gray: &GrayImage,
    y: u32,
    anchor_x: u32,
    threshold: f64,
    max_scan_px: u32,
) -> Option<(u32, u32)> {
    let w = gray.width();
    let bright = |x: u32| gray.get_pixel(x, y)[0] as f64;
    if bright(anchor_x) < threshold {
        return None;
    }
    let mut left = anchor_x;
    while left > 0 && anchor_x - left < max_scan_px && bright(left - 1) >= threshold {
        left -= 1;
    }
    let mut right = anchor_x;
    while right + 1 < w && right - anchor_x < max_scan_px && bright(right + 1) >= threshold {
        right += 1;
    }
    Some((left, right))
}

/// Mean brightness of a ring of samples around the base joint.
fn skin_brightness(gray: &GrayImage, base: Point, radius_px: u32) -> f64 {
    const RING_SAMPLES: u32 = 16;
    let (w, h) = gray.dimensions();
    let r = radius_px as f64;
    let mut sum = 0.0;
    let mut n = 0u32;
    for k in 0..RING_SAMPLES {
        let theta = 2.0 * std::f64::consts::PI * k as f64 / RING_SAMPLES as f64;
        let x = (base.x + r * theta.cos()).round() as i64;
        let y = (base.y + r * theta.sin()).round() as i64;
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            continue;
        }
        sum += gray.get_pixel(x as u32, y as u32)[0] as f64;
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Brightest pixel in the patch around the tip anchor. The nail surface
/// usually carries a curvature highlight, so the maximum tracks the nail
/// rather than the surrounding skin.
fn target_brightness(gray: &GrayImage, cx: i64, cy: i64, radius_px: u32) -> f64 {
    let (w, h) = gray.dimensions();
    let r = radius_px as i64;
    let mut max = 0u8;
    for dy in -r..=r {
        for dx in -r..=r {
            let x = cx + dx;
            let y = cy + dy;
            if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                continue;
            }
            max = max.max(gray.get_pixel(x as u32, y as u32)[0]);
        }
    }
    max as f64
}
