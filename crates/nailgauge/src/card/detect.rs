//! Per-frame card pipeline: edges → contours → quads → selection.

use image::GrayImage;
use nailgauge_core::contour::trace_contours;
use nailgauge_core::edges::detect_edges;
use nailgauge_core::polygon::approximate_quad;
use nailgauge_core::Rect;

use super::candidate::{build_candidate, select_candidate, CardCandidate};
use crate::config::DetectConfig;
use crate::error::DetectError;

/// Outcome of one single-frame search, before smoothing and calibration.
#[derive(Debug, Clone)]
pub(crate) struct FrameOutcome {
    pub candidate: CardCandidate,
    pub n_contours: usize,
    pub n_quads: usize,
    pub n_candidates: usize,
}

/// Run the card search over one grayscale frame (or ROI sub-image).
///
/// Error split: an unusable edge map reports `InsufficientContourData`;
/// contours that yield no surviving candidate report `ReferenceNotFound`.
pub(crate) fn detect_frame(
    gray: &GrayImage,
    config: &DetectConfig,
    guide: Option<&Rect>,
) -> Result<FrameOutcome, DetectError> {
    let edge_map = detect_edges(gray, &config.edges);
    let contours = trace_contours(&edge_map, &config.contours);
    if contours.is_empty() {
        tracing::debug!("no contours met the length threshold");
        return Err(DetectError::InsufficientContourData);
    }

    let quads: Vec<_> = contours
        .iter()
        .filter_map(|c| approximate_quad(c, &config.quad))
        .collect();
    tracing::debug!(
        n_contours = contours.len(),
        n_quads = quads.len(),
        "card frame stage counts"
    );
    if quads.is_empty() {
        return Err(DetectError::ReferenceNotFound);
    }

    let candidates: Vec<_> = quads
        .iter()
        .filter_map(|q| build_candidate(*q, gray, &config.card, &config.selector, guide))
        .collect();
    let n_candidates = candidates.len();

    let candidate = select_candidate(candidates, &config.card, &config.selector)
        .ok_or(DetectError::ReferenceNotFound)?;
    tracing::info!(
        width_px = candidate.width_px,
        score = candidate.score,
        "card candidate selected"
    );

    Ok(FrameOutcome {
        candidate,
        n_contours: contours.len(),
        n_quads: quads.len(),
        n_candidates,
    })
}
