//! Detection error taxonomy.
//!
//! Each detection call returns either a fully valid result or exactly one
//! of these failures. The pipeline never retries internally and never
//! substitutes a default for a failed measurement; recovery (retake the
//! photo, fix lighting, move the card) is caller policy keyed off the
//! specific variant.

/// Failure modes of the card and nail pipelines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectError {
    /// Quads were produced but none survived filtering and scoring.
    #[error("reference card not found: no candidate survived filtering and scoring")]
    ReferenceNotFound,

    /// The derived pixels-per-millimeter value is outside the plausible range.
    #[error("implausible scale {px_per_mm:.2} px/mm (allowed {min_px_per_mm}..{max_px_per_mm})")]
    InvalidScale {
        px_per_mm: f64,
        min_px_per_mm: f64,
        max_px_per_mm: f64,
    },

    /// The edge map produced no contours meeting the length threshold.
    #[error("insufficient contour data: no contour met the length threshold")]
    InsufficientContourData,

    /// The widest scanned nail row is below the minimum plausible width.
    #[error("nail boundary not found: widest row {width_px} px is below the {min_width_px} px minimum")]
    BoundaryDetectionFailed { width_px: u32, min_width_px: u32 },

    /// The caller-supplied landmark array is too short for the fixed
    /// fingertip index mapping.
    #[error("landmark array too short: expected at least {expected} points, got {got}")]
    InvalidLandmarks { expected: usize, got: usize },

    /// A configuration value violates its documented invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
