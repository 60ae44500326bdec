//! Per-stage configuration with sensible defaults.
//!
//! Every tunable lives in a stage config struct with a `Default` impl;
//! [`DetectConfig`] composes the card-pipeline stages and is the only
//! thing a [`crate::CardDetector`] needs. Individual fields can be
//! overridden after construction.

use crate::measure::SizeTable;
use nailgauge_core::contour::ContourConfig;
use nailgauge_core::edges::EdgeConfig;
use nailgauge_core::polygon::QuadConfig;

/// Physical specification of the rectangular reference object.
///
/// Defaults describe an ISO/IEC 7810 ID-1 payment card.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct CardSpec {
    /// Long-edge physical width in millimeters.
    pub width_mm: f64,
    /// Short-edge physical height in millimeters.
    pub height_mm: f64,
    /// Maximum accepted relative aspect-ratio error.
    pub aspect_tolerance: f64,
}

impl CardSpec {
    /// Target width/height ratio.
    pub fn aspect(&self) -> f64 {
        self.width_mm / self.height_mm
    }
}

impl Default for CardSpec {
    fn default() -> Self {
        Self {
            width_mm: 85.6,
            height_mm: 53.98,
            aspect_tolerance: 0.25,
        }
    }
}

/// Candidate scoring weights and gates.
///
/// The five weights sum to 1. When no guide region is supplied, the
/// guide weight is folded into the relative-size term.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct SelectorConfig {
    pub weight_size: f64,
    pub weight_aspect: f64,
    pub weight_brightness: f64,
    pub weight_uniformity: f64,
    pub weight_guide: f64,
    /// Accepted band for candidate-bbox ÷ guide-region area ratio.
    pub guide_fill_min: f64,
    pub guide_fill_max: f64,
    /// Interior brightness sampling grid (per axis).
    pub sample_grid: u32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            weight_size: 0.35,
            weight_aspect: 0.25,
            weight_brightness: 0.2,
            weight_uniformity: 0.1,
            weight_guide: 0.1,
            guide_fill_min: 0.35,
            guide_fill_max: 1.6,
            sample_grid: 8,
        }
    }
}

/// Temporal corner smoothing and lock behavior.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct SmootherConfig {
    /// Number of accepted detections averaged per corner.
    pub window: usize,
    /// Consecutive detections required before `stable()` turns true.
    pub stability_frames: usize,
    /// Per-corner movement tolerance for the stability predicate.
    pub stability_eps_px: f64,
    /// Padding added around the last accepted quad to form the locked ROI.
    pub roi_pad_px: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            window: 5,
            stability_frames: 3,
            stability_eps_px: 4.0,
            roi_pad_px: 40.0,
        }
    }
}

/// Plausibility bounds for the derived pixels-per-millimeter scale.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ScaleConfig {
    pub min_px_per_mm: f64,
    pub max_px_per_mm: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min_px_per_mm: 1.0,
            max_px_per_mm: 60.0,
        }
    }
}

/// Nail boundary scan controls.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct NailScanConfig {
    /// Radius of the sampling ring around the base joint (skin estimate).
    pub skin_ring_radius_px: u32,
    /// Half-extent of the patch around the tip anchor (target estimate).
    pub target_patch_radius_px: u32,
    /// Threshold component: fraction of the target brightness.
    pub target_fraction: f64,
    /// Threshold component: multiple of the skin brightness.
    pub skin_multiplier: f64,
    /// Rows scanned above and below the anchor row.
    pub rows_halfspan: u32,
    /// Maximum scan distance per direction, in pixels.
    pub max_scan_px: u32,
    /// Widest-row widths below this report `BoundaryDetectionFailed`.
    pub min_width_px: u32,
}

impl Default for NailScanConfig {
    fn default() -> Self {
        Self {
            skin_ring_radius_px: 12,
            target_patch_radius_px: 4,
            target_fraction: 0.55,
            skin_multiplier: 1.12,
            rows_halfspan: 4,
            max_scan_px: 120,
            min_width_px: 8,
        }
    }
}

/// Chord-to-arc correction for the convex nail surface.
///
/// The multiplier has no closed-form derivation; it is an empirical
/// constant kept swappable on purpose.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct CurvatureConfig {
    pub multiplier: f64,
}

impl Default for CurvatureConfig {
    fn default() -> Self {
        Self { multiplier: 1.06 }
    }
}

/// Top-level card-pipeline configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct DetectConfig {
    pub card: CardSpec,
    pub edges: EdgeConfig,
    pub contours: ContourConfig,
    pub quad: QuadConfig,
    pub selector: SelectorConfig,
    pub smoother: SmootherConfig,
    pub scale: ScaleConfig,
}

/// Top-level nail-measurement configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct NailConfig {
    pub scan: NailScanConfig,
    pub curvature: CurvatureConfig,
    pub sizes: SizeTable,
}
