//! High-level detection API.
//!
//! [`CardDetector`] is the per-session entry point for locating the
//! reference card. It owns the only cross-call state (corner smoother,
//! lock/ROI) and must not be shared between logical sessions.

use std::time::Instant;

use image::{imageops, GrayImage, RgbImage};
use nailgauge_core::gray::grayscale;
use nailgauge_core::{Quad, Rect};

use crate::calib::{calibrate, Calibration};
use crate::card::detect::{detect_frame, FrameOutcome};
use crate::card::{CardCandidate, CornerSmoother};
use crate::config::DetectConfig;
use crate::error::DetectError;

/// Per-call diagnostic counters, including wall-clock processing time so
/// callers can detect pathological slow paths.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostics {
    pub elapsed_ms: f64,
    pub n_contours: usize,
    pub n_quads: usize,
    pub n_candidates: usize,
    /// True when the search ran inside the locked region of interest.
    pub roi_search: bool,
}

/// A successful card detection with its derived calibration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CardDetection {
    /// The raw winning candidate for this frame.
    pub candidate: CardCandidate,
    /// Temporally smoothed polygon over the session history.
    pub smoothed_quad: Quad,
    /// True once recent detections agree within the stability epsilon.
    pub stable: bool,
    pub calibration: Calibration,
    pub diagnostics: Diagnostics,
}

/// Card detection session.
///
/// State model: UNLOCKED searches the full frame every call; LOCKED
/// (entered only via [`accept`](Self::accept)) restricts the search to a
/// padded ROI around the last accepted polygon. A single failed call in
/// LOCKED reverts to UNLOCKED; the failing call still returns its error.
pub struct CardDetector {
    config: DetectConfig,
    smoother: CornerSmoother,
}

impl CardDetector {
    pub fn new(config: DetectConfig) -> Self {
        let smoother = CornerSmoother::new(config.smoother);
        Self { config, smoother }
    }

    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Mutable access for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut DetectConfig {
        &mut self.config
    }

    pub fn is_locked(&self) -> bool {
        self.smoother.is_locked()
    }

    /// Accept the current detection as "this is the card" and enter
    /// locked mode. Returns false when no detection has been seen yet.
    pub fn accept(&mut self) -> bool {
        self.smoother.lock()
    }

    /// Drop all session state (history and lock).
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    /// Detect the reference card in one still frame.
    ///
    /// `guide` optionally constrains where the card is expected; it is
    /// ignored in locked mode, where the ROI already constrains the
    /// search.
    pub fn detect(
        &mut self,
        gray: &GrayImage,
        guide: Option<Rect>,
    ) -> Result<CardDetection, DetectError> {
        let started = Instant::now();
        let (w, h) = gray.dimensions();

        let roi = self.smoother.roi().and_then(|r| r.clamped(w, h));
        let (outcome, roi_search) = match roi {
            Some(r) => match self.detect_in_roi(gray, r) {
                Ok(out) => (out, true),
                Err(err) => {
                    // One miss in locked mode reverts to full-frame search.
                    self.smoother.unlock();
                    return Err(err);
                }
            },
            None => (detect_frame(gray, &self.config, guide.as_ref())?, false),
        };

        let calibration = match calibrate(
            outcome.candidate.width_px,
            &self.config.card,
            &self.config.scale,
        ) {
            Ok(c) => c,
            Err(err) => {
                if roi_search {
                    self.smoother.unlock();
                }
                return Err(err);
            }
        };

        self.smoother.push(outcome.candidate.quad);
        let smoothed_quad = self.smoother.smoothed().expect("history is non-empty");
        let diagnostics = Diagnostics {
            elapsed_ms: started.elapsed().as_secs_f64() * 1e3,
            n_contours: outcome.n_contours,
            n_quads: outcome.n_quads,
            n_candidates: outcome.n_candidates,
            roi_search,
        };
        tracing::debug!(
            elapsed_ms = diagnostics.elapsed_ms,
            roi_search,
            "card detection finished"
        );

        Ok(CardDetection {
            candidate: outcome.candidate,
            smoothed_quad,
            stable: self.smoother.stable(),
            calibration,
            diagnostics,
        })
    }

    /// Convenience wrapper for RGB captures: reduce to luminance first.
    pub fn detect_rgb(
        &mut self,
        rgb: &RgbImage,
        guide: Option<Rect>,
    ) -> Result<CardDetection, DetectError> {
        self.detect(&grayscale(rgb), guide)
    }

    fn detect_in_roi(&self, gray: &GrayImage, roi: Rect) -> Result<FrameOutcome, DetectError> {
        let sub = imageops::crop_imm(
            gray,
            roi.x as u32,
            roi.y as u32,
            roi.width as u32,
            roi.height as u32,
        )
        .to_image();
        let mut outcome = detect_frame(&sub, &self.config, None)?;
        outcome.candidate.quad = outcome.candidate.quad.translated(roi.x, roi.y);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::draw_card_image;
    use image::Luma;

    fn card_frame() -> GrayImage {
        draw_card_image(640, 480, 100, 100, 428, 270, 210, 40)
    }

    #[test]
    fn detect_calibrates_the_reference_scenario() {
        let mut det = CardDetector::new(DetectConfig::default());
        let out = det.detect(&card_frame(), None).expect("card");
        assert!((out.calibration.px_per_mm - 5.0).abs() < 0.1);
        assert!(out.diagnostics.elapsed_ms >= 0.0);
        assert!(!out.diagnostics.roi_search);
    }

    #[test]
    fn repeated_frames_become_stable() {
        let mut det = CardDetector::new(DetectConfig::default());
        let img = card_frame();
        let mut last_stable = false;
        for _ in 0..3 {
            last_stable = det.detect(&img, None).expect("card").stable;
        }
        assert!(last_stable);
    }

    #[test]
    fn accept_locks_and_roi_search_is_used() {
        let mut det = CardDetector::new(DetectConfig::default());
        let img = card_frame();
        det.detect(&img, None).expect("card");
        assert!(det.accept());
        assert!(det.is_locked());

        let out = det.detect(&img, None).expect("card in roi");
        assert!(out.diagnostics.roi_search);
        // Corners must come back in full-frame coordinates.
        assert!((out.candidate.quad.top_left().x - 100.0).abs() < 6.0);
    }

    #[test]
    fn miss_in_locked_mode_unlocks() {
        let mut det = CardDetector::new(DetectConfig::default());
        let img = card_frame();
        det.detect(&img, None).expect("card");
        det.accept();

        let blank = GrayImage::from_pixel(640, 480, Luma([128]));
        let err = det.detect(&blank, None).unwrap_err();
        assert_eq!(err, DetectError::InsufficientContourData);
        assert!(!det.is_locked());
    }

    #[test]
    fn rgb_entry_point_matches_gray_detection() {
        let gray = card_frame();
        let mut rgb = image::RgbImage::new(640, 480);
        for (x, y, px) in rgb.enumerate_pixels_mut() {
            let v = gray.get_pixel(x, y)[0];
            *px = image::Rgb([v, v, v]);
        }
        let mut det = CardDetector::new(DetectConfig::default());
        let out = det.detect_rgb(&rgb, None).expect("card from rgb");
        assert!((out.calibration.px_per_mm - 5.0).abs() < 0.1);
    }

    #[test]
    fn accept_before_any_detection_is_a_no_op() {
        let mut det = CardDetector::new(DetectConfig::default());
        assert!(!det.accept());
        assert!(!det.is_locked());
    }
}
