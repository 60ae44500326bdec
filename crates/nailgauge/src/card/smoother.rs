//! Temporal stabilization of the winning card polygon.
//!
//! The smoother owns the only cross-call mutable state in the pipeline:
//! a bounded history of accepted quads plus the lock/ROI state. One
//! instance serves one logical detection session; it is never shared.

use std::collections::VecDeque;

use nailgauge_core::{Point, Quad, Rect};

use crate::config::SmootherConfig;

/// Windowed-mean corner smoother with an explicit locked mode.
///
/// Smoothing scheme: each of the four corners is averaged independently
/// over the retained history (simple windowed mean, deterministic).
#[derive(Debug, Clone)]
pub struct CornerSmoother {
    config: SmootherConfig,
    history: VecDeque<Quad>,
    roi: Option<Rect>,
}

impl CornerSmoother {
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            config,
            history: VecDeque::with_capacity(config.window.max(1)),
            roi: None,
        }
    }

    /// Record an accepted detection, evicting the oldest beyond the window.
    pub fn push(&mut self, quad: Quad) {
        if self.history.len() == self.config.window.max(1) {
            self.history.pop_front();
        }
        self.history.push_back(quad);
    }

    /// Per-corner windowed mean over the retained history.
    pub fn smoothed(&self) -> Option<Quad> {
        if self.history.is_empty() {
            return None;
        }
        let n = self.history.len() as f64;
        let mut corners = [Point::new(0.0, 0.0); 4];
        for quad in &self.history {
            for (acc, c) in corners.iter_mut().zip(quad.corners.iter()) {
                acc.x += c.x / n;
                acc.y += c.y / n;
            }
        }
        Some(Quad { corners })
    }

    /// True once the last `stability_frames` consecutive detections moved
    /// by at most `stability_eps_px` per corner between frames.
    pub fn stable(&self) -> bool {
        let frames = self.config.stability_frames.max(2);
        if self.history.len() < frames {
            return false;
        }
        self.history
            .iter()
            .skip(self.history.len() - frames)
            .collect::<Vec<_>>()
            .windows(2)
            .all(|pair| pair[0].max_corner_distance(pair[1]) <= self.config.stability_eps_px)
    }

    /// Enter locked mode: restrict subsequent searches to a padded region
    /// around the current smoothed quad. No-op while the history is empty.
    pub fn lock(&mut self) -> bool {
        match self.smoothed() {
            Some(quad) => {
                let roi = quad.bounding_box().padded(self.config.roi_pad_px);
                tracing::info!(?roi, "card lock engaged");
                self.roi = Some(roi);
                true
            }
            None => false,
        }
    }

    /// Leave locked mode and return to full-frame search.
    pub fn unlock(&mut self) {
        if self.roi.take().is_some() {
            tracing::info!("card lock released, reverting to full-frame search");
        }
    }

    pub fn is_locked(&self) -> bool {
        self.roi.is_some()
    }

    /// The locked region of interest, if any.
    pub fn roi(&self) -> Option<Rect> {
        self.roi
    }

    /// Drop all history and lock state.
    pub fn reset(&mut self) {
        self.history.clear();
        self.roi = None;
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
