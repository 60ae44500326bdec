//! Millimeter conversion and ordinal size lookup.

use image::GrayImage;

use crate::calib::Calibration;
use crate::config::{CurvatureConfig, NailConfig};
use crate::error::DetectError;
use crate::nail::{scan_width, Digit, FingertipSet};

/// One entry of the ordinal size table: a size index and its millimeter band.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SizeEntry {
    pub size: u8,
    pub min_mm: f64,
    pub max_mm: f64,
}

impl SizeEntry {
    fn midpoint(&self) -> f64 {
        0.5 * (self.min_mm + self.max_mm)
    }
}

/// Ordered size → millimeter-band mapping, monotonically decreasing in
/// millimeters as size increases. Swappable without touching the
/// conversion algorithm.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SizeTable {
    entries: Vec<SizeEntry>,
}

impl SizeTable {
    /// Validate and build a table.
    ///
    /// Requires a non-empty list with strictly increasing sizes and
    /// strictly decreasing, non-overlapping millimeter bands.
    pub fn new(entries: Vec<SizeEntry>) -> Result<Self, DetectError> {
        if entries.is_empty() {
            return Err(DetectError::InvalidConfig("size table is empty".into()));
        }
        for e in &entries {
            if !(e.min_mm < e.max_mm) {
                return Err(DetectError::InvalidConfig(format!(
                    "size {} band is not an interval: {}..{}",
                    e.size, e.min_mm, e.max_mm
                )));
            }
        }
        for pair in entries.windows(2) {
            if pair[1].size <= pair[0].size {
                return Err(DetectError::InvalidConfig(
                    "sizes must be strictly increasing".into(),
                ));
            }
            if pair[1].max_mm > pair[0].min_mm {
                return Err(DetectError::InvalidConfig(
                    "millimeter bands must decrease as size increases".into(),
                ));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SizeEntry] {
        &self.entries
    }

    /// Look up the ordinal size for a millimeter measurement.
    ///
    /// Band containment wins (half-open `[min, max)`; the largest band is
    /// max-inclusive). Out-of-band inputs map to the nearest band
    /// midpoint, clamped at both table extremes.
    pub fn mm_to_size(&self, mm: f64) -> u8 {
        let first = &self.entries[0];
        let last = &self.entries[self.entries.len() - 1];
        if mm >= first.max_mm {
            return first.size;
        }
        if mm < last.min_mm {
            return last.size;
        }
        for (i, e) in self.entries.iter().enumerate() {
            let upper_ok = mm < e.max_mm || (i == 0 && mm <= e.max_mm);
            if mm >= e.min_mm && upper_ok {
                return e.size;
            }
        }
        // In a gap between bands: nearest midpoint wins.
        self.entries
            .iter()
            .min_by(|a, b| {
                (a.midpoint() - mm)
                    .abs()
                    .total_cmp(&(b.midpoint() - mm).abs())
            })
            .map(|e| e.size)
            .unwrap_or(last.size)
    }

    /// Representative millimeter value (band midpoint) for a size.
    pub fn size_to_mm(&self, size: u8) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.size == size)
            .map(SizeEntry::midpoint)
    }
}

impl Default for SizeTable {
    /// Sizes 0..=9 in 1 mm bands from 18 mm down to 8 mm.
    fn default() -> Self {
        let entries = (0u8..10)
            .map(|i| SizeEntry {
                size: i,
                min_mm: 17.0 - i as f64,
                max_mm: 18.0 - i as f64,
            })
            .collect();
        Self::new(entries).expect("default size table is valid")
    }
}

/// A completed per-digit measurement. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NailMeasurement {
    pub digit: Digit,
    pub width_px: u32,
    /// Straight-line width across the nail, in millimeters.
    pub chord_mm: f64,
    /// Chord corrected for the nail's convex curvature.
    pub curved_mm: f64,
    pub size: u8,
    pub confidence: f64,
}

/// Converts a pixel width into millimeters and an ordinal size.
#[derive(Debug, Clone)]
pub struct UnitConverter<'a> {
    table: &'a SizeTable,
    curvature: CurvatureConfig,
}

impl<'a> UnitConverter<'a> {
    pub fn new(table: &'a SizeTable, curvature: CurvatureConfig) -> Self {
        Self { table, curvature }
    }

    /// `(chord_mm, curved_mm, size)` for a measured pixel width.
    pub fn convert(&self, width_px: u32, calibration: &Calibration) -> (f64, f64, u8) {
        let chord_mm = calibration.mm_from_px(width_px as f64);
        let curved_mm = chord_mm * self.curvature.multiplier;
        (chord_mm, curved_mm, self.table.mm_to_size(curved_mm))
    }
}

/// Measure all five digits against a calibrated frame.
///
/// Results are per digit, thumb first; a failed scan on one digit does
/// not abort the others.
pub fn measure_nails(
    gray: &GrayImage,
    fingertips: &FingertipSet,
    calibration: &Calibration,
    config: &NailConfig,
) -> Vec<Result<NailMeasurement, DetectError>> {
    let converter = UnitConverter::new(&config.sizes, config.curvature);
    fingertips
        .pairs()
        .iter()
        .map(|pair| {
            let width = scan_width(gray, pair.tip, pair.base, &config.scan)?;
            let (chord_mm, curved_mm, size) = converter.convert(width.width_px, calibration);
            tracing::info!(
                digit = pair.digit.name(),
                width_px = width.width_px,
                chord_mm,
                curved_mm,
                size,
                "nail measured"
            );
            Ok(NailMeasurement {
                digit: pair.digit,
                width_px: width.width_px,
                chord_mm,
                curved_mm,
                size,
                confidence: width.confidence,
            })
        })
        .collect()
}
