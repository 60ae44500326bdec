//! nailgauge — measure a fingernail from a single photo, calibrated
//! against a payment card of known physical size.
//!
//! The card pipeline is grayscale → Sobel edges → contour tracing →
//! quad approximation → candidate scoring, followed by temporal corner
//! smoothing and pixels-per-millimeter calibration. The nail side
//! consumes externally estimated hand landmarks, scans the local
//! brightness boundary around each fingertip, and converts pixel widths
//! into millimeters and an ordinal size.
//!
//! Everything is synchronous and per-still-image; the only cross-call
//! state is the [`CardDetector`] session (smoother history plus lock/ROI
//! mode). Every call returns either a fully valid result or one specific
//! [`DetectError`] — there are no partial results and no silently
//! guessed measurements.
//!
//! ```no_run
//! use nailgauge::{CardDetector, DetectConfig, FingertipSet, NailConfig};
//! use image::GrayImage;
//!
//! let gray = GrayImage::new(640, 480);
//! let mut detector = CardDetector::new(DetectConfig::default());
//! let detection = detector.detect(&gray, None)?;
//!
//! let landmarks: Vec<nailgauge::Point> = vec![]; // from the hand-pose estimator
//! let fingertips = FingertipSet::from_landmarks(&landmarks)?;
//! let _measurements = nailgauge::measure_nails(
//!     &gray,
//!     &fingertips,
//!     &detection.calibration,
//!     &NailConfig::default(),
//! );
//! # Ok::<(), nailgauge::DetectError>(())
//! ```

pub mod calib;
pub mod card;
pub mod config;
pub mod error;
pub mod measure;
pub mod nail;
pub mod session;

#[cfg(test)]
pub(crate) mod test_utils;

pub use calib::{calibrate, Calibration};
pub use card::{CardCandidate, CornerSmoother};
pub use config::{
    CardSpec, CurvatureConfig, DetectConfig, NailConfig, NailScanConfig, ScaleConfig,
    SelectorConfig, SmootherConfig,
};
pub use error::DetectError;
pub use measure::{measure_nails, NailMeasurement, SizeEntry, SizeTable, UnitConverter};
pub use nail::{scan_width, Digit, FingertipPair, FingertipSet, NailWidth};
pub use session::{CardDetection, CardDetector, Diagnostics};

pub use nailgauge_core::{Point, Quad, Rect};
