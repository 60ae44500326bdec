//! Pixel-width → pixels-per-millimeter calibration.

use crate::config::{CardSpec, ScaleConfig};
use crate::error::DetectError;

/// The pixel-to-physical conversion derived from one detected card.
///
/// Recomputed independently per photo; never persisted across unrelated
/// photos or sessions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Calibration {
    pub px_per_mm: f64,
    /// The reference object's known physical width backing this scale.
    pub card_width_mm: f64,
}

impl Calibration {
    pub fn mm_from_px(&self, px: f64) -> f64 {
        px / self.px_per_mm
    }
}

/// Derive the scale from a detected card width, gated by plausibility.
///
/// Out-of-range values are rejected as `InvalidScale`, never used
/// silently.
pub fn calibrate(
    card_width_px: f64,
    spec: &CardSpec,
    config: &ScaleConfig,
) -> Result<Calibration, DetectError> {
    let px_per_mm = card_width_px / spec.width_mm;
    if !px_per_mm.is_finite()
        || px_per_mm < config.min_px_per_mm
        || px_per_mm > config.max_px_per_mm
    {
        tracing::warn!(px_per_mm, "calibration rejected: implausible scale");
        return Err(DetectError::InvalidScale {
            px_per_mm,
            min_px_per_mm: config.min_px_per_mm,
            max_px_per_mm: config.max_px_per_mm,
        });
    }
    Ok(Calibration {
        px_per_mm,
        card_width_mm: spec.width_mm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_scenario_yields_five_px_per_mm() {
        let calib = calibrate(428.0, &CardSpec::default(), &ScaleConfig::default()).unwrap();
        assert_relative_eq!(calib.px_per_mm, 5.0, epsilon = 1e-9);
        assert_relative_eq!(calib.mm_from_px(75.0), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn scale_is_linear_in_card_width() {
        let spec = CardSpec::default();
        let cfg = ScaleConfig::default();
        let a = calibrate(200.0, &spec, &cfg).unwrap();
        let b = calibrate(400.0, &spec, &cfg).unwrap();
        assert_relative_eq!(b.px_per_mm, 2.0 * a.px_per_mm, epsilon = 1e-12);
    }

    #[test]
    fn implausible_scales_are_rejected() {
        let spec = CardSpec::default();
        let cfg = ScaleConfig::default();
        assert!(matches!(
            calibrate(20.0, &spec, &cfg),
            Err(DetectError::InvalidScale { .. })
        ));
        assert!(matches!(
            calibrate(10_000.0, &spec, &cfg),
            Err(DetectError::InvalidScale { .. })
        ));
    }
}
