//! Fixed index mapping into the external hand-pose landmark array.
//!
//! The estimator emits 21 ordered points per hand. Fingertips sit at
//! indices 4, 8, 12, 16, 20; each tip's base joint sits three positions
//! earlier. The landmarks themselves are consumed as-is; this module only
//! applies the mapping.

use nailgauge_core::Point;

use crate::error::DetectError;

/// Points per hand in the landmark convention.
pub const LANDMARKS_PER_HAND: usize = 21;

/// Landmark indices of the five fingertips, thumb first.
pub const TIP_INDICES: [usize; 5] = [4, 8, 12, 16, 20];

/// Offset from a tip index back to its base joint.
pub const TIP_TO_BASE_OFFSET: usize = 3;

/// Digit identity, in landmark order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Digit {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Digit {
    pub const ALL: [Digit; 5] = [
        Digit::Thumb,
        Digit::Index,
        Digit::Middle,
        Digit::Ring,
        Digit::Pinky,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Digit::Thumb => "thumb",
            Digit::Index => "index",
            Digit::Middle => "middle",
            Digit::Ring => "ring",
            Digit::Pinky => "pinky",
        }
    }
}

/// One digit's anchor pair: the fingertip and its base joint.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FingertipPair {
    pub digit: Digit,
    pub tip: Point,
    pub base: Point,
}

/// The five (tip, base-joint) pairs extracted from one hand.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FingertipSet {
    pairs: [FingertipPair; 5],
}

impl FingertipSet {
    /// Apply the fixed index mapping to a hand's landmark array.
    pub fn from_landmarks(landmarks: &[Point]) -> Result<Self, DetectError> {
        if landmarks.len() < LANDMARKS_PER_HAND {
            return Err(DetectError::InvalidLandmarks {
                expected: LANDMARKS_PER_HAND,
                got: landmarks.len(),
            });
        }
        let mut pairs = [FingertipPair {
            digit: Digit::Thumb,
            tip: Point::new(0.0, 0.0),
            base: Point::new(0.0, 0.0),
        }; 5];
        for (i, (digit, tip_idx)) in Digit::ALL.iter().zip(TIP_INDICES.iter()).enumerate() {
            pairs[i] = FingertipPair {
                digit: *digit,
                tip: landmarks[*tip_idx],
                base: landmarks[tip_idx - TIP_TO_BASE_OFFSET],
            };
        }
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[FingertipPair; 5] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks() -> Vec<Point> {
        (0..21).map(|i| Point::new(i as f64, 100.0 + i as f64)).collect()
    }

    #[test]
    fn mapping_pairs_each_tip_with_its_base_joint() {
        let set = FingertipSet::from_landmarks(&landmarks()).unwrap();
        let pairs = set.pairs();
        assert_eq!(pairs[0].digit, Digit::Thumb);
        assert_eq!(pairs[0].tip.x, 4.0);
        assert_eq!(pairs[0].base.x, 1.0);
        assert_eq!(pairs[4].digit, Digit::Pinky);
        assert_eq!(pairs[4].tip.x, 20.0);
        assert_eq!(pairs[4].base.x, 17.0);
    }

    #[test]
    fn short_arrays_are_rejected() {
        let err = FingertipSet::from_landmarks(&landmarks()[..15]).unwrap_err();
        assert_eq!(
            err,
            DetectError::InvalidLandmarks {
                expected: 21,
                got: 15
            }
        );
    }
}
