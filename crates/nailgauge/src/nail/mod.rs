//! Nail-side detection: landmark index mapping and the boundary scan.

mod boundary;
mod landmarks;

pub use boundary::{scan_width, NailWidth};
pub use landmarks::{
    Digit, FingertipPair, FingertipSet, LANDMARKS_PER_HAND, TIP_INDICES, TIP_TO_BASE_OFFSET,
};
