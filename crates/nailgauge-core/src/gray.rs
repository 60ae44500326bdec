//! RGB → luminance reduction.

use image::{GrayImage, Luma, RgbImage};

/// Convert an RGB buffer to 8-bit luminance.
///
/// Integer Rec.601 weighting: `(77·R + 150·G + 29·B) >> 8`. Output
/// dimensions equal the input's.
pub fn grayscale(rgb: &RgbImage) -> GrayImage {
    let (w, h) = rgb.dimensions();
    let mut out = GrayImage::new(w, h);
    for (x, y, px) in rgb.enumerate_pixels() {
        let [r, g, b] = px.0;
        let luma = (77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8;
        out.put_pixel(x, y, Luma([luma as u8]));
    }
    out
}
