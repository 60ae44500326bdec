//! Sobel gradient-magnitude edge mask.

use image::{GrayImage, Luma};

/// Edge detection controls.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct EdgeConfig {
    /// Gradient magnitude above which a pixel is marked as an edge.
    pub magnitude_threshold: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            magnitude_threshold: 80.0,
        }
    }
}

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Compute a binary edge mask (255 = edge, 0 = background).
///
/// Pure function of the input and threshold. Border pixels are never
/// marked because the 3×3 kernels need a full neighborhood; the output
/// dimensions always equal the input's.
pub fn detect_edges(gray: &GrayImage, config: &EdgeConfig) -> GrayImage {
    let (w, h) = gray.dimensions();
    let mut out = GrayImage::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }
    let thr_sq = config.magnitude_threshold * config.magnitude_threshold;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for ky in 0..3 {
                for kx in 0..3 {
                    let v = gray.get_pixel(x + kx - 1, y + ky - 1)[0] as i32;
                    gx += SOBEL_X[ky as usize][kx as usize] * v;
                    gy += SOBEL_Y[ky as usize][kx as usize] * v;
                }
            }
            let mag_sq = (gx * gx + gy * gy) as f32;
            if mag_sq > thr_sq {
                out.put_pixel(x, y, Luma([255]));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_step(w: u32, h: u32, split: u32, left: u8, right: u8) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = if x < split { left } else { right };
                img.put_pixel(x, y, Luma([v]));
            }
        }
        img
    }

    #[test]
    fn uniform_image_has_no_edges() {
        let img = GrayImage::from_pixel(20, 20, Luma([128]));
        let edges = detect_edges(&img, &EdgeConfig::default());
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn step_edge_is_marked_along_the_boundary() {
        let img = vertical_step(20, 20, 10, 20, 220);
        let edges = detect_edges(&img, &EdgeConfig::default());
        // Interior rows must fire on at least the two columns flanking the step.
        for y in 1..19 {
            assert_eq!(edges.get_pixel(9, y)[0], 255, "row {y}");
            assert_eq!(edges.get_pixel(10, y)[0], 255, "row {y}");
        }
        // Far from the step nothing fires.
        assert_eq!(edges.get_pixel(3, 10)[0], 0);
        assert_eq!(edges.get_pixel(16, 10)[0], 0);
    }

    #[test]
    fn border_pixels_are_never_edges() {
        let img = vertical_step(20, 20, 1, 0, 255);
        let edges = detect_edges(&img, &EdgeConfig::default());
        for x in 0..20 {
            assert_eq!(edges.get_pixel(x, 0)[0], 0);
            assert_eq!(edges.get_pixel(x, 19)[0], 0);
        }
        for y in 0..20 {
            assert_eq!(edges.get_pixel(0, y)[0], 0);
            assert_eq!(edges.get_pixel(19, y)[0], 0);
        }
    }

    #[test]
    fn threshold_controls_sensitivity() {
        let img = vertical_step(20, 20, 10, 100, 130);
        let lo = detect_edges(
            &img,
            &EdgeConfig {
                magnitude_threshold: 40.0,
            },
        );
        let hi = detect_edges(
            &img,
            &EdgeConfig {
                magnitude_threshold: 400.0,
            },
        );
        assert!(lo.pixels().any(|p| p[0] == 255));
        assert!(hi.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn tiny_images_yield_empty_masks() {
        let img = GrayImage::from_pixel(2, 2, Luma([255]));
        let edges = detect_edges(&img, &EdgeConfig::default());
        assert_eq!(edges.dimensions(), (2, 2));
        assert!(edges.pixels().all(|p| p[0] == 0));
    }
}
