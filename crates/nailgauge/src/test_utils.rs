//! Shared synthetic-image helpers for unit tests.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;

/// Render a bright card-shaped rectangle on a darker background.
pub(crate) fn draw_card_image(
    w: u32,
    h: u32,
    x0: u32,
    y0: u32,
    card_w: u32,
    card_h: u32,
    card_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    let mut img = GrayImage::from_pixel(w, h, Luma([bg_pix]));
    draw_filled_rect_mut(
        &mut img,
        PixelRect::at(x0 as i32, y0 as i32).of_size(card_w, card_h),
        Luma([card_pix]),
    );
    img
}

/// Render a bright nail-like band centered at `(cx, cy)` on a skin-toned
/// field. The band covers `band_w` columns and `band_h` rows exactly.
pub(crate) fn draw_nail_band(
    w: u32,
    h: u32,
    cx: u32,
    cy: u32,
    band_w: u32,
    band_h: u32,
    nail_pix: u8,
    skin_pix: u8,
) -> GrayImage {
    let mut img = GrayImage::from_pixel(w, h, Luma([skin_pix]));
    let x0 = cx.saturating_sub(band_w / 2);
    let y0 = cy.saturating_sub(band_h / 2);
    draw_filled_rect_mut(
        &mut img,
        PixelRect::at(x0 as i32, y0 as i32).of_size(band_w, band_h),
        Luma([nail_pix]),
    );
    img
}
