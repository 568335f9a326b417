//! Shared helpers for image-based unit tests.

use image::{GrayImage, Luma};

/// Render a synthetic ring: pixels within `half_thickness` of the circle
/// `(center, radius)` get `ring_pix`, everything else `bg_pix`.
pub(crate) fn draw_ring(
    w: u32,
    h: u32,
    center: [f32; 2],
    radius: f32,
    half_thickness: f32,
    ring_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - center[0];
            let dy = y as f32 - center[1];
            let d = (dx * dx + dy * dy).sqrt();
            let pix = if (d - radius).abs() <= half_thickness {
                ring_pix
            } else {
                bg_pix
            };
            img.put_pixel(x, y, Luma([pix]));
        }
    }
    img
}
