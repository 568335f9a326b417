//! Image enhancement: luminance, denoising, local contrast normalization.
//!
//! Interference photographs are unevenly illuminated (bright core, dim outer
//! rings), so edge strength straight from the camera is not comparable across
//! the frame. A tiled, contrast-limited histogram equalization after a light
//! Gaussian blur makes ring edges score consistently wherever they sit.

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Errors for malformed raw image buffers.
#[derive(thiserror::Error, Debug)]
pub enum EnhanceError {
    #[error("empty image buffer ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("buffer length {got} does not match {width}x{height}x{channels}")]
    BufferSize {
        got: usize,
        width: u32,
        height: u32,
        channels: u8,
    },

    #[error("unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(u8),
}

/// Enhancement settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    /// Gaussian blur sigma; 1.1 is the classic 5x5-kernel equivalent.
    pub blur_sigma: f32,
    /// Equalization tiles per image axis.
    pub tile_grid: u32,
    /// Histogram clip limit relative to a uniform distribution.
    pub clip_limit: f32,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            tile_grid: 8,
            clip_limit: 2.0,
        }
    }
}

/// Enhance a raw interleaved 8-bit buffer into an analysis-ready field.
///
/// Accepts 1-channel (gray), 3-channel (RGB) and 4-channel (RGBA) layouts.
pub fn enhance(
    data: &[u8],
    width: u32,
    height: u32,
    channels: u8,
) -> Result<GrayImage, EnhanceError> {
    enhance_with(data, width, height, channels, &EnhanceParams::default())
}

/// [`enhance`] with explicit settings.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip(data, params), fields(width, height, channels))
)]
pub fn enhance_with(
    data: &[u8],
    width: u32,
    height: u32,
    channels: u8,
    params: &EnhanceParams,
) -> Result<GrayImage, EnhanceError> {
    if width == 0 || height == 0 || data.is_empty() {
        return Err(EnhanceError::EmptyImage { width, height });
    }
    if !matches!(channels, 1 | 3 | 4) {
        return Err(EnhanceError::UnsupportedChannels(channels));
    }
    let expected = width as usize * height as usize * channels as usize;
    if data.len() != expected {
        return Err(EnhanceError::BufferSize {
            got: data.len(),
            width,
            height,
            channels,
        });
    }

    let gray = luminance(data, width, height, channels);
    let blurred = imageproc::filter::gaussian_blur_f32(&gray, params.blur_sigma.max(0.01));
    let out = clahe(&blurred, params.tile_grid, params.clip_limit);
    log::debug!(
        "enhanced {}x{} image ({} channels, {} tiles)",
        width,
        height,
        channels,
        params.tile_grid
    );
    Ok(out)
}

/// Rec.601 luminance conversion; 1-channel input is copied through.
fn luminance(data: &[u8], width: u32, height: u32, channels: u8) -> GrayImage {
    if channels == 1 {
        return GrayImage::from_raw(width, height, data.to_vec())
            .unwrap_or_else(|| GrayImage::new(width, height));
    }
    let step = channels as usize;
    let mut out = Vec::with_capacity(width as usize * height as usize);
    for px in data.chunks_exact(step) {
        let y = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
        out.push(y.round().clamp(0.0, 255.0) as u8);
    }
    GrayImage::from_raw(width, height, out).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Contrast-limited adaptive histogram equalization.
///
/// Per-tile clipped histograms become CDF lookup tables; each output pixel
/// blends the four surrounding tile tables bilinearly, which removes the
/// blocky tile seams of plain adaptive equalization.
pub(crate) fn clahe(img: &GrayImage, tile_grid: u32, clip_limit: f32) -> GrayImage {
    let (w, h) = img.dimensions();
    let tiles = tile_grid.max(1);
    let tile_w = w.div_ceil(tiles).max(1);
    let tile_h = h.div_ceil(tiles).max(1);
    let raw = img.as_raw();

    let mut luts = vec![[0u8; 256]; (tiles * tiles) as usize];
    for ty in 0..tiles {
        for tx in 0..tiles {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(w);
            let y1 = (y0 + tile_h).min(h);
            let lut = &mut luts[(ty * tiles + tx) as usize];
            if x0 >= x1 || y0 >= y1 {
                // Degenerate tile on tiny images: identity mapping.
                for (i, v) in lut.iter_mut().enumerate() {
                    *v = i as u8;
                }
                continue;
            }

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                let row = (y * w) as usize;
                for x in x0..x1 {
                    hist[raw[row + x as usize] as usize] += 1;
                }
            }
            let area = ((x1 - x0) * (y1 - y0)) as u32;

            // Clip and redistribute the excess mass uniformly.
            let limit = ((clip_limit * area as f32 / 256.0) as u32).max(1);
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > limit {
                    excess += *bin - limit;
                    *bin = limit;
                }
            }
            let bonus = excess / 256;
            let leftover = (excess % 256) as usize;
            for (i, bin) in hist.iter_mut().enumerate() {
                *bin += bonus + u32::from(i < leftover);
            }

            let mut cdf = 0u64;
            for (i, &bin) in hist.iter().enumerate() {
                cdf += bin as u64;
                lut[i] = ((cdf * 255) / area as u64).min(255) as u8;
            }
        }
    }

    let mut out = vec![0u8; (w * h) as usize];
    let max_tile = (tiles - 1) as f32;
    for y in 0..h {
        let gy = ((y as f32 + 0.5) / tile_h as f32 - 0.5).clamp(0.0, max_tile);
        let ty0 = gy.floor() as u32;
        let ty1 = (ty0 + 1).min(tiles - 1);
        let fy = gy - ty0 as f32;
        for x in 0..w {
            let gx = ((x as f32 + 0.5) / tile_w as f32 - 0.5).clamp(0.0, max_tile);
            let tx0 = gx.floor() as u32;
            let tx1 = (tx0 + 1).min(tiles - 1);
            let fx = gx - tx0 as f32;

            let v = raw[(y * w + x) as usize] as usize;
            let p00 = luts[(ty0 * tiles + tx0) as usize][v] as f32;
            let p10 = luts[(ty0 * tiles + tx1) as usize][v] as f32;
            let p01 = luts[(ty1 * tiles + tx0) as usize][v] as f32;
            let p11 = luts[(ty1 * tiles + tx1) as usize][v] as f32;

            let top = p00 + fx * (p10 - p00);
            let bottom = p01 + fx * (p11 - p01);
            let blended = top + fy * (bottom - top);
            out[(y * w + x) as usize] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
    GrayImage::from_raw(w, h, out).unwrap_or_else(|| GrayImage::new(w, h))
}
