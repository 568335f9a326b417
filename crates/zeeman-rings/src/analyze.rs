//! End-to-end helpers from `image` types.

use image::{DynamicImage, GrayImage};

use crate::detect::{self, DetectedRing, EnhanceParams, RingSearchParams};

/// Errors produced by the high-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Enhance(#[from] detect::EnhanceError),

    #[error(transparent)]
    Detect(#[from] detect::DetectError),
}

/// Enhance a decoded photograph into an analysis-ready intensity field.
pub fn enhance_image(img: &DynamicImage) -> Result<GrayImage, AnalyzeError> {
    enhance_image_with(img, &EnhanceParams::default())
}

/// [`enhance_image`] with explicit enhancement settings.
pub fn enhance_image_with(
    img: &DynamicImage,
    params: &EnhanceParams,
) -> Result<GrayImage, AnalyzeError> {
    let out = match img {
        DynamicImage::ImageLuma8(gray) => {
            detect::enhance_with(gray.as_raw(), gray.width(), gray.height(), 1, params)?
        }
        DynamicImage::ImageRgba8(rgba) => {
            detect::enhance_with(rgba.as_raw(), rgba.width(), rgba.height(), 4, params)?
        }
        other => {
            let rgb = other.to_rgb8();
            detect::enhance_with(rgb.as_raw(), rgb.width(), rgb.height(), 3, params)?
        }
    };
    Ok(out)
}

/// Enhance a photograph and search for a ring near `(x0, y0)` in one call.
pub fn detect_ring_in_image(
    img: &DynamicImage,
    x0: i32,
    y0: i32,
    params: &RingSearchParams,
) -> Result<Option<DetectedRing>, AnalyzeError> {
    let field = enhance_image(img)?;
    Ok(detect::detect_ring(&field, x0, y0, params)?)
}
