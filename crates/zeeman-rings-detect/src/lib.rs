//! Interference-ring auto-detection for Zeeman spectroscopy photographs.
//!
//! Pipeline per image:
//! - [`enhance`] normalizes a raw pixel buffer into an analysis-ready
//!   grayscale field (luminance, 5x5-equivalent Gaussian, CLAHE),
//! - [`detect_ring`] turns an approximate center plus a radius band into a
//!   precise ring location via an annulus-masked, multi-candidate
//!   gradient-voting search with a four-signal quality score.
//!
//! Both are synchronous, stateless functions of their inputs. "No ring
//! found" is `Ok(None)`, distinct from parameter errors.

mod detect;
mod enhance;
pub mod hough;
mod profile;
mod score;

#[cfg(test)]
mod test_utils;

pub use detect::{detect_ring, DetectError, DetectedRing, RingSearchParams};
pub use enhance::{enhance, enhance_with, EnhanceError, EnhanceParams};
pub use hough::{CircleHypothesis, HoughParams};
pub use profile::{ring_boundaries, RingBoundaries};
pub use score::ScoreWeights;
