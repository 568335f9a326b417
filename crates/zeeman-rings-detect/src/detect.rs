//! Multi-candidate ring search.
//!
//! The user supplies an approximate center and a radius band. A grid of
//! candidate centers around the guess each gets its own annulus-masked
//! circle-detection pass; every hypothesis is scored against the enhanced
//! field and the best one wins.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use image::GrayImage;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use zeeman_rings_core::GrayView;

use crate::hough::{hough_circles, CircleHypothesis, HoughParams};
use crate::profile::{ring_boundaries, RingBoundaries};
use crate::score::{score_hypothesis, ScoreWeights};

/// Errors for invalid search parameters. Always surfaced, never corrected.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid radius band [{r_min}, {r_max}]")]
    InvalidRadiusBand { r_min: f32, r_max: f32 },

    #[error("negative center search half window {0}")]
    InvalidHalfWindow(i32),
}

/// Search settings for [`detect_ring`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RingSearchParams {
    /// Lower radius bound, pixels.
    pub r_min: f32,
    /// Upper radius bound, pixels.
    pub r_max: f32,
    /// Half size of the candidate-center window; candidates step 2 px over
    /// `[-2*half_window, 2*half_window]` per axis. 0 probes only the guess.
    pub half_window: i32,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub hough: HoughParams,
    /// Estimate the winner's inner/outer edge radii by radial profiling.
    #[serde(default = "default_true")]
    pub profile_boundaries: bool,
}

fn default_true() -> bool {
    true
}

impl RingSearchParams {
    pub fn new(r_min: f32, r_max: f32) -> Self {
        Self {
            r_min,
            r_max,
            half_window: 5,
            weights: ScoreWeights::default(),
            hough: HoughParams::default(),
            profile_boundaries: true,
        }
    }
}

/// The detector's winning ring.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DetectedRing {
    pub x: f32,
    pub y: f32,
    /// Centerline radius, pixels; always inside the requested band.
    pub r: f32,
    /// Blended quality score of the winning hypothesis.
    pub score: f32,
    /// Half-maximum edge radii from the radial profile, when available.
    pub boundaries: Option<RingBoundaries>,
}

/// Detect the best ring near `(x0, y0)` within the requested radius band.
///
/// Returns `Ok(None)` when no pass produced a hypothesis; that is an
/// expected outcome, not a fault. Identical inputs return identical output:
/// candidate order, dedup overwrites and the strictly-greater winner scan
/// are all deterministic.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip(field, params), fields(x0, y0, r_min = params.r_min, r_max = params.r_max))
)]
pub fn detect_ring(
    field: &GrayImage,
    x0: i32,
    y0: i32,
    params: &RingSearchParams,
) -> Result<Option<DetectedRing>, DetectError> {
    if params.r_min < 0.0 || params.r_min >= params.r_max {
        return Err(DetectError::InvalidRadiusBand {
            r_min: params.r_min,
            r_max: params.r_max,
        });
    }
    if params.half_window < 0 {
        return Err(DetectError::InvalidHalfWindow(params.half_window));
    }

    let candidates = candidate_centers(x0, y0, params.half_window);
    let guess = Point2::new(x0 as f32, y0 as f32);
    let view = GrayView {
        width: field.width() as usize,
        height: field.height() as usize,
        data: field.as_raw(),
    };

    let evaluate = |&(cx, cy): &(i32, i32)| -> Vec<(CircleHypothesis, f32)> {
        let masked = mask_annulus(field, cx, cy, params.r_min, params.r_max);
        let min_dist = (params.r_min / 4.0).max(1.0);
        let candidate = Point2::new(cx as f32, cy as f32);
        hough_circles(&masked, params.r_min, params.r_max, min_dist, &params.hough)
            .into_iter()
            .map(|hyp| {
                let score = score_hypothesis(&view, &hyp, guess, candidate, &params.weights);
                (hyp, score)
            })
            .collect()
    };

    // Candidate passes are independent; the rayon path collects in candidate
    // order so dedup overwrites and tie-breaks match the sequential path.
    #[cfg(feature = "rayon")]
    let per_candidate: Vec<Vec<(CircleHypothesis, f32)>> = {
        use rayon::prelude::*;
        candidates.par_iter().map(evaluate).collect()
    };
    #[cfg(not(feature = "rayon"))]
    let per_candidate: Vec<Vec<(CircleHypothesis, f32)>> =
        candidates.iter().map(evaluate).collect();

    // Dedup by rounded (x, y, r): a later evaluation of the same key
    // overwrites the stored score but keeps the first-encountered slot, so
    // the final scan breaks ties by generation order.
    let mut ordered: Vec<(CircleHypothesis, f32)> = Vec::new();
    let mut index: HashMap<(i64, i64, i64), usize> = HashMap::new();
    for scored in per_candidate.into_iter().flatten() {
        let key = (
            scored.0.x.round() as i64,
            scored.0.y.round() as i64,
            scored.0.r.round() as i64,
        );
        match index.entry(key) {
            Entry::Occupied(slot) => ordered[*slot.get()] = scored,
            Entry::Vacant(slot) => {
                slot.insert(ordered.len());
                ordered.push(scored);
            }
        }
    }

    log::debug!(
        "ring search at ({x0}, {y0}): {} candidates, {} distinct hypotheses",
        candidates.len(),
        ordered.len()
    );

    let mut best: Option<&(CircleHypothesis, f32)> = None;
    for entry in &ordered {
        if best.is_none_or(|b| entry.1 > b.1) {
            best = Some(entry);
        }
    }
    let Some(&(hyp, score)) = best else {
        return Ok(None);
    };

    let boundaries = if params.profile_boundaries {
        ring_boundaries(&view, hyp.x, hyp.y, hyp.r, 20.0, 360)
    } else {
        None
    };

    Ok(Some(DetectedRing {
        x: hyp.x,
        y: hyp.y,
        r: hyp.r,
        score,
        boundaries,
    }))
}

/// Integer candidate centers: a stride-2 grid over the doubled half window,
/// with the guess itself appended if the stride missed it.
pub(crate) fn candidate_centers(x0: i32, y0: i32, half_window: i32) -> Vec<(i32, i32)> {
    let span = 2 * half_window;
    let mut out = Vec::new();
    for dx in (-span..=span).step_by(2) {
        for dy in (-span..=span).step_by(2) {
            out.push((x0 + dx, y0 + dy));
        }
    }
    if !out.contains(&(x0, y0)) {
        out.push((x0, y0));
    }
    out
}

/// Copy of the field with everything outside the annulus zeroed so it cannot
/// vote in the detection pass.
fn mask_annulus(field: &GrayImage, cx: i32, cy: i32, r_min: f32, r_max: f32) -> GrayImage {
    let (w, h) = field.dimensions();
    let r_min_sq = r_min * r_min;
    let r_max_sq = r_max * r_max;
    let src = field.as_raw();
    let mut out = vec![0u8; src.len()];
    for y in 0..h as i32 {
        let row = y as usize * w as usize;
        for x in 0..w as i32 {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let d_sq = dx * dx + dy * dy;
            if d_sq >= r_min_sq && d_sq <= r_max_sq {
                out[row + x as usize] = src[row + x as usize];
            }
        }
    }
    GrayImage::from_raw(w, h, out).unwrap_or_else(|| GrayImage::new(w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_half_window_probes_exactly_the_guess() {
        assert_eq!(candidate_centers(40, 52, 0), vec![(40, 52)]);
    }

    #[test]
    fn candidate_grid_has_stride_two_and_contains_guess() {
        let c = candidate_centers(10, 10, 2);
        // offsets {-4, -2, 0, 2, 4} per axis
        assert_eq!(c.len(), 25);
        assert!(c.contains(&(10, 10)));
        assert!(c.contains(&(6, 6)));
        assert!(c.contains(&(14, 14)));
        assert!(!c.contains(&(9, 10)));
    }

    #[test]
    fn invalid_band_is_an_error() {
        let field = GrayImage::new(32, 32);
        let mut params = RingSearchParams::new(10.0, 10.0);
        assert!(matches!(
            detect_ring(&field, 16, 16, &params),
            Err(DetectError::InvalidRadiusBand { .. })
        ));

        params.r_min = -1.0;
        params.r_max = 10.0;
        assert!(matches!(
            detect_ring(&field, 16, 16, &params),
            Err(DetectError::InvalidRadiusBand { .. })
        ));
    }

    #[test]
    fn negative_half_window_is_an_error() {
        let field = GrayImage::new(32, 32);
        let mut params = RingSearchParams::new(5.0, 12.0);
        params.half_window = -1;
        assert!(matches!(
            detect_ring(&field, 16, 16, &params),
            Err(DetectError::InvalidHalfWindow(-1))
        ));
    }

    #[test]
    fn all_zero_field_is_not_found() {
        let field = GrayImage::new(96, 96);
        let found = detect_ring(&field, 48, 48, &RingSearchParams::new(10.0, 30.0)).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn search_params_deserialize_with_defaults() {
        // The surrounding application persists overrides as JSON; omitted
        // sections fall back to the reference tuning.
        let params: RingSearchParams =
            serde_json::from_str(r#"{"r_min": 20.0, "r_max": 50.0, "half_window": 3}"#).unwrap();
        assert_eq!(params.half_window, 3);
        assert_eq!(params.weights.edge, 0.5);
        assert_eq!(params.hough.grad_threshold, 100.0);
        assert!(params.profile_boundaries);
    }

    #[test]
    fn mask_zeroes_outside_annulus_only() {
        let field = GrayImage::from_pixel(64, 64, image::Luma([200]));
        let masked = mask_annulus(&field, 32, 32, 10.0, 20.0);
        assert_eq!(masked.get_pixel(32, 32)[0], 0); // inside the hole
        assert_eq!(masked.get_pixel(32 + 15, 32)[0], 200); // in the band
        assert_eq!(masked.get_pixel(32, 32 + 25)[0], 0); // beyond the band
    }
}
