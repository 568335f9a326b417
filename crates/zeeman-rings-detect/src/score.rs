//! Quality scoring for ring hypotheses.
//!
//! Four independently normalized signals combined by a fixed linear blend.
//! Edge strength carries half the weight; it is the most reliable
//! real-vs-noise discriminator on enhanced interference images.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use zeeman_rings_core::{circle_perimeter_stats, GrayView};

use crate::hough::CircleHypothesis;

/// Blend weights for the four scoring signals.
///
/// A tunable policy, not a physical law. The defaults match the reference
/// tuning and sum to 1.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Inverse distance from the user's initial center guess.
    pub distance: f32,
    /// Mean perimeter intensity on the enhanced field.
    pub edge: f32,
    /// Fraction of the perimeter with nonzero intensity.
    pub completeness: f32,
    /// Inverse distance from the candidate center that produced the pass.
    pub proximity: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            distance: 0.2,
            edge: 0.5,
            completeness: 0.2,
            proximity: 0.1,
        }
    }
}

/// Score one hypothesis against the enhanced (unmasked) field.
///
/// `guess` is the user-supplied center, `candidate` the search-grid center
/// whose masked pass produced the hypothesis.
pub(crate) fn score_hypothesis(
    field: &GrayView<'_>,
    hyp: &CircleHypothesis,
    guess: Point2<f32>,
    candidate: Point2<f32>,
    weights: &ScoreWeights,
) -> f32 {
    let center = Point2::new(hyp.x, hyp.y);

    let dist_guess = nalgebra::distance(&center, &guess);
    let distance = 1.0 / (1.0 + 0.1 * dist_guess);

    let stats = circle_perimeter_stats(field, hyp.x, hyp.y, hyp.r);
    let edge = if stats.on_field == 0 {
        0.0
    } else {
        (stats.mean_nonzero() / 255.0) as f32
    };

    let perimeter = (TAU * hyp.r).max(1.0);
    let completeness = (stats.nonzero as f32 / perimeter).min(1.0);

    let dist_candidate = nalgebra::distance(&center, &candidate);
    let proximity = 1.0 / (1.0 + dist_candidate);

    weights.distance * distance
        + weights.edge * edge
        + weights.completeness * completeness
        + weights.proximity * proximity
}
