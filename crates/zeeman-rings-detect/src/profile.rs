//! Radial intensity profiling around a detected ring.
//!
//! Averages the field over evenly spaced spokes to get a 1-D intensity
//! profile across the ring, then walks from the profile peak to the
//! half-maximum crossings to estimate the ring's inner and outer edge radii.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use zeeman_rings_core::GrayView;

/// Half-maximum edge radii of one ring, pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingBoundaries {
    pub inner: f32,
    pub outer: f32,
}

/// Estimate ring edge radii around `r_estimate`.
///
/// Scans radii in a `search_width`-wide window, averaging `spokes` angular
/// samples per radius. Returns `None` when the window is degenerate or the
/// profile is flat (nothing to walk on).
pub fn ring_boundaries(
    field: &GrayView<'_>,
    cx: f32,
    cy: f32,
    r_estimate: f32,
    search_width: f32,
    spokes: u32,
) -> Option<RingBoundaries> {
    if spokes == 0 {
        return None;
    }
    let half = search_width / 2.0;
    let r_lo = (r_estimate - half).max(0.0);
    let r_hi = (r_estimate + half).min(field.width.min(field.height) as f32 / 2.0 - 1.0);
    if r_lo >= r_hi {
        return None;
    }

    let start = r_lo.floor();
    let count = (r_hi.ceil() - start) as usize;
    if count == 0 {
        return None;
    }

    let mut profile = vec![0.0f64; count];
    for k in 0..spokes {
        let theta = TAU * k as f32 / spokes as f32;
        let (sin, cos) = theta.sin_cos();
        for (i, value) in profile.iter_mut().enumerate() {
            let r = start + i as f32;
            let x = (cx + r * cos).round() as i32;
            let y = (cy + r * sin).round() as i32;
            *value += field.get(x, y) as f64;
        }
    }
    for value in profile.iter_mut() {
        *value /= spokes as f64;
    }

    let (peak_idx, &peak) = profile
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())?;
    let floor = profile.iter().copied().fold(f64::INFINITY, f64::min);
    if peak <= floor {
        // Flat profile: no ring under the window.
        return None;
    }
    let threshold = floor + (peak - floor) * 0.5;

    let mut inner_idx = peak_idx;
    while inner_idx > 0 && profile[inner_idx - 1] > threshold {
        inner_idx -= 1;
    }
    let mut outer_idx = peak_idx;
    while outer_idx + 1 < profile.len() && profile[outer_idx + 1] > threshold {
        outer_idx += 1;
    }

    Some(RingBoundaries {
        inner: start + inner_idx as f32,
        outer: start + outer_idx as f32,
    })
}
